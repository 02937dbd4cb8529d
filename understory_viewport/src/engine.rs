// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notification engine.
//!
//! ## Overview
//!
//! Turns one upstream viewport event into an ordered set of handler calls.
//! Works in two steps so that no handler can observe another's side effects
//! through its derived snapshot:
//!
//! 1. [`plan`] filters the records to the updatable ones and runs every derive
//!    function against the event's viewport.
//! 2. [`deliver`] invokes the planned handlers in registry order.
//!
//! [`dispatch`] runs both steps back to back.
//!
//! ## Filtering
//!
//! A record is updatable when it is not idle-gated (or the event is idle) and
//! it wants at least one of the categories flagged as changed.
//!
//! ## Failure
//!
//! Handler panics are not caught. A panicking handler stops the remaining
//! deliveries for that event and unwinds into whoever pushed the event.
//! Registry state is unaffected because delivery works from a snapshot.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::listener::{Derived, Listener};
use crate::types::{Viewport, ViewportChange};

/// A listener selected for an event, with its snapshot already computed.
#[derive(Debug)]
pub struct PlannedUpdate {
    /// The record to notify.
    pub listener: Rc<Listener>,
    /// Snapshot computed for this record, if it has a derive function.
    pub derived: Derived,
}

/// Select the updatable records and compute their snapshots.
///
/// Order of the result matches the order of `listeners`.
/// Every derive function runs before this returns.
pub fn plan(
    listeners: &[Rc<Listener>],
    viewport: &Viewport,
    changes: ViewportChange,
    is_idle: bool,
) -> Vec<PlannedUpdate> {
    listeners
        .iter()
        .filter(|l| l.is_updatable(changes, is_idle))
        .map(|l| PlannedUpdate {
            listener: l.clone(),
            derived: l.derive(viewport),
        })
        .collect()
}

/// Invoke each planned handler in order. Returns the number of handlers invoked.
pub fn deliver(plan: &[PlannedUpdate], viewport: &Viewport) -> usize {
    for update in plan {
        update.listener.deliver(viewport, &update.derived);
    }
    plan.len()
}

/// Filter, derive, and deliver one event. Returns the number of handlers invoked.
pub fn dispatch(
    listeners: &[Rc<Listener>],
    viewport: &Viewport,
    changes: ViewportChange,
    is_idle: bool,
) -> usize {
    let planned = plan(listeners, viewport, changes, is_idle);
    tracing::trace!(
        candidates = listeners.len(),
        updatable = planned.len(),
        ?changes,
        is_idle,
        "viewport dispatch"
    );
    deliver(&planned, viewport)
}
