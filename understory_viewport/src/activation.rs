// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced detector activation.
//!
//! ## Overview
//!
//! Subscribing and unsubscribing tend to arrive in bursts (a consumer that
//! rebuilds with a new handler detaches the old one and attaches the new one
//! within the same turn). Mounting the raw detector eagerly after each call
//! would start and stop it repeatedly.
//!
//! [`ActivationController`] keeps a single pending re-evaluation task. Every
//! [`request`](ActivationController::request) cancels the pending task and
//! schedules a replacement, so a burst collapses into one evaluation on a
//! later turn. When that evaluation runs, the owner calls
//! [`settle`](ActivationController::settle) with the registry's current
//! non-emptiness and acts on the returned [`Transition`], if any.
//!
//! Dropping the controller cancels the pending task.

use alloc::rc::Rc;
use core::cell::Cell;

use crate::schedule::{Scheduler, Task, TaskId};

/// A change in whether the raw detector should run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Listeners appeared; mount the detector.
    Mount,
    /// Listeners are gone; unmount the detector.
    Unmount,
}

/// Single-slot debounce over a [`Scheduler`].
pub struct ActivationController {
    scheduler: Rc<dyn Scheduler>,
    pending: Cell<Option<TaskId>>,
    active: Cell<bool>,
    evaluations: Cell<u64>,
}

impl core::fmt::Debug for ActivationController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ActivationController")
            .field("pending", &self.pending.get())
            .field("active", &self.active.get())
            .field("evaluations", &self.evaluations.get())
            .finish_non_exhaustive()
    }
}

impl ActivationController {
    /// Create an inactive controller scheduling on `scheduler`.
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            pending: Cell::new(None),
            active: Cell::new(false),
            evaluations: Cell::new(0),
        }
    }

    /// Replace any pending evaluation with `evaluate`, to run on a later turn.
    ///
    /// `evaluate` is expected to call [`settle`](Self::settle).
    pub fn request(&self, evaluate: Task) {
        if let Some(previous) = self.pending.take() {
            self.scheduler.cancel(previous);
        }
        let id = self.scheduler.schedule(evaluate);
        tracing::trace!(?id, "activation re-evaluation scheduled");
        self.pending.set(Some(id));
    }

    /// Record an evaluation against the current registry state.
    ///
    /// Clears the pending slot and returns a transition only when
    /// `has_listeners` differs from the current activation state.
    pub fn settle(&self, has_listeners: bool) -> Option<Transition> {
        self.pending.set(None);
        self.evaluations.set(self.evaluations.get() + 1);
        if has_listeners == self.active.get() {
            return None;
        }
        self.active.set(has_listeners);
        Some(if has_listeners {
            Transition::Mount
        } else {
            Transition::Unmount
        })
    }

    /// Mark the detector as stopped without counting an evaluation.
    ///
    /// Used on teardown. Returns whether the detector was active.
    pub fn deactivate(&self) -> bool {
        self.active.replace(false)
    }

    /// Cancel the pending evaluation, if any.
    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Whether the detector should currently be running.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Whether an evaluation is waiting to run.
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Number of evaluations that have run.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.get()
    }
}

impl Drop for ActivationController {
    fn drop(&mut self) {
        self.cancel();
    }
}
