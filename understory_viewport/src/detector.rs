// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The raw detector boundary.
//!
//! ## Overview
//!
//! A [`RawDetector`] owns all interaction with the platform's scroll, resize,
//! and idle machinery. This crate never measures anything; it only tells the
//! detector when to run and receives its events through an [`UpdateSink`].
//!
//! - [`RawDetector::mount`] is called when the first listener arrives (after debounce).
//!   The detector should acquire its native listeners and timers and start
//!   pushing events into the sink.
//! - [`RawDetector::unmount`] is called when the last listener is gone (after debounce).
//!   The detector must release everything and stop pushing.
//!
//! [`ManualDetector`] is a detector for hosts that already receive viewport
//! state from their windowing layer: feed it snapshots and it computes the
//! change flags and forwards them while mounted.

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use crate::provider::Shared;
use crate::types::{Viewport, ViewportChange};

/// Source of viewport change and idle events.
pub trait RawDetector {
    /// Start producing events into `sink`.
    fn mount(&mut self, sink: UpdateSink);

    /// Stop producing events and release any held resources.
    fn unmount(&mut self);
}

/// Push handle handed to a mounted [`RawDetector`].
///
/// Cloneable and cheap. Once its provider has been dropped, every push is a no-op.
#[derive(Clone)]
pub struct UpdateSink {
    target: Weak<Shared>,
}

impl core::fmt::Debug for UpdateSink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UpdateSink")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl UpdateSink {
    pub(crate) fn new(target: Weak<Shared>) -> Self {
        Self { target }
    }

    /// Push a regular viewport change. Returns the number of handlers invoked.
    pub fn on_update(&self, viewport: Viewport, changes: ViewportChange) -> usize {
        self.push(viewport, changes, false)
    }

    /// Push a viewport snapshot taken once the viewport went idle.
    ///
    /// Idle-gated listeners are only eligible for these. Returns the number of handlers invoked.
    pub fn on_idled_update(&self, viewport: Viewport, changes: ViewportChange) -> usize {
        self.push(viewport, changes, true)
    }

    /// Whether the provider behind this sink is still alive.
    pub fn is_connected(&self) -> bool {
        self.target.strong_count() > 0
    }

    fn push(&self, viewport: Viewport, changes: ViewportChange, is_idle: bool) -> usize {
        match self.target.upgrade() {
            Some(shared) => shared.dispatch(viewport, changes, is_idle),
            None => 0,
        }
    }
}

#[derive(Debug, Default)]
struct ManualState {
    sink: Option<UpdateSink>,
    last: Option<Viewport>,
    since_idle: ViewportChange,
    mounts: u32,
}

/// A detector driven by explicit viewport snapshots.
///
/// Clones share state, so the host keeps one clone and hands another to the provider.
///
/// ```
/// use std::rc::Rc;
/// use kurbo::{Point, Size};
/// use understory_viewport::detector::ManualDetector;
/// use understory_viewport::provider::ViewportProvider;
/// use understory_viewport::schedule::TaskQueue;
/// use understory_viewport::types::Viewport;
///
/// let queue = Rc::new(TaskQueue::new());
/// let detector = ManualDetector::new();
/// let provider = ViewportProvider::root(queue.clone(), detector.clone());
/// let ctx = provider.context();
///
/// let tracked = ctx.track_scroll(Default::default());
/// queue.run_pending(); // activation settles; the detector mounts
/// assert!(detector.is_mounted());
///
/// detector.observe(Viewport::new(Point::new(0.0, 40.0), Size::new(320.0, 240.0)));
/// assert_eq!(tracked.get(), Point::new(0.0, 40.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualDetector {
    state: Rc<RefCell<ManualState>>,
}

impl ManualDetector {
    /// Create an unmounted detector with no previous snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the provider currently has this detector mounted.
    pub fn is_mounted(&self) -> bool {
        self.state.borrow().sink.is_some()
    }

    /// How many times this detector has been mounted.
    pub fn mount_count(&self) -> u32 {
        self.state.borrow().mounts
    }

    /// Record a new snapshot and, if mounted and something changed, push it.
    ///
    /// The first snapshot ever observed counts as a change in both categories.
    /// Returns the number of handlers invoked.
    pub fn observe(&self, viewport: Viewport) -> usize {
        let (sink, changes) = {
            let mut state = self.state.borrow_mut();
            let changes = match state.last {
                Some(last) => ViewportChange::from_updates(
                    last.scroll != viewport.scroll,
                    last.dimensions != viewport.dimensions,
                ),
                None => ViewportChange::all(),
            };
            state.last = Some(viewport);
            if state.sink.is_some() {
                state.since_idle |= changes;
            }
            (state.sink.clone(), changes)
        };
        match sink {
            Some(sink) if !changes.is_empty() => sink.on_update(viewport, changes),
            _ => 0,
        }
    }

    /// Signal that the viewport went idle.
    ///
    /// Pushes the latest snapshot as an idle update carrying every change seen
    /// since the previous idle signal. Does nothing if unmounted or nothing changed.
    pub fn idle(&self) -> usize {
        let pending = {
            let mut state = self.state.borrow_mut();
            let changes = core::mem::take(&mut state.since_idle);
            match (&state.sink, state.last) {
                (Some(sink), Some(last)) if !changes.is_empty() => {
                    Some((sink.clone(), last, changes))
                }
                _ => None,
            }
        };
        match pending {
            Some((sink, viewport, changes)) => sink.on_idled_update(viewport, changes),
            None => 0,
        }
    }
}

impl RawDetector for ManualDetector {
    fn mount(&mut self, sink: UpdateSink) {
        let mut state = self.state.borrow_mut();
        state.sink = Some(sink);
        state.mounts += 1;
    }

    fn unmount(&mut self) {
        let mut state = self.state.borrow_mut();
        state.sink = None;
        state.since_idle = ViewportChange::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};

    fn at(y: f64, h: f64) -> Viewport {
        Viewport::new(Point::new(0.0, y), Size::new(100.0, h))
    }

    #[test]
    fn unmounted_detector_pushes_nothing() {
        let d = ManualDetector::new();
        assert!(!d.is_mounted());
        assert_eq!(d.observe(at(1.0, 10.0)), 0);
        assert_eq!(d.idle(), 0);
    }

    #[test]
    fn mount_and_unmount_track_the_sink() {
        let mut d = ManualDetector::new();
        d.mount(UpdateSink::new(Weak::new()));
        assert!(d.is_mounted());
        assert_eq!(d.mount_count(), 1);
        d.unmount();
        assert!(!d.is_mounted());
        d.mount(UpdateSink::new(Weak::new()));
        assert_eq!(d.mount_count(), 2);
    }

    #[test]
    fn disconnected_sink_is_inert() {
        let sink = UpdateSink::new(Weak::new());
        assert!(!sink.is_connected());
        assert_eq!(sink.on_update(at(0.0, 0.0), ViewportChange::all()), 0);
        assert_eq!(sink.on_idled_update(at(0.0, 0.0), ViewportChange::all()), 0);
    }
}
