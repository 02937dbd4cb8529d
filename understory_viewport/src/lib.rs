// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_viewport --heading-base-level=0

//! Understory Viewport: shared viewport observation with selective notification.
//!
//! ## Overview
//!
//! Many parts of a UI want to react to scrolling and resizing. Attaching a
//! native listener per observer is wasteful; this crate lets any number of
//! observers share a single raw detector.
//!
//! - A [`ViewportProvider`] owns a listener registry and one [`RawDetector`].
//! - Observers subscribe through the [`ViewportContext`] the provider hands down.
//! - For each upstream event, the notification engine picks exactly the
//!   listeners that care (by change category and idle gating), computes any
//!   per-listener derived snapshot, and calls them in registration order.
//! - The detector only runs while listeners exist. Mount/unmount decisions are
//!   debounced to one per quiet turn of the host loop, so bursts of
//!   subscribe/unsubscribe calls do not thrash it.
//!
//! It does not measure anything. Hosts implement [`RawDetector`] over their
//! platform (or use [`ManualDetector`] and feed it snapshots) and implement
//! [`Scheduler`] over their event loop (or pump a [`TaskQueue`]).
//!
//! ## Nesting
//!
//! Providers resolve against their parent's context. The first provider in a
//! subtree is authoritative; providers nested below it become pass-throughs
//! that build nothing and forward the parent's context. One registry and one
//! detector exist per disjoint subtree.
//!
//! ## Ordering and failure
//!
//! Dispatch is synchronous and in registration order. The `priority` option is
//! accepted and stored but does not affect ordering. Handler panics are not
//! caught: they stop the remaining deliveries for that event and unwind into
//! the code that pushed it.
//!
//! ## Minimal usage
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::{Point, Size};
//! use understory_viewport::{
//!     ManualDetector, TaskQueue, Viewport, ViewportChangeOptions, ViewportProvider,
//! };
//!
//! let queue = Rc::new(TaskQueue::new());
//! let detector = ManualDetector::new();
//! let provider = ViewportProvider::root(queue.clone(), detector.clone());
//! let ctx = provider.context();
//!
//! let last_y = Rc::new(Cell::new(0.0));
//! let y = last_y.clone();
//! let _scroll = ctx.on_scroll(
//!     move |scroll, _: Option<&()>| y.set(scroll.y),
//!     ViewportChangeOptions::default(),
//! );
//!
//! // The detector mounts on the next turn of the loop.
//! queue.run_pending();
//! assert!(detector.is_mounted());
//!
//! detector.observe(Viewport::new(Point::new(0.0, 250.0), Size::new(800.0, 600.0)));
//! assert_eq!(last_y.get(), 250.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod activation;
pub mod detector;
pub mod engine;
pub mod error;
pub mod listener;
pub mod provider;
pub mod registry;
pub mod schedule;
pub mod subscribe;
pub mod types;

pub use detector::{ManualDetector, RawDetector, UpdateSink};
pub use error::ViewportError;
pub use listener::{Handler, HandlerKey, Listener};
pub use provider::{ViewportContext, ViewportProvider};
pub use schedule::{Scheduler, TaskQueue};
pub use subscribe::{Subscription, Tracked, UpdateOptions, ViewportChangeOptions};
pub use types::{Priority, Viewport, ViewportChange};

/// Version of this crate, published in every [`ViewportContext`].
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
