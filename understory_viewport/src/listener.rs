// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener records: one handler plus the predicates that decide when it runs.
//!
//! ## Overview
//!
//! A [`Listener`] is the canonical subscription record stored by the
//! [`ListenerRegistry`](crate::registry::ListenerRegistry). It carries:
//!
//! - the handler, invoked as `handler(viewport, derived)`;
//! - `notify_scroll` / `notify_dimensions` predicates for interest in each change category;
//! - a `notify_only_when_idle` predicate gating the record to idle events;
//! - a `priority` (stored, never consulted by dispatch);
//! - an optional derive function producing a per-listener snapshot of type `T`.
//!
//! Predicates are evaluated at dispatch time. The facade builds them from
//! options that are fixed for the life of an attachment.
//!
//! ## Identity
//!
//! Removal is keyed by [`HandlerKey`], the address of the handler's `Rc`
//! allocation. Clones of one `Rc` share a key. Registering the same handler
//! twice produces two records, and one removal drops both.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::any::Any;
use core::hash::{Hash, Hasher};

use crate::types::{Priority, Viewport, ViewportChange};

/// A viewport change handler receiving the viewport and this listener's derived snapshot.
///
/// The snapshot is `None` when the listener has no derive function.
pub type Handler<T> = Rc<dyn Fn(&Viewport, Option<&T>)>;

/// A function computing a per-listener snapshot from the current viewport.
pub type Derive<T> = Rc<dyn Fn(&Viewport) -> T>;

type Predicate = Box<dyn Fn() -> bool>;

/// Identity of a handler for removal purposes.
///
/// Keys compare by the address of the handler's `Rc` allocation. Each key
/// holds a weak reference to that allocation, so the address cannot be reused
/// by another handler while the key exists, even after the handler is dropped.
#[derive(Clone)]
pub struct HandlerKey {
    addr: *const (),
    // Keeps the allocation, and so `addr`, reserved.
    _anchor: Rc<dyn Any>,
}

impl HandlerKey {
    /// Key for the given handler.
    pub fn of<H: ?Sized + 'static>(handler: &Rc<H>) -> Self {
        Self {
            addr: Rc::as_ptr(handler).cast::<()>(),
            _anchor: Rc::new(Rc::downgrade(handler)),
        }
    }
}

impl PartialEq for HandlerKey {
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr
    }
}

impl Eq for HandlerKey {}

impl Hash for HandlerKey {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.addr.hash(state);
    }
}

impl core::fmt::Debug for HandlerKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("HandlerKey").field(&self.addr).finish()
    }
}

/// Type-erased pairing of a handler with its optional derive function.
trait Delivery {
    fn derive(&self, viewport: &Viewport) -> Option<Box<dyn Any>>;
    fn deliver(&self, viewport: &Viewport, derived: Option<&dyn Any>);
}

struct TypedDelivery<T> {
    handler: Handler<T>,
    derive: Option<Derive<T>>,
}

impl<T: 'static> Delivery for TypedDelivery<T> {
    fn derive(&self, viewport: &Viewport) -> Option<Box<dyn Any>> {
        let derive = self.derive.as_ref()?;
        Some(Box::new(derive(viewport)) as Box<dyn Any>)
    }

    fn deliver(&self, viewport: &Viewport, derived: Option<&dyn Any>) {
        (self.handler)(viewport, derived.and_then(|d| d.downcast_ref::<T>()));
    }
}

/// A snapshot computed for one listener ahead of delivery.
///
/// Produced by [`Listener::derive`] and consumed by [`Listener::deliver`].
pub struct Derived(Option<Box<dyn Any>>);

impl Derived {
    /// True if the listener had a derive function and it produced a value.
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

impl core::fmt::Debug for Derived {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Derived")
            .field(&self.0.as_ref().map(|_| ".."))
            .finish()
    }
}

/// A subscription record.
///
/// ## Usage
///
/// - Construct with [`Listener::new`] for a plain handler or
///   [`Listener::with_derive`] to compute a per-listener snapshot before delivery.
/// - Narrow interest with [`Listener::notify_scroll`], [`Listener::notify_dimensions`],
///   and [`Listener::notify_only_when_idle`]. By default a listener wants both
///   categories and is not idle-gated.
/// - Hand the record to [`ListenerRegistry::add`](crate::registry::ListenerRegistry::add)
///   or [`ViewportProvider::add_listener`](crate::provider::ViewportProvider::add_listener).
pub struct Listener {
    key: HandlerKey,
    delivery: Box<dyn Delivery>,
    notify_scroll: Predicate,
    notify_dimensions: Predicate,
    notify_only_when_idle: Predicate,
    priority: Box<dyn Fn() -> Priority>,
}

impl core::fmt::Debug for Listener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listener")
            .field("key", &self.key)
            .field("wants_scroll", &self.wants_scroll())
            .field("wants_dimensions", &self.wants_dimensions())
            .field("defer_until_idle", &self.defer_until_idle())
            .field("priority", &self.priority())
            .finish_non_exhaustive()
    }
}

impl Listener {
    /// Create a record for `handler` with no derive function.
    pub fn new<T: 'static>(handler: Handler<T>) -> Self {
        Self::from_parts(handler, None)
    }

    /// Create a record whose `derive` runs against each qualifying viewport
    /// before `handler` is invoked.
    pub fn with_derive<T: 'static>(handler: Handler<T>, derive: Derive<T>) -> Self {
        Self::from_parts(handler, Some(derive))
    }

    pub(crate) fn from_parts<T: 'static>(handler: Handler<T>, derive: Option<Derive<T>>) -> Self {
        Self {
            key: HandlerKey::of(&handler),
            delivery: Box::new(TypedDelivery { handler, derive }),
            notify_scroll: Box::new(|| true),
            notify_dimensions: Box::new(|| true),
            notify_only_when_idle: Box::new(|| false),
            priority: Box::new(Priority::default),
        }
    }

    /// Set the predicate expressing interest in scroll changes.
    #[must_use]
    pub fn notify_scroll(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.notify_scroll = Box::new(predicate);
        self
    }

    /// Set the predicate expressing interest in dimension changes.
    #[must_use]
    pub fn notify_dimensions(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.notify_dimensions = Box::new(predicate);
        self
    }

    /// Set the predicate that, when true, restricts the record to idle events.
    #[must_use]
    pub fn notify_only_when_idle(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.notify_only_when_idle = Box::new(predicate);
        self
    }

    /// Set the declared priority. Stored only.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Fn() -> Priority + 'static) -> Self {
        self.priority = Box::new(priority);
        self
    }

    /// Identity of this record's handler.
    pub fn key(&self) -> HandlerKey {
        self.key.clone()
    }

    pub(crate) fn has_key(&self, key: &HandlerKey) -> bool {
        self.key == *key
    }

    /// Current answer of the scroll-interest predicate.
    pub fn wants_scroll(&self) -> bool {
        (self.notify_scroll)()
    }

    /// Current answer of the dimensions-interest predicate.
    pub fn wants_dimensions(&self) -> bool {
        (self.notify_dimensions)()
    }

    /// Current answer of the idle-gate predicate.
    pub fn defer_until_idle(&self) -> bool {
        (self.notify_only_when_idle)()
    }

    /// Declared priority.
    pub fn priority(&self) -> Priority {
        (self.priority)()
    }

    /// Whether this record should receive an event with the given flags.
    ///
    /// Idle-gated records are rejected outside idle events even if their
    /// scroll or dimension interest matches.
    pub fn is_updatable(&self, changes: ViewportChange, is_idle: bool) -> bool {
        if self.defer_until_idle() && !is_idle {
            return false;
        }
        let for_scroll = changes.scroll_did_update() && self.wants_scroll();
        let for_dimensions = changes.dimensions_did_update() && self.wants_dimensions();
        for_scroll || for_dimensions
    }

    /// Run the derive function, if any, against `viewport`.
    pub fn derive(&self, viewport: &Viewport) -> Derived {
        Derived(self.delivery.derive(viewport))
    }

    /// Invoke the handler with `viewport` and a snapshot produced by [`Listener::derive`].
    pub fn deliver(&self, viewport: &Viewport, derived: &Derived) {
        self.delivery.deliver(viewport, derived.0.as_deref());
    }
}
