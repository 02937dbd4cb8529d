// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Providers and the ambient context they publish.
//!
//! ## Overview
//!
//! A [`ViewportProvider`] is resolved against the [`ViewportContext`] it
//! receives from its parent:
//!
//! - If the parent context has no provider, the new provider is
//!   *authoritative*: it owns a fresh listener registry, notification engine,
//!   activation controller and raw detector, and publishes a new context.
//! - If the parent context already carries a provider, the new one is a
//!   *pass-through*: it builds nothing (the detector factory is never called)
//!   and hands the parent context to its own descendants unchanged.
//!
//! This keeps exactly one registry/detector pair per disjoint subtree no matter
//! how many times providers are nested. Contexts are passed down explicitly;
//! there is no global state.
//!
//! ## Lifecycle
//!
//! - Each registry mutation requests a debounced activation re-evaluation.
//! - When the evaluation runs and the registry's non-emptiness changed, the
//!   detector is mounted or unmounted.
//! - Dropping an authoritative provider cancels the pending evaluation and
//!   unmounts the detector if it is mounted. Contexts, sinks and subscriptions
//!   that outlive it become inert.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};

use crate::activation::{ActivationController, Transition};
use crate::detector::{RawDetector, UpdateSink};
use crate::engine;
use crate::error::ViewportError;
use crate::listener::{HandlerKey, Listener};
use crate::registry::ListenerRegistry;
use crate::schedule::Scheduler;
use crate::types::{Viewport, ViewportChange};

/// State owned by an authoritative provider.
pub(crate) struct Shared {
    this: Weak<Self>,
    registry: RefCell<ListenerRegistry>,
    activation: ActivationController,
    detector: RefCell<Box<dyn RawDetector>>,
    current: Cell<Viewport>,
}

impl Shared {
    fn new(scheduler: Rc<dyn Scheduler>, detector: Box<dyn RawDetector>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            registry: RefCell::new(ListenerRegistry::new()),
            activation: ActivationController::new(scheduler),
            detector: RefCell::new(detector),
            current: Cell::new(Viewport::default()),
        })
    }

    pub(crate) fn add(&self, listener: Listener) {
        self.registry.borrow_mut().add(listener);
        self.request_activation();
    }

    pub(crate) fn remove(&self, key: HandlerKey) -> usize {
        let removed = self.registry.borrow_mut().remove(key);
        self.request_activation();
        removed
    }

    pub(crate) fn dispatch(
        &self,
        viewport: Viewport,
        changes: ViewportChange,
        is_idle: bool,
    ) -> usize {
        self.current.set(viewport);
        let listeners = self.registry.borrow().snapshot();
        engine::dispatch(&listeners, &viewport, changes, is_idle)
    }

    pub(crate) fn current_viewport(&self) -> Viewport {
        self.current.get()
    }

    fn request_activation(&self) {
        let this = self.this.clone();
        self.activation.request(Box::new(move || {
            if let Some(shared) = this.upgrade() {
                shared.evaluate_activation();
            }
        }));
    }

    fn evaluate_activation(&self) {
        let has_listeners = !self.registry.borrow().is_empty();
        match self.activation.settle(has_listeners) {
            Some(Transition::Mount) => {
                tracing::debug!(
                    listeners = self.registry.borrow().len(),
                    "mounting viewport detector"
                );
                let sink = UpdateSink::new(self.this.clone());
                self.detector.borrow_mut().mount(sink);
            }
            Some(Transition::Unmount) => {
                tracing::debug!("unmounting viewport detector");
                self.detector.borrow_mut().unmount();
            }
            None => {}
        }
    }

    fn teardown(&self) {
        self.activation.cancel();
        if !self.activation.deactivate() {
            return;
        }
        match self.detector.try_borrow_mut() {
            Ok(mut detector) => {
                tracing::debug!("unmounting viewport detector on provider teardown");
                detector.unmount();
            }
            Err(_) => {
                tracing::debug!(
                    "viewport detector is busy during provider teardown; unmount skipped"
                );
            }
        }
    }
}

/// The ambient value a provider publishes to its descendants.
///
/// Cheap to clone. Carries whether an authoritative provider exists above
/// ([`has_ancestor`](Self::has_ancestor)), the crate version it was built
/// with, and the add/remove surface of that provider. Subscription helpers
/// live in [`crate::subscribe`].
#[derive(Clone)]
pub struct ViewportContext {
    provider: Option<Weak<Shared>>,
    version: &'static str,
}

impl core::fmt::Debug for ViewportContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewportContext")
            .field("has_ancestor", &self.has_ancestor())
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Default for ViewportContext {
    fn default() -> Self {
        Self::root()
    }
}

impl ViewportContext {
    /// The context at the top of a tree: no provider above.
    pub fn root() -> Self {
        Self {
            provider: None,
            version: crate::VERSION,
        }
    }

    /// Whether an authoritative provider exists above this point.
    ///
    /// Descendants seeing `true` must not construct their own registry.
    pub fn has_ancestor(&self) -> bool {
        self.provider.is_some()
    }

    /// Version of this crate that published the context.
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Register a listener with the authoritative provider.
    pub fn add_listener(&self, listener: Listener) -> Result<(), ViewportError> {
        self.shared("add_listener")?.add(listener);
        Ok(())
    }

    /// Remove every listener registered for `key`. Returns how many were removed.
    ///
    /// Removing an unknown handler is not an error and returns `Ok(0)`.
    pub fn remove_listener(&self, key: HandlerKey) -> Result<usize, ViewportError> {
        Ok(self.shared("remove_listener")?.remove(key))
    }

    /// The most recent viewport seen by the provider, or the zero viewport if
    /// none has been seen or there is no provider.
    pub fn current_viewport(&self) -> Viewport {
        self.shared("current_viewport")
            .map(|s| s.current_viewport())
            .unwrap_or_default()
    }

    pub(crate) fn shared(&self, consumer: &'static str) -> Result<Rc<Shared>, ViewportError> {
        let weak = self
            .provider
            .as_ref()
            .ok_or(ViewportError::NoProvider { consumer })?;
        weak.upgrade().ok_or(ViewportError::ProviderDropped)
    }
}

enum Scope {
    Authoritative(Rc<Shared>),
    PassThrough(ViewportContext),
}

/// A provider instance at one position in a tree.
///
/// ## Usage
///
/// - At the top of a tree, use [`ViewportProvider::root`].
/// - Anywhere below, use [`ViewportProvider::resolve`] with the parent's context;
///   nested providers collapse into pass-throughs.
/// - Hand [`ViewportProvider::context`] to descendants. They subscribe through it
///   (see [`crate::subscribe`]).
pub struct ViewportProvider {
    scope: Scope,
}

impl core::fmt::Debug for ViewportProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewportProvider")
            .field("authoritative", &self.is_authoritative())
            .field("listeners", &self.listener_count())
            .field("has_listeners", &self.has_listeners())
            .finish_non_exhaustive()
    }
}

impl ViewportProvider {
    /// Resolve a provider below `parent`.
    ///
    /// `make_detector` is only called if this provider becomes authoritative.
    pub fn resolve<D, F>(
        parent: &ViewportContext,
        scheduler: Rc<dyn Scheduler>,
        make_detector: F,
    ) -> Self
    where
        D: RawDetector + 'static,
        F: FnOnce() -> D,
    {
        if parent.has_ancestor() {
            tracing::trace!("nested viewport provider resolved as pass-through");
            return Self {
                scope: Scope::PassThrough(parent.clone()),
            };
        }
        Self {
            scope: Scope::Authoritative(Shared::new(scheduler, Box::new(make_detector()))),
        }
    }

    /// Create an authoritative provider at the top of a tree.
    pub fn root<D: RawDetector + 'static>(scheduler: Rc<dyn Scheduler>, detector: D) -> Self {
        Self::resolve(&ViewportContext::root(), scheduler, || detector)
    }

    /// Whether this provider owns the registry and detector for its subtree.
    pub fn is_authoritative(&self) -> bool {
        matches!(self.scope, Scope::Authoritative(_))
    }

    /// The context to pass to descendants.
    ///
    /// For a pass-through this is the parent's context, unchanged.
    pub fn context(&self) -> ViewportContext {
        match &self.scope {
            Scope::Authoritative(shared) => ViewportContext {
                provider: Some(Rc::downgrade(shared)),
                version: crate::VERSION,
            },
            Scope::PassThrough(parent) => parent.clone(),
        }
    }

    /// Register a listener. Pass-throughs forward to the authoritative provider.
    pub fn add_listener(&self, listener: Listener) -> Result<(), ViewportError> {
        match &self.scope {
            Scope::Authoritative(shared) => {
                shared.add(listener);
                Ok(())
            }
            Scope::PassThrough(parent) => parent.add_listener(listener),
        }
    }

    /// Remove every listener registered for `key`. Returns how many were removed.
    pub fn remove_listener(&self, key: HandlerKey) -> Result<usize, ViewportError> {
        match &self.scope {
            Scope::Authoritative(shared) => Ok(shared.remove(key)),
            Scope::PassThrough(parent) => parent.remove_listener(key),
        }
    }

    /// A push handle into this provider's notification engine.
    ///
    /// `None` for a pass-through, which has no engine of its own.
    pub fn update_sink(&self) -> Option<UpdateSink> {
        match &self.scope {
            Scope::Authoritative(shared) => Some(UpdateSink::new(Rc::downgrade(shared))),
            Scope::PassThrough(_) => None,
        }
    }

    /// Push one event straight into the notification engine, bypassing the detector.
    ///
    /// Returns the number of handlers invoked. A pass-through has no engine and returns `0`.
    pub fn dispatch(&self, viewport: Viewport, changes: ViewportChange, is_idle: bool) -> usize {
        match &self.scope {
            Scope::Authoritative(shared) => shared.dispatch(viewport, changes, is_idle),
            Scope::PassThrough(_) => 0,
        }
    }

    /// Whether the detector is currently mounted (the settled activation state).
    ///
    /// Always `false` for a pass-through.
    pub fn has_listeners(&self) -> bool {
        match &self.scope {
            Scope::Authoritative(shared) => shared.activation.is_active(),
            Scope::PassThrough(_) => false,
        }
    }

    /// Number of listener records in this provider's registry.
    ///
    /// Always `0` for a pass-through.
    pub fn listener_count(&self) -> usize {
        match &self.scope {
            Scope::Authoritative(shared) => shared.registry.borrow().len(),
            Scope::PassThrough(_) => 0,
        }
    }

    /// Number of activation re-evaluations that have run.
    pub fn activation_evaluations(&self) -> u64 {
        match &self.scope {
            Scope::Authoritative(shared) => shared.activation.evaluations(),
            Scope::PassThrough(_) => 0,
        }
    }

    /// The most recent viewport pushed by the detector.
    pub fn current_viewport(&self) -> Viewport {
        match &self.scope {
            Scope::Authoritative(shared) => shared.current_viewport(),
            Scope::PassThrough(parent) => parent.current_viewport(),
        }
    }
}

impl Drop for ViewportProvider {
    fn drop(&mut self) {
        if let Scope::Authoritative(shared) = &self.scope {
            shared.teardown();
        }
    }
}
