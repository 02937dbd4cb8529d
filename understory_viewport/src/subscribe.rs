// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subscription helpers on [`ViewportContext`].
//!
//! ## Overview
//!
//! These entry points turn an intent ("tell me about scrolling", "keep this
//! element's rect current") into a canonical [`Listener`] and attach it to the
//! authoritative provider for as long as the returned [`Subscription`] lives.
//!
//! Effect-style helpers call back on each qualifying event:
//!
//! - [`ViewportContext::on_viewport_change`]: full viewport, both categories unless disabled.
//! - [`ViewportContext::on_scroll`]: scroll position only.
//! - [`ViewportContext::on_dimensions`]: visible size only.
//! - [`ViewportContext::on_rect`]: a measured rect, recomputed before each delivery.
//!
//! Tracked-value helpers keep the latest value in a [`Tracked`]:
//! [`track_viewport`](ViewportContext::track_viewport),
//! [`track_scroll`](ViewportContext::track_scroll),
//! [`track_dimensions`](ViewportContext::track_dimensions),
//! [`track_layout_snapshot`](ViewportContext::track_layout_snapshot) and
//! [`track_rect`](ViewportContext::track_rect).
//!
//! ## Options are fixed per attachment
//!
//! Options are consumed when a subscription is attached. To change them, drop
//! (or [`detach`](Subscription::detach)) the subscription and attach a new one.
//!
//! ## Missing provider
//!
//! Called on a context with no provider above it, every helper logs a
//! warning and returns an inert subscription whose handler is never invoked.
//! [`ViewportContext::try_on_viewport_change`] returns the condition as an error instead.

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use kurbo::{Point, Rect, Size};

use crate::error::ViewportError;
use crate::listener::{Derive, Handler, HandlerKey, Listener};
use crate::provider::{Shared, ViewportContext};
use crate::types::{Priority, Viewport};

/// Options shared by every subscription helper.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Ignore scroll changes.
    pub disable_scroll_updates: bool,
    /// Ignore dimension changes.
    pub disable_dimensions_updates: bool,
    /// Only deliver idle updates.
    pub defer_update_until_idle: bool,
    /// Declared priority; stored but not used for ordering.
    pub priority: Priority,
}

impl UpdateOptions {
    /// Ignore scroll changes.
    #[must_use]
    pub fn disable_scroll_updates(mut self) -> Self {
        self.disable_scroll_updates = true;
        self
    }

    /// Ignore dimension changes.
    #[must_use]
    pub fn disable_dimensions_updates(mut self) -> Self {
        self.disable_dimensions_updates = true;
        self
    }

    /// Only deliver idle updates.
    #[must_use]
    pub fn defer_update_until_idle(mut self) -> Self {
        self.defer_update_until_idle = true;
        self
    }

    /// Set the declared priority.
    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    fn into_listener<T: 'static>(self, handler: Handler<T>, derive: Option<Derive<T>>) -> Listener {
        let Self {
            disable_scroll_updates,
            disable_dimensions_updates,
            defer_update_until_idle,
            priority,
        } = self;
        Listener::from_parts(handler, derive)
            .notify_scroll(move || !disable_scroll_updates)
            .notify_dimensions(move || !disable_dimensions_updates)
            .notify_only_when_idle(move || defer_update_until_idle)
            .with_priority(move || priority)
    }
}

/// Options for [`ViewportContext::on_viewport_change`] and the effect helpers.
///
/// Adds an optional layout recalculation to [`UpdateOptions`]. Its result is
/// computed fresh for each qualifying event and passed to the handler.
pub struct ViewportChangeOptions<T = ()> {
    update: UpdateOptions,
    recalculate_layout_before_update: Option<Derive<T>>,
}

impl<T> Default for ViewportChangeOptions<T> {
    fn default() -> Self {
        Self {
            update: UpdateOptions::default(),
            recalculate_layout_before_update: None,
        }
    }
}

impl<T> From<UpdateOptions> for ViewportChangeOptions<T> {
    fn from(update: UpdateOptions) -> Self {
        Self {
            update,
            recalculate_layout_before_update: None,
        }
    }
}

impl<T> core::fmt::Debug for ViewportChangeOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewportChangeOptions")
            .field("update", &self.update)
            .field(
                "recalculate_layout_before_update",
                &self.recalculate_layout_before_update.is_some(),
            )
            .finish()
    }
}

impl<T> ViewportChangeOptions<T> {
    /// Ignore scroll changes.
    #[must_use]
    pub fn disable_scroll_updates(mut self) -> Self {
        self.update = self.update.disable_scroll_updates();
        self
    }

    /// Ignore dimension changes.
    #[must_use]
    pub fn disable_dimensions_updates(mut self) -> Self {
        self.update = self.update.disable_dimensions_updates();
        self
    }

    /// Only deliver idle updates.
    #[must_use]
    pub fn defer_update_until_idle(mut self) -> Self {
        self.update = self.update.defer_update_until_idle();
        self
    }

    /// Set the declared priority.
    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.update = self.update.priority(priority);
        self
    }

    /// Compute a per-event snapshot before the handler runs.
    #[must_use]
    pub fn recalculate_layout_before_update(
        mut self,
        recalculate: impl Fn(&Viewport) -> T + 'static,
    ) -> Self {
        self.recalculate_layout_before_update = Some(Rc::new(recalculate));
        self
    }

    /// The plain update options.
    pub fn update_options(&self) -> UpdateOptions {
        self.update
    }
}

impl<T: 'static> ViewportChangeOptions<T> {
    fn into_listener(self, handler: Handler<T>) -> Listener {
        self.update
            .into_listener(handler, self.recalculate_layout_before_update)
    }
}

/// Attachment of one handler to a provider.
///
/// Detaches on drop. [`detach`](Self::detach) may be called any number of times.
/// Since removal is keyed by handler, detaching also removes any other
/// registrations of the same handler.
#[must_use = "dropping a Subscription detaches it"]
#[derive(Debug)]
pub struct Subscription {
    attached: Option<(Weak<Shared>, HandlerKey)>,
}

impl Subscription {
    /// A subscription that was never attached.
    pub fn inert() -> Self {
        Self { attached: None }
    }

    /// Whether this subscription is still attached to a live provider.
    pub fn is_attached(&self) -> bool {
        self.attached
            .as_ref()
            .is_some_and(|(shared, _)| shared.strong_count() > 0)
    }

    /// Remove the handler from its provider. Idempotent.
    pub fn detach(&mut self) {
        if let Some((shared, key)) = self.attached.take()
            && let Some(shared) = shared.upgrade()
        {
            shared.remove(key);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

/// The latest value produced by a tracking subscription.
///
/// Detaches when dropped.
#[derive(Debug)]
pub struct Tracked<T> {
    value: Rc<RefCell<T>>,
    subscription: Subscription,
}

impl<T> Tracked<T> {
    /// Run `f` with a reference to the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// The underlying subscription.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Stop tracking. The last value remains readable.
    pub fn detach(&mut self) {
        self.subscription.detach();
    }
}

impl<T: Clone> Tracked<T> {
    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

impl ViewportContext {
    fn attach(&self, consumer: &'static str, listener: Listener) -> Subscription {
        match self.try_attach(consumer, listener) {
            Ok(subscription) => subscription,
            Err(error) => {
                tracing::warn!(%error, consumer, "viewport subscription ignored");
                Subscription::inert()
            }
        }
    }

    fn try_attach(
        &self,
        consumer: &'static str,
        listener: Listener,
    ) -> Result<Subscription, ViewportError> {
        let shared = self.shared(consumer)?;
        let key = listener.key();
        shared.add(listener);
        Ok(Subscription {
            attached: Some((Rc::downgrade(&shared), key)),
        })
    }

    /// Call `handler` with the viewport (and optional recalculated layout) on each qualifying change.
    pub fn on_viewport_change<T: 'static>(
        &self,
        handler: Handler<T>,
        options: ViewportChangeOptions<T>,
    ) -> Subscription {
        self.attach("on_viewport_change", options.into_listener(handler))
    }

    /// Like [`on_viewport_change`](Self::on_viewport_change), but reports a missing provider as an error.
    pub fn try_on_viewport_change<T: 'static>(
        &self,
        handler: Handler<T>,
        options: ViewportChangeOptions<T>,
    ) -> Result<Subscription, ViewportError> {
        self.try_attach("try_on_viewport_change", options.into_listener(handler))
    }

    /// Call `effect` with the scroll position on each scroll change.
    ///
    /// Dimension updates are always disabled for this registration.
    pub fn on_scroll<T: 'static>(
        &self,
        effect: impl Fn(Point, Option<&T>) + 'static,
        options: ViewportChangeOptions<T>,
    ) -> Subscription {
        let handler: Handler<T> = Rc::new(move |v, snapshot| effect(v.scroll, snapshot));
        let listener = options.disable_dimensions_updates().into_listener(handler);
        self.attach("on_scroll", listener)
    }

    /// Call `effect` with the visible size on each dimension change.
    ///
    /// Scroll updates are always disabled for this registration.
    pub fn on_dimensions<T: 'static>(
        &self,
        effect: impl Fn(Size, Option<&T>) + 'static,
        options: ViewportChangeOptions<T>,
    ) -> Subscription {
        let handler: Handler<T> = Rc::new(move |v, snapshot| effect(v.dimensions, snapshot));
        let listener = options.disable_scroll_updates().into_listener(handler);
        self.attach("on_dimensions", listener)
    }

    /// Call `effect` with a freshly measured rect on each qualifying change.
    ///
    /// `measure` runs before any handler of the event is invoked, so it sees
    /// layout as it was when the event arrived.
    pub fn on_rect(
        &self,
        measure: impl Fn() -> Option<Rect> + 'static,
        effect: impl Fn(Option<Rect>) + 'static,
        options: UpdateOptions,
    ) -> Subscription {
        let handler: Handler<Option<Rect>> =
            Rc::new(move |_, rect| effect(rect.copied().flatten()));
        let derive: Derive<Option<Rect>> = Rc::new(move |_| measure());
        self.attach("on_rect", options.into_listener(handler, Some(derive)))
    }

    /// Call `effect` with the viewport and the result of `measure` on each qualifying change.
    ///
    /// Like [`on_rect`](Self::on_rect), every `measure` for an event runs before any handler does.
    pub fn on_layout_snapshot<T: 'static>(
        &self,
        measure: impl Fn(&Viewport) -> T + 'static,
        effect: impl Fn(&Viewport, &T) + 'static,
        options: UpdateOptions,
    ) -> Subscription {
        let handler: Handler<T> = Rc::new(move |v, snapshot| {
            if let Some(snapshot) = snapshot {
                effect(v, snapshot);
            }
        });
        let derive: Derive<T> = Rc::new(measure);
        self.attach(
            "on_layout_snapshot",
            options.into_listener(handler, Some(derive)),
        )
    }

    /// Track the full viewport.
    ///
    /// Starts from the provider's current viewport.
    pub fn track_viewport(&self, options: UpdateOptions) -> Tracked<Viewport> {
        self.track("track_viewport", self.current_viewport(), options, |v| *v)
    }

    /// Track the scroll position. Dimension changes are ignored.
    pub fn track_scroll(&self, options: UpdateOptions) -> Tracked<Point> {
        let seed = self.current_viewport().scroll;
        self.track(
            "track_scroll",
            seed,
            options.disable_dimensions_updates(),
            |v| v.scroll,
        )
    }

    /// Track the visible size. Scroll changes are ignored.
    pub fn track_dimensions(&self, options: UpdateOptions) -> Tracked<Size> {
        let seed = self.current_viewport().dimensions;
        self.track(
            "track_dimensions",
            seed,
            options.disable_scroll_updates(),
            |v| v.dimensions,
        )
    }

    /// Track the result of `measure`, recomputed on each qualifying change.
    ///
    /// `measure` runs once immediately against the current viewport to seed the value.
    pub fn track_layout_snapshot<T: Clone + 'static>(
        &self,
        measure: impl Fn(&Viewport) -> T + 'static,
        options: UpdateOptions,
    ) -> Tracked<T> {
        let measure: Derive<T> = Rc::new(measure);
        let value = Rc::new(RefCell::new(measure(&self.current_viewport())));
        let sink = value.clone();
        let handler: Handler<T> = Rc::new(move |_, snapshot| {
            if let Some(snapshot) = snapshot {
                *sink.borrow_mut() = snapshot.clone();
            }
        });
        let listener = options.into_listener(handler, Some(measure));
        Tracked {
            subscription: self.attach("track_layout_snapshot", listener),
            value,
        }
    }

    /// Track a measured rect, recomputed on each qualifying change.
    pub fn track_rect(
        &self,
        measure: impl Fn() -> Option<Rect> + 'static,
        options: UpdateOptions,
    ) -> Tracked<Option<Rect>> {
        self.track_layout_snapshot(move |_| measure(), options)
    }

    fn track<T: 'static>(
        &self,
        consumer: &'static str,
        seed: T,
        options: UpdateOptions,
        project: fn(&Viewport) -> T,
    ) -> Tracked<T> {
        let value = Rc::new(RefCell::new(seed));
        let sink = value.clone();
        let handler: Handler<()> = Rc::new(move |v, _| *sink.borrow_mut() = project(v));
        Tracked {
            subscription: self.attach(consumer, options.into_listener(handler, None)),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::ManualDetector;
    use crate::provider::ViewportProvider;
    use crate::schedule::TaskQueue;
    use crate::types::ViewportChange;
    use alloc::vec::Vec;
    use core::cell::Cell;

    struct Fixture {
        queue: Rc<TaskQueue>,
        detector: ManualDetector,
        provider: ViewportProvider,
    }

    impl Fixture {
        fn new() -> Self {
            let queue = Rc::new(TaskQueue::new());
            let detector = ManualDetector::new();
            let provider = ViewportProvider::root(queue.clone(), detector.clone());
            Self {
                queue,
                detector,
                provider,
            }
        }

        fn settle(&self) {
            self.queue.run_until_idle();
        }
    }

    fn vp(y: f64, w: f64) -> Viewport {
        Viewport::new(Point::new(0.0, y), Size::new(w, 100.0))
    }

    #[test]
    fn on_scroll_ignores_dimension_only_changes() {
        let f = Fixture::new();
        let seen: Rc<RefCell<Vec<f64>>> = Rc::default();
        let s = seen.clone();
        let _sub = f.provider.context().on_scroll(
            move |p, _: Option<&()>| s.borrow_mut().push(p.y),
            ViewportChangeOptions::default(),
        );
        f.settle();
        f.detector.observe(vp(10.0, 100.0));
        f.detector.observe(vp(10.0, 200.0));
        f.detector.observe(vp(20.0, 200.0));
        assert_eq!(*seen.borrow(), [10.0, 20.0]);
    }

    #[test]
    fn on_dimensions_ignores_scroll_only_changes() {
        let f = Fixture::new();
        let seen: Rc<RefCell<Vec<f64>>> = Rc::default();
        let s = seen.clone();
        let _sub = f.provider.context().on_dimensions(
            move |size, _: Option<&()>| s.borrow_mut().push(size.width),
            ViewportChangeOptions::default(),
        );
        f.settle();
        f.detector.observe(vp(0.0, 100.0));
        f.detector.observe(vp(50.0, 100.0));
        f.detector.observe(vp(50.0, 300.0));
        assert_eq!(*seen.borrow(), [100.0, 300.0]);
    }

    #[test]
    fn recalculated_layout_is_passed_to_the_handler() {
        let f = Fixture::new();
        let seen: Rc<RefCell<Vec<Option<f64>>>> = Rc::default();
        let s = seen.clone();
        let handler: Handler<f64> = Rc::new(move |_, half| s.borrow_mut().push(half.copied()));
        let _sub = f.provider.context().on_viewport_change(
            handler,
            ViewportChangeOptions::default()
                .recalculate_layout_before_update(|v: &Viewport| v.dimensions.width / 2.0),
        );
        f.settle();
        f.detector.observe(vp(0.0, 640.0));
        assert_eq!(*seen.borrow(), [Some(320.0)]);
    }

    #[test]
    fn deferred_subscription_only_sees_idle_updates() {
        let f = Fixture::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let _sub = f.provider.context().on_scroll(
            move |_, _: Option<&()>| c.set(c.get() + 1),
            ViewportChangeOptions::default().defer_update_until_idle(),
        );
        f.settle();
        f.detector.observe(vp(1.0, 100.0));
        f.detector.observe(vp(2.0, 100.0));
        assert_eq!(calls.get(), 0);
        assert_eq!(f.detector.idle(), 1);
        assert_eq!(calls.get(), 1);
        // Nothing new since the last idle signal.
        assert_eq!(f.detector.idle(), 0);
    }

    #[test]
    fn on_rect_measures_before_each_delivery() {
        let f = Fixture::new();
        let rect = Rc::new(Cell::new(Some(Rect::new(0.0, 0.0, 10.0, 10.0))));
        let seen: Rc<RefCell<Vec<Option<Rect>>>> = Rc::default();
        let (r, s) = (rect.clone(), seen.clone());
        let _sub = f.provider.context().on_rect(
            move || r.get(),
            move |rect| s.borrow_mut().push(rect),
            UpdateOptions::default(),
        );
        f.settle();
        f.detector.observe(vp(0.0, 100.0));
        rect.set(None);
        f.detector.observe(vp(5.0, 100.0));
        assert_eq!(
            *seen.borrow(),
            [Some(Rect::new(0.0, 0.0, 10.0, 10.0)), None]
        );
    }

    #[test]
    fn tracked_values_follow_updates() {
        let f = Fixture::new();
        let ctx = f.provider.context();
        let viewport = ctx.track_viewport(UpdateOptions::default());
        let scroll = ctx.track_scroll(UpdateOptions::default());
        let dims = ctx.track_dimensions(UpdateOptions::default());
        f.settle();
        f.detector.observe(vp(30.0, 400.0));
        assert_eq!(viewport.get(), vp(30.0, 400.0));
        assert_eq!(scroll.get(), Point::new(0.0, 30.0));
        assert_eq!(dims.get(), Size::new(400.0, 100.0));
        assert_eq!(f.provider.listener_count(), 3);
    }

    #[test]
    fn tracked_values_are_seeded_from_the_current_viewport() {
        let f = Fixture::new();
        let ctx = f.provider.context();
        let _keep = ctx.track_viewport(UpdateOptions::default());
        f.settle();
        f.detector.observe(vp(75.0, 500.0));
        let late = ctx.track_scroll(UpdateOptions::default());
        assert_eq!(late.get(), Point::new(0.0, 75.0));
        let measured = ctx.track_layout_snapshot(|v| v.scroll.y + 1.0, UpdateOptions::default());
        assert_eq!(measured.get(), 76.0);
        f.detector.observe(vp(80.0, 500.0));
        assert_eq!(measured.get(), 81.0);
    }

    #[test]
    fn track_rect_starts_with_an_immediate_measurement() {
        let f = Fixture::new();
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        let tracked = f.provider.context().track_rect(move || Some(r), UpdateOptions::default());
        assert_eq!(tracked.get(), Some(r));
        tracked.with(|rect| assert!(rect.is_some()));
    }

    #[test]
    fn detach_is_idempotent_and_drop_detaches() {
        let f = Fixture::new();
        let ctx = f.provider.context();
        let mut sub = ctx.on_scroll(|_, _: Option<&()>| {}, ViewportChangeOptions::default());
        assert!(sub.is_attached());
        sub.detach();
        sub.detach();
        assert!(!sub.is_attached());
        assert_eq!(f.provider.listener_count(), 0);
        {
            let _tracked = ctx.track_viewport(UpdateOptions::default());
            assert_eq!(f.provider.listener_count(), 1);
        }
        assert_eq!(f.provider.listener_count(), 0);
        f.settle();
        assert_eq!(f.detector.mount_count(), 0);
    }

    #[test]
    fn missing_provider_yields_inert_subscriptions() {
        let ctx = ViewportContext::root();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let mut sub = ctx.on_scroll(
            move |_, _: Option<&()>| c.set(c.get() + 1),
            ViewportChangeOptions::default(),
        );
        assert!(!sub.is_attached());
        sub.detach();
        let handler: Handler<()> = Rc::new(|_, _| {});
        let err = ctx
            .try_on_viewport_change(handler, ViewportChangeOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            ViewportError::NoProvider {
                consumer: "try_on_viewport_change"
            }
        );
        let tracked = ctx.track_scroll(UpdateOptions::default());
        assert_eq!(tracked.get(), Point::ZERO);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn subscriptions_outliving_the_provider_are_inert() {
        let f = Fixture::new();
        let mut sub = f
            .provider
            .context()
            .on_scroll(|_, _: Option<&()>| {}, ViewportChangeOptions::default());
        let Fixture { provider, .. } = f;
        drop(provider);
        assert!(!sub.is_attached());
        sub.detach();
    }

    #[test]
    fn priority_is_stored_but_does_not_reorder() {
        let f = Fixture::new();
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let (a, b) = (order.clone(), order.clone());
        let _low = f.provider.context().on_scroll(
            move |_, _: Option<&()>| a.borrow_mut().push("low"),
            ViewportChangeOptions::default().priority(Priority::Lowest),
        );
        let _high = f.provider.context().on_scroll(
            move |_, _: Option<&()>| b.borrow_mut().push("high"),
            ViewportChangeOptions::default().priority(Priority::Highest),
        );
        f.settle();
        f.detector.observe(vp(1.0, 1.0));
        assert_eq!(*order.borrow(), ["low", "high"]);
    }
    #[test]
    fn layout_snapshot_effect_receives_viewport_and_measurement() {
        let f = Fixture::new();
        let seen: Rc<RefCell<Vec<(f64, f64)>>> = Rc::default();
        let s = seen.clone();
        let _sub = f.provider.context().on_layout_snapshot(
            |v| v.dimensions.width / 2.0,
            move |v, half| s.borrow_mut().push((v.scroll.y, *half)),
            UpdateOptions::default().disable_scroll_updates(),
        );
        f.settle();
        f.detector.observe(vp(10.0, 200.0));
        f.detector.observe(vp(20.0, 200.0));
        f.detector.observe(vp(20.0, 300.0));
        assert_eq!(*seen.borrow(), [(10.0, 100.0), (20.0, 150.0)]);
    }
    fn padded_counter(calls: &Rc<Cell<usize>>) -> Handler<()> {
        let calls = calls.clone();
        let pad = [0_u8; 96];
        Rc::new(move |_, _| calls.set(calls.get() + 1 + usize::from(pad[0])))
    }

    #[test]
    fn stale_duplicate_subscription_never_detaches_a_newer_handler() {
        let f = Fixture::new();
        let ctx = f.provider.context();
        for _ in 0..16 {
            let old_calls = Rc::new(Cell::new(0));
            let shared = padded_counter(&old_calls);
            let first = ctx.on_viewport_change(shared.clone(), ViewportChangeOptions::default());
            let second = ctx.on_viewport_change(shared, ViewportChangeOptions::default());
            assert_eq!(f.provider.listener_count(), 2);
            // Removal is by handler, so this drops both records and the handler.
            drop(first);
            assert_eq!(f.provider.listener_count(), 0);

            let calls = Rc::new(Cell::new(0));
            let third =
                ctx.on_viewport_change(padded_counter(&calls), ViewportChangeOptions::default());
            drop(second);
            assert_eq!(f.provider.listener_count(), 1);
            assert!(third.is_attached());
            assert_eq!(f.provider.dispatch(vp(1.0, 10.0), ViewportChange::all(), false), 1);
            assert_eq!(calls.get(), 1);
            assert_eq!(old_calls.get(), 0);
            drop(third);
            assert_eq!(f.provider.listener_count(), 0);
        }
    }

    #[test]
    fn change_options_expose_their_update_options() {
        let update = UpdateOptions::default()
            .defer_update_until_idle()
            .priority(Priority::High);
        let options = ViewportChangeOptions::<f64>::from(update)
            .recalculate_layout_before_update(|v| v.scroll.y)
            .disable_scroll_updates();
        assert_eq!(
            options.update_options(),
            UpdateOptions {
                disable_scroll_updates: true,
                ..update
            }
        );
    }

    #[test]
    fn tracked_subscription_reports_attachment() {
        let f = Fixture::new();
        let mut tracked = f.provider.context().track_scroll(UpdateOptions::default());
        assert!(tracked.subscription().is_attached());
        tracked.detach();
        assert!(!tracked.subscription().is_attached());
        assert_eq!(f.provider.listener_count(), 0);
    }
}
