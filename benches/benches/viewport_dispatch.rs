// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_viewport::engine;
use understory_viewport::registry::ListenerRegistry;
use understory_viewport::schedule::TaskQueue;
use understory_viewport::{
    Handler, HandlerKey, Listener, ManualDetector, Viewport, ViewportChange, ViewportProvider,
};

// Listeners cycle through scroll-only, dimensions-only and both; every fifth is
// idle-gated and every fourth derives a snapshot.
fn mixed_registry(n: usize) -> ListenerRegistry {
    let mut registry = ListenerRegistry::new();
    for i in 0..n {
        let handler: Handler<f64> = Rc::new(|_, d| {
            black_box(d);
        });
        let listener = if i % 4 == 0 {
            Listener::with_derive(handler, Rc::new(|v: &Viewport| v.scroll.y + v.dimensions.height))
        } else {
            Listener::new(handler)
        };
        let kind = i % 3;
        registry.add(
            listener
                .notify_scroll(move || kind != 1)
                .notify_dimensions(move || kind != 0)
                .notify_only_when_idle(move || i % 5 == 0),
        );
    }
    registry
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let viewport = Viewport::new(Point::new(0.0, 480.0), Size::new(1280.0, 720.0));
    for &n in &[16usize, 256, 4096] {
        let listeners = mixed_registry(n).snapshot();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("scroll_n{}", n), |b| {
            b.iter(|| {
                black_box(engine::dispatch(
                    &listeners,
                    &viewport,
                    ViewportChange::SCROLL,
                    false,
                ))
            });
        });
        group.bench_function(format!("idle_all_n{}", n), |b| {
            b.iter(|| {
                black_box(engine::dispatch(
                    &listeners,
                    &viewport,
                    ViewportChange::all(),
                    true,
                ))
            });
        });
    }
    group.finish();
}

fn bench_subscription_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    for &n in &[64usize, 1024] {
        group.throughput(Throughput::Elements(n as u64 * 2));
        group.bench_function(format!("add_remove_settle_n{}", n), |b| {
            b.iter_batched(
                || {
                    let queue = Rc::new(TaskQueue::new());
                    let provider = ViewportProvider::root(queue.clone(), ManualDetector::new());
                    let handlers: Vec<Handler<()>> = (0..n)
                        .map(|_| -> Handler<()> { Rc::new(|_, _| {}) })
                        .collect();
                    (queue, provider, handlers)
                },
                |(queue, provider, handlers)| {
                    for h in &handlers {
                        let _ = provider.add_listener(Listener::new(h.clone()));
                    }
                    for h in &handlers {
                        let _ = provider.remove_listener(HandlerKey::of(h));
                    }
                    black_box(queue.run_until_idle());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_subscription_churn);
criterion_main!(benches);
