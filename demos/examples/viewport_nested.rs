// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested providers.
//!
//! Providers resolved below an authoritative provider become pass-throughs.
//! Only the root builds a detector, and every subscription lands in its registry.
//!
//! Run:
//! - `cargo run -p understory_viewport_demos --example viewport_nested`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Size};
use understory_viewport::{
    ManualDetector, TaskQueue, UpdateOptions, Viewport, ViewportContext, ViewportProvider,
};

fn main() {
    let queue = Rc::new(TaskQueue::new());
    let detector = ManualDetector::new();
    let built = Cell::new(0);
    let make = || {
        built.set(built.get() + 1);
        detector.clone()
    };

    let root = ViewportProvider::resolve(&ViewportContext::root(), queue.clone(), make);
    let panel = ViewportProvider::resolve(&root.context(), queue.clone(), make);
    let widget = ViewportProvider::resolve(&panel.context(), queue.clone(), make);

    for (name, p) in [("root", &root), ("panel", &panel), ("widget", &widget)] {
        println!("{name:>6}: authoritative={}", p.is_authoritative());
    }
    println!("detectors built: {}", built.get());

    let scroll = widget.context().track_scroll(UpdateOptions::default());
    let size = panel.context().track_dimensions(UpdateOptions::default());
    queue.run_pending();
    println!("root registry holds {} listener(s)", root.listener_count());

    detector.observe(Viewport::new(Point::new(0.0, 64.0), Size::new(800.0, 600.0)));
    println!("widget sees scroll {:?}", scroll.get());
    println!("panel sees size {:?}", size.get());
}
