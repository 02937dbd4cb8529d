// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived layout snapshots.
//!
//! An element's rect is measured before any handler of the event runs, so a
//! handler that moves other content cannot skew the measurement.
//!
//! Run:
//! - `cargo run -p understory_viewport_demos --example viewport_layout`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_viewport::{ManualDetector, TaskQueue, UpdateOptions, Viewport, ViewportProvider};

fn main() {
    let queue = Rc::new(TaskQueue::new());
    let detector = ManualDetector::new();
    let provider = ViewportProvider::root(queue.clone(), detector.clone());
    let ctx = provider.context();

    // A banner laid out at document y = 400, 200 tall.
    let banner_top = Rc::new(Cell::new(400.0));
    let scroll_y = Rc::new(Cell::new(0.0));

    let (top, y) = (banner_top.clone(), scroll_y.clone());
    let measure = move || {
        let on_screen_y = top.get() - y.get();
        Some(Rect::from_origin_size(
            Point::new(0.0, on_screen_y),
            Size::new(1280.0, 200.0),
        ))
    };
    let _visible = ctx.on_rect(
        measure.clone(),
        |rect| match rect {
            Some(r) if r.y1 > 0.0 && r.y0 < 720.0 => println!("  banner visible at {r:?}"),
            Some(_) => println!("  banner off screen"),
            None => println!("  banner not laid out"),
        },
        UpdateOptions::default().disable_dimensions_updates(),
    );
    let rect = ctx.track_rect(measure, UpdateOptions::default());
    println!("initial rect: {:?}", rect.get());

    queue.run_pending();
    for y in [0.0, 300.0, 700.0] {
        scroll_y.set(y);
        println!("== scroll to {y} ==");
        detector.observe(Viewport::new(Point::new(0.0, y), Size::new(1280.0, 720.0)));
    }
    println!("tracked rect: {:?}", rect.get());
}
