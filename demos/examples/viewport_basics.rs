// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport basics.
//!
//! One provider, a manual detector fed with snapshots, and three observers with
//! different interests. Shows which observers hear about which change.
//!
//! Run:
//! - `cargo run -p understory_viewport_demos --example viewport_basics`

use std::rc::Rc;

use kurbo::{Point, Size};
use understory_viewport::{
    ManualDetector, TaskQueue, UpdateOptions, Viewport, ViewportChangeOptions, ViewportProvider,
};

fn main() {
    let queue = Rc::new(TaskQueue::new());
    let detector = ManualDetector::new();
    let provider = ViewportProvider::root(queue.clone(), detector.clone());
    let ctx = provider.context();

    let _scroll = ctx.on_scroll(
        |scroll, _: Option<&()>| println!("  [scroll]     y={}", scroll.y),
        ViewportChangeOptions::default(),
    );
    let _resize = ctx.on_dimensions(
        |size, _: Option<&()>| println!("  [dimensions] {}x{}", size.width, size.height),
        ViewportChangeOptions::default(),
    );
    let _settled = ctx.on_scroll(
        |scroll, _: Option<&()>| println!("  [idle]       settled at y={}", scroll.y),
        ViewportChangeOptions::default().defer_update_until_idle(),
    );
    let tracked = ctx.track_viewport(UpdateOptions::default());

    println!("detector mounted before loop turn: {}", detector.is_mounted());
    queue.run_pending();
    println!("detector mounted after loop turn:  {}", detector.is_mounted());

    let frames = [
        Viewport::new(Point::new(0.0, 0.0), Size::new(1280.0, 720.0)),
        Viewport::new(Point::new(0.0, 120.0), Size::new(1280.0, 720.0)),
        Viewport::new(Point::new(0.0, 120.0), Size::new(960.0, 720.0)),
        Viewport::new(Point::new(0.0, 300.0), Size::new(960.0, 720.0)),
    ];
    for (i, frame) in frames.into_iter().enumerate() {
        println!("== frame {i} ==");
        let n = detector.observe(frame);
        println!("  {n} handler(s) invoked");
    }
    println!("== idle ==");
    detector.idle();

    println!("tracked viewport: {:?}", tracked.get());
}
