// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core value types: viewport snapshots, change flags, and priorities.
//!
//! ## Overview
//!
//! These types describe what the raw detector produces and what listeners receive.
//! They are plain values; nothing here measures or observes anything.

use kurbo::{Point, Size};

/// Combined scroll position and visible-area dimensions.
///
/// Produced by a [`RawDetector`](crate::detector::RawDetector) and handed,
/// read-only, to every listener dispatched for that event.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Scroll offset of the viewport origin.
    pub scroll: Point,
    /// Visible width and height.
    pub dimensions: Size,
}

impl Viewport {
    /// Create a viewport snapshot from a scroll offset and visible size.
    pub const fn new(scroll: Point, dimensions: Size) -> Self {
        Self { scroll, dimensions }
    }
}

bitflags::bitflags! {
    /// What changed relative to the previous viewport snapshot.
    ///
    /// Accompanies each snapshot pushed through an
    /// [`UpdateSink`](crate::detector::UpdateSink). The flags describe *which*
    /// categories moved, not the new values themselves.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ViewportChange: u8 {
        /// The scroll position changed.
        const SCROLL     = 0b0000_0001;
        /// The visible dimensions changed.
        const DIMENSIONS = 0b0000_0010;
    }
}

impl ViewportChange {
    /// Build change flags from the two update booleans a detector reports.
    pub const fn from_updates(scroll_did_update: bool, dimensions_did_update: bool) -> Self {
        let mut bits = 0;
        if scroll_did_update {
            bits |= Self::SCROLL.bits();
        }
        if dimensions_did_update {
            bits |= Self::DIMENSIONS.bits();
        }
        Self::from_bits_retain(bits)
    }

    /// True if the scroll position changed.
    pub const fn scroll_did_update(self) -> bool {
        self.contains(Self::SCROLL)
    }

    /// True if the visible dimensions changed.
    pub const fn dimensions_did_update(self) -> bool {
        self.contains(Self::DIMENSIONS)
    }
}

/// Declared delivery priority of a listener.
///
/// Accepted and stored on every listener, but not consulted for ordering,
/// throttling or filtering. Dispatch order is always registration order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Most urgent tier.
    Highest,
    /// Above normal.
    High,
    /// The default tier.
    #[default]
    Normal,
    /// Below normal.
    Low,
    /// Least urgent tier.
    Lowest,
}
