#![forbid(unsafe_code)]

//! Linear geometry blend between two grid layouts.
//!
//! Each item moves on a straight line from its frame in `from` to its frame
//! in `to`, by the same fraction.

use pgrid_layout::{ItemFrame, LayoutDescriptor};

/// Frames of the first `item_count` items at `progress` between two layouts.
#[must_use]
pub fn blend_frames(
    from: &LayoutDescriptor,
    to: &LayoutDescriptor,
    progress: f64,
    item_count: usize,
) -> Vec<ItemFrame> {
    (0..item_count)
        .map(|i| from.item_frame(i).lerp(&to.item_frame(i), progress))
        .collect()
}

/// Scrollable height at `progress` between two layouts.
#[must_use]
pub fn blend_content_height(
    from: &LayoutDescriptor,
    to: &LayoutDescriptor,
    progress: f64,
    item_count: usize,
) -> f64 {
    let t = progress.clamp(0.0, 1.0);
    let (a, b) = (from.content_height(item_count), to.content_height(item_count));
    a * (1.0 - t) + b * t
}
