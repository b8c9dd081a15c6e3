#![forbid(unsafe_code)]

//! Layout primitives: square-cell grid descriptors and the ordered catalog
//! a pinch gesture moves through.

pub mod catalog;
pub mod descriptor;

pub use catalog::LayoutCatalog;
pub use descriptor::LayoutDescriptor;

use serde::Serialize;
use thiserror::Error;

/// Errors building grid descriptors or catalogs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("a grid layout needs at least one column")]
    ZeroColumns,

    #[error("container width must be finite and > 0, got {width}")]
    InvalidContainerWidth { width: f64 },

    #[error("spacing must be finite and >= 0, got {spacing}")]
    InvalidSpacing { spacing: f64 },

    #[error("{columns} columns leave no room for items (edge {edge})")]
    ItemTooSmall { columns: u16, edge: f64 },

    #[error("a layout catalog needs at least one layout")]
    EmptyCatalog,

    #[error("layout index {index} is out of bounds for a catalog of {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Position and size of one item cell, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ItemFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ItemFrame {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Linear blend toward `other`; `t` is clamped to [0.0, 1.0].
    ///
    /// Returns `self` exactly at `t == 0.0` and `other` exactly at `t == 1.0`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a * (1.0 - t) + b * t;
        Self {
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
            width: mix(self.width, other.width),
            height: mix(self.height, other.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = ItemFrame::new(0.0, 0.0, 10.0, 10.0);
        let b = ItemFrame::new(20.0, 40.0, 30.0, 30.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), ItemFrame::new(10.0, 20.0, 20.0, 20.0));
    }

    #[test]
    fn lerp_endpoints_are_exact_for_uneven_geometry() {
        let a = ItemFrame::new(8.0 * 390.0 / 9.0, 0.1, 382.0 / 9.0, 1.0 / 3.0);
        let b = ItemFrame::new(55.857142857142854, 0.7, 384.0 / 7.0, 2.0 / 3.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(b.lerp(&a, 1.0), a);

        let from = LayoutDescriptor::new(9, 390.0, 1.0).unwrap();
        let to = LayoutDescriptor::new(7, 390.0, 1.0).unwrap();
        for i in 0..40 {
            let (f, g) = (from.item_frame(i), to.item_frame(i));
            assert_eq!(f.lerp(&g, 1.0), g, "item {i}");
            assert_eq!(f.lerp(&g, 0.0), f, "item {i}");
        }
    }

    #[test]
    fn lerp_clamps_t() {
        let a = ItemFrame::new(0.0, 0.0, 10.0, 10.0);
        let b = ItemFrame::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.lerp(&b, -1.0), a);
        assert_eq!(a.lerp(&b, 2.0), b);
    }

    #[test]
    fn edges() {
        let f = ItemFrame::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(f.right(), 4.0);
        assert_eq!(f.bottom(), 6.0);
    }
}
