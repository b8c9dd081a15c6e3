#![forbid(unsafe_code)]

//! Square-cell flow grid descriptor.
//!
//! A [`LayoutDescriptor`] fixes the column count of a grid that fills the
//! container width exactly. Items are square; the edge length is derived once:
//!
//! ```text
//! edge = (container_width - (columns - 1) * spacing) / columns
//! ```
//!
//! Items flow left to right, top to bottom. The same spacing is used between
//! items in a row and between rows.
//!
//! # Invariants
//!
//! 1. `columns >= 1` and `item_edge > 0` (checked on construction).
//! 2. Descriptors are immutable after construction.
//! 3. `item_frame(i)` for any `i` lies within the container width.

use serde::Serialize;

use crate::{ItemFrame, LayoutError};

/// One grid configuration of the collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutDescriptor {
    columns: u16,
    item_edge: f64,
    spacing: f64,
}

impl LayoutDescriptor {
    /// Derive a descriptor for `columns` square items across `container_width`.
    pub fn new(columns: u16, container_width: f64, spacing: f64) -> Result<Self, LayoutError> {
        if columns == 0 {
            return Err(LayoutError::ZeroColumns);
        }
        if !container_width.is_finite() || container_width <= 0.0 {
            return Err(LayoutError::InvalidContainerWidth {
                width: container_width,
            });
        }
        if !spacing.is_finite() || spacing < 0.0 {
            return Err(LayoutError::InvalidSpacing { spacing });
        }

        let cols = f64::from(columns);
        let edge = (container_width - (cols - 1.0) * spacing) / cols;
        if edge <= 0.0 {
            return Err(LayoutError::ItemTooSmall { columns, edge });
        }

        Ok(Self {
            columns,
            item_edge: edge,
            spacing,
        })
    }

    #[inline]
    #[must_use]
    pub const fn columns(&self) -> u16 {
        self.columns
    }

    /// Edge length of each (square) item.
    #[inline]
    #[must_use]
    pub const fn item_edge(&self) -> f64 {
        self.item_edge
    }

    /// Horizontal gap between items in a row.
    #[inline]
    #[must_use]
    pub const fn interitem_spacing(&self) -> f64 {
        self.spacing
    }

    /// Vertical gap between rows.
    #[inline]
    #[must_use]
    pub const fn line_spacing(&self) -> f64 {
        self.spacing
    }

    /// Distance from one item's origin to the next item's origin in a row.
    #[inline]
    fn pitch(&self) -> f64 {
        self.item_edge + self.spacing
    }

    /// Number of rows needed for `item_count` items.
    #[must_use]
    pub fn rows(&self, item_count: usize) -> usize {
        item_count.div_ceil(usize::from(self.columns))
    }

    /// Frame of the item at `index`.
    #[must_use]
    pub fn item_frame(&self, index: usize) -> ItemFrame {
        let cols = usize::from(self.columns);
        let (row, col) = (index / cols, index % cols);
        ItemFrame::new(
            col as f64 * self.pitch(),
            row as f64 * self.pitch(),
            self.item_edge,
            self.item_edge,
        )
    }

    /// Frames of the first `item_count` items.
    #[must_use]
    pub fn frames(&self, item_count: usize) -> Vec<ItemFrame> {
        (0..item_count).map(|i| self.item_frame(i)).collect()
    }

    /// Total scrollable height for `item_count` items.
    #[must_use]
    pub fn content_height(&self, item_count: usize) -> f64 {
        match self.rows(item_count) {
            0 => 0.0,
            rows => rows as f64 * self.item_edge + (rows - 1) as f64 * self.spacing,
        }
    }
}
