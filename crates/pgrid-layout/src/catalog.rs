#![forbid(unsafe_code)]

//! Ordered catalog of grid layouts with a current position.
//!
//! # Invariants
//!
//! 1. The catalog holds at least one layout; its length never changes.
//! 2. `current_index() < len()` at all times.
//! 3. `current_index()` names the layout displayed at rest. Only a committed
//!    transition moves it, via [`LayoutCatalog::commit_index`].

use crate::{LayoutDescriptor, LayoutError};

/// Fixed, ordered set of layouts and the index of the active one.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCatalog {
    layouts: Vec<LayoutDescriptor>,
    current_index: usize,
}

impl LayoutCatalog {
    /// Build a catalog from prepared descriptors.
    pub fn new(layouts: Vec<LayoutDescriptor>, initial_index: usize) -> Result<Self, LayoutError> {
        if layouts.is_empty() {
            return Err(LayoutError::EmptyCatalog);
        }
        if initial_index >= layouts.len() {
            return Err(LayoutError::IndexOutOfBounds {
                index: initial_index,
                len: layouts.len(),
            });
        }
        Ok(Self {
            layouts,
            current_index: initial_index,
        })
    }

    /// Build a catalog of square-cell grids, one per column count.
    pub fn from_columns(
        columns: &[u16],
        container_width: f64,
        spacing: f64,
        initial_index: usize,
    ) -> Result<Self, LayoutError> {
        let layouts = columns
            .iter()
            .map(|&c| LayoutDescriptor::new(c, container_width, spacing))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(layouts, initial_index)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LayoutDescriptor> {
        self.layouts.get(index)
    }

    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The layout displayed at rest.
    #[must_use]
    pub fn current(&self) -> &LayoutDescriptor {
        &self.layouts[self.current_index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutDescriptor> {
        self.layouts.iter()
    }

    /// First index whose layout has `columns` columns.
    #[must_use]
    pub fn index_of_columns(&self, columns: u16) -> Option<usize> {
        self.layouts.iter().position(|l| l.columns() == columns)
    }

    /// Make `index` the layout at rest. Returns the previous index.
    pub fn commit_index(&mut self, index: usize) -> Result<usize, LayoutError> {
        if index >= self.layouts.len() {
            return Err(LayoutError::IndexOutOfBounds {
                index,
                len: self.layouts.len(),
            });
        }
        Ok(std::mem::replace(&mut self.current_index, index))
    }
}

impl<'a> IntoIterator for &'a LayoutCatalog {
    type Item = &'a LayoutDescriptor;
    type IntoIter = std::slice::Iter<'a, LayoutDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.layouts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: [u16; 7] = [17, 11, 9, 7, 5, 3, 1];

    fn catalog() -> LayoutCatalog {
        LayoutCatalog::from_columns(&COLUMNS, 390.0, 1.0, 2).unwrap()
    }

    #[test]
    fn builds_in_order() {
        let cat = catalog();
        assert_eq!(cat.len(), 7);
        assert!(!cat.is_empty());
        let cols: Vec<u16> = cat.iter().map(LayoutDescriptor::columns).collect();
        assert_eq!(cols, COLUMNS);
        assert_eq!(cat.current_index(), 2);
        assert_eq!(cat.current().columns(), 9);
    }

    #[test]
    fn empty_catalog_rejected() {
        assert_eq!(
            LayoutCatalog::new(Vec::new(), 0),
            Err(LayoutError::EmptyCatalog)
        );
    }

    #[test]
    fn initial_index_must_be_in_bounds() {
        assert_eq!(
            LayoutCatalog::from_columns(&COLUMNS, 390.0, 1.0, 7),
            Err(LayoutError::IndexOutOfBounds { index: 7, len: 7 })
        );
    }

    #[test]
    fn bad_descriptor_propagates() {
        assert_eq!(
            LayoutCatalog::from_columns(&[3, 0], 390.0, 1.0, 0),
            Err(LayoutError::ZeroColumns)
        );
    }

    #[test]
    fn commit_moves_current_and_returns_previous() {
        let mut cat = catalog();
        assert_eq!(cat.commit_index(4), Ok(2));
        assert_eq!(cat.current_index(), 4);
        assert_eq!(cat.current().columns(), 5);
    }

    #[test]
    fn commit_out_of_bounds_leaves_current() {
        let mut cat = catalog();
        assert!(cat.commit_index(9).is_err());
        assert_eq!(cat.current_index(), 2);
    }

    #[test]
    fn lookup_by_columns() {
        let cat = catalog();
        assert_eq!(cat.index_of_columns(7), Some(3));
        assert_eq!(cat.index_of_columns(4), None);
    }
}
