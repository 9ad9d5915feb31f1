//! Flat-index ↔ coordinate mapping for multi-dimensional grids.
//!
//! The first axis varies fastest: `index = Σ coordinates[k] · spacing[k]`
//! with `spacing[0] = 1` and `spacing[k] = spacing[k-1] · dim[k-1]`.

use ql_core::{errors::Result, Size};

/// Position on a grid: the flat index together with its coordinates.
///
/// Two iterators compare equal when their flat indices agree, so an
/// iterator can be tested against [`FdmLinearOpLayout::end`].
#[derive(Debug, Clone)]
pub struct FdmLinearOpIterator {
    index: Size,
    dim: Vec<Size>,
    coordinates: Vec<Size>,
}

impl FdmLinearOpIterator {
    fn new(dim: &[Size], index: Size, coordinates: Vec<Size>) -> Self {
        Self {
            index,
            dim: dim.to_vec(),
            coordinates,
        }
    }

    /// Flat index of the current point.
    pub fn index(&self) -> Size {
        self.index
    }

    /// Coordinates of the current point, one entry per axis.
    pub fn coordinates(&self) -> &[Size] {
        &self.coordinates
    }

    /// Move to the next point (first axis fastest).
    pub fn increment(&mut self) {
        for (c, &d) in self.coordinates.iter_mut().zip(self.dim.iter()) {
            *c += 1;
            if *c == d {
                *c = 0;
            } else {
                break;
            }
        }
        self.index += 1;
    }
}

impl PartialEq for FdmLinearOpIterator {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for FdmLinearOpIterator {}

/// Memory layout of a multi-dimensional grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdmLinearOpLayout {
    dim: Vec<Size>,
    spacing: Vec<Size>,
    size: Size,
}

impl FdmLinearOpLayout {
    /// Build the layout for the given per-axis sizes.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`](ql_core::Error::InvalidArgument) if `dim`
    /// is empty or any axis has no points.
    pub fn new(dim: Vec<Size>) -> Result<Self> {
        ql_core::ensure_arg!(!dim.is_empty(), "layout needs at least one dimension");
        ql_core::ensure_arg!(
            dim.iter().all(|&d| d > 0),
            "every layout dimension must be positive, got {dim:?}"
        );
        let mut spacing = Vec::with_capacity(dim.len());
        let mut size = 1;
        for &d in &dim {
            spacing.push(size);
            size *= d;
        }
        Ok(Self { dim, spacing, size })
    }

    /// Points per axis.
    pub fn dim(&self) -> &[Size] {
        &self.dim
    }

    /// Flat-index stride of each axis.
    pub fn spacing(&self) -> &[Size] {
        &self.spacing
    }

    /// Total number of grid points.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Iterator positioned on the first grid point.
    pub fn begin(&self) -> FdmLinearOpIterator {
        FdmLinearOpIterator::new(&self.dim, 0, vec![0; self.dim.len()])
    }

    /// Past-the-end sentinel.
    pub fn end(&self) -> FdmLinearOpIterator {
        FdmLinearOpIterator::new(&self.dim, self.size, vec![0; self.dim.len()])
    }

    /// Visit every grid point once, in flat-index order.
    ///
    /// Each call starts a fresh, independent traversal.
    pub fn iter(&self) -> LayoutIter<'_> {
        LayoutIter {
            current: self.begin(),
            layout: self,
        }
    }

    /// Flat index of `coordinates`.
    pub fn index(&self, coordinates: &[Size]) -> Size {
        coordinates
            .iter()
            .zip(self.spacing.iter())
            .map(|(c, s)| c * s)
            .sum()
    }

    /// Coordinates of the flat `index`.
    ///
    /// # Errors
    /// [`Error::IndexOutOfRange`](ql_core::Error::IndexOutOfRange) if
    /// `index >= size()`.
    pub fn coordinates(&self, index: Size) -> Result<Vec<Size>> {
        if index >= self.size {
            return Err(ql_core::Error::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        let mut rest = index;
        let mut coordinates = vec![0; self.dim.len()];
        for k in (0..self.dim.len()).rev() {
            coordinates[k] = rest / self.spacing[k];
            rest %= self.spacing[k];
        }
        Ok(coordinates)
    }

    /// Coordinate along axis `i` after moving by `offset`, reflected back
    /// into `[0, dim[i])` at either edge.
    fn reflected(&self, coordinate: Size, i: Size, offset: isize) -> Size {
        let n = self.dim[i] as isize;
        if n == 1 {
            return 0;
        }
        let mut c = coordinate as isize + offset;
        if c < 0 {
            c = -c;
        } else if c >= n {
            c = 2 * (n - 1) - c;
        }
        c.clamp(0, n - 1) as Size
    }

    /// Flat index of the neighbour `offset` points away along axis `i`.
    pub fn neighbourhood(&self, iter: &FdmLinearOpIterator, i: Size, offset: isize) -> Size {
        let c = iter.coordinates[i];
        let base = iter.index - c * self.spacing[i];
        base + self.reflected(c, i, offset) * self.spacing[i]
    }

    /// Flat index of the neighbour displaced along two axes at once.
    pub fn neighbourhood2(
        &self,
        iter: &FdmLinearOpIterator,
        i1: Size,
        offset1: isize,
        i2: Size,
        offset2: isize,
    ) -> Size {
        let c1 = iter.coordinates[i1];
        let c2 = iter.coordinates[i2];
        let base = iter.index - c1 * self.spacing[i1] - c2 * self.spacing[i2];
        base + self.reflected(c1, i1, offset1) * self.spacing[i1]
            + self.reflected(c2, i2, offset2) * self.spacing[i2]
    }
}

/// Borrowing traversal over all points of a [`FdmLinearOpLayout`].
#[derive(Debug)]
pub struct LayoutIter<'a> {
    current: FdmLinearOpIterator,
    layout: &'a FdmLinearOpLayout,
}

impl Iterator for LayoutIter<'_> {
    type Item = FdmLinearOpIterator;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.index >= self.layout.size {
            return None;
        }
        let item = self.current.clone();
        self.current.increment();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.layout.size - self.current.index.min(self.layout.size);
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for LayoutIter<'_> {}

impl<'a> IntoIterator for &'a FdmLinearOpLayout {
    type Item = FdmLinearOpIterator;
    type IntoIter = LayoutIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_and_spacing() {
        let layout = FdmLinearOpLayout::new(vec![3, 4, 2]).unwrap();
        assert_eq!(layout.size(), 24);
        assert_eq!(layout.spacing(), &[1, 3, 12]);
        assert_eq!(layout.index(&[2, 1, 1]), 2 + 3 + 12);
        assert_eq!(layout.coordinates(17).unwrap(), vec![2, 1, 1]);
    }

    #[test]
    fn iteration_visits_every_point_in_order() {
        let layout = FdmLinearOpLayout::new(vec![3, 2]).unwrap();
        let visited: Vec<(Size, Vec<Size>)> = layout
            .iter()
            .map(|it| (it.index(), it.coordinates().to_vec()))
            .collect();
        assert_eq!(
            visited,
            vec![
                (0, vec![0, 0]),
                (1, vec![1, 0]),
                (2, vec![2, 0]),
                (3, vec![0, 1]),
                (4, vec![1, 1]),
                (5, vec![2, 1]),
            ]
        );
    }

    #[test]
    fn begin_end_sentinel() {
        let layout = FdmLinearOpLayout::new(vec![2, 2]).unwrap();
        let mut it = layout.begin();
        let end = layout.end();
        let mut count = 0;
        while it != end {
            count += 1;
            it.increment();
        }
        assert_eq!(count, 4);
        // a second traversal is independent of the first
        assert_eq!(layout.iter().count(), 4);
    }

    #[test]
    fn neighbours_reflect_at_edges() {
        let layout = FdmLinearOpLayout::new(vec![4, 3]).unwrap();
        let first = layout.begin();
        assert_eq!(layout.neighbourhood(&first, 0, -1), 1);
        assert_eq!(layout.neighbourhood(&first, 0, 1), 1);
        assert_eq!(layout.neighbourhood(&first, 1, 1), 4);
        assert_eq!(layout.neighbourhood(&first, 1, -1), 4);

        let last = layout.iter().last().unwrap();
        assert_eq!(last.coordinates(), &[3, 2]);
        assert_eq!(layout.neighbourhood(&last, 0, 1), layout.index(&[2, 2]));
        assert_eq!(layout.neighbourhood(&last, 1, 1), layout.index(&[3, 1]));
        assert_eq!(
            layout.neighbourhood2(&last, 0, -1, 1, -1),
            layout.index(&[2, 1])
        );
    }

    #[test]
    fn invalid_layouts() {
        assert!(FdmLinearOpLayout::new(vec![]).is_err());
        assert!(FdmLinearOpLayout::new(vec![3, 0]).is_err());
        let layout = FdmLinearOpLayout::new(vec![3]).unwrap();
        assert!(layout.coordinates(3).is_err());
    }
}
