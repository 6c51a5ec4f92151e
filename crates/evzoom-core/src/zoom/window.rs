//! Zoom windows
//!
//! Sets of sequence positions, used to work out which logo columns expand,
//! which contract and which couplings are highlighted.
use std::ops::Sub;

/// Sorted, de-duplicated sequence positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub(crate) indices: Vec<usize>,
}

impl Selection {
    /// `[center - radius, center + radius]` clipped to `[0, length)`.
    pub fn window(center: i64, radius: i64, length: usize) -> Self {
        let start = (center - radius).max(0);
        let stop = (center + radius).min(length as i64 - 1);
        if start > stop {
            return Selection::default();
        }
        Selection {
            indices: (start as usize..=stop as usize).collect(),
        }
    }

    pub fn contains(&self, index: i64) -> bool {
        usize::try_from(index).is_ok_and(|k| self.indices.binary_search(&k).is_ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// First and last position.
    pub fn bounds(&self) -> Option<(usize, usize)> {
        Some((*self.indices.first()?, *self.indices.last()?))
    }

    /// Positions in `self` but not in `other`.
    pub fn not(&self, other: &Selection) -> Selection {
        let indices: Vec<_> = self
            .indices
            .iter()
            .filter(|&&idx| other.indices.binary_search(&idx).is_err())
            .cloned()
            .collect();
        Selection { indices }
    }
}

impl Sub for &Selection {
    type Output = Selection;

    fn sub(self, other: Self) -> Selection {
        self.not(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_clipping() {
        assert_eq!(Selection::window(1, 2, 10).bounds(), Some((0, 3)));
        assert_eq!(Selection::window(8, 2, 10).bounds(), Some((6, 9)));
        assert_eq!(Selection::window(5, 0, 10).bounds(), Some((5, 5)));
        assert_eq!(Selection::window(-20, 5, 10).bounds(), None);
        assert_eq!(Selection::window(3, 5, 0).bounds(), None);
    }

    #[test]
    fn test_difference_and_membership() {
        let old = Selection::window(3, 2, 20);
        let new = Selection::window(5, 2, 20);
        assert_eq!((&old - &new).iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!((&new - &old).iter().collect::<Vec<_>>(), vec![6, 7]);
        assert!(old.contains(1));
        assert!(!old.contains(-1));
        assert!(!old.contains(6));
    }
}
