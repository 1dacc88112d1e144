//! The index mapping kept symbolic in the system repeat counts.
//!
//! The compiler knows the dimension and the sites-per-cell constant `S`,
//! but the repeat counts `(Nx, Ny, Nz)` are runtime parameters of the
//! generated kernel. [`IndexFormula`] describes the mapping as a list of
//! terms that an emitter can render in any target language, and can be
//! evaluated here against concrete extents for testing.

use std::fmt;

use kmcgen_core::ProcessList;
use smallvec::SmallVec;

use crate::error::LatticeError;

/// A lattice axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// First axis.
    X,
    /// Second axis.
    Y,
    /// Third axis.
    Z,
}

impl Axis {
    /// All axes in order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Zero-based position of the axis.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The first `dimension` axes.
    pub fn active(dimension: usize) -> &'static [Axis] {
        &Self::ALL[..dimension.min(3)]
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// One summand of the forward mapping:
/// `(coord[axis] mod N[axis]) * product(N[a] for a in stride)`.
///
/// The whole cell sum is multiplied by `S` and the local index is added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardTerm {
    /// Axis whose wrapped coordinate this term carries.
    pub axis: Axis,
    /// Axes whose repeat counts multiply the term. Empty for the first axis.
    pub stride: SmallVec<[Axis; 2]>,
}

/// One component of the inverse mapping. With `cell = (index - 1) / S`:
/// `coord[axis] = (cell / product(N[a] for a in divisor)) mod N[modulus]`.
///
/// `modulus` is `None` for the outermost axis, which needs no wrap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InverseTerm {
    /// Axis this component computes.
    pub axis: Axis,
    /// Axes whose repeat counts divide the cell number.
    pub divisor: SmallVec<[Axis; 2]>,
    /// Axis whose repeat count wraps the quotient.
    pub modulus: Option<Axis>,
}

/// Symbolic index mapping for a given dimension and sites-per-cell count.
///
/// # Examples
///
/// ```
/// use kmcgen_lattice::{Axis, IndexFormula};
///
/// let f = IndexFormula::new(2, 2).unwrap();
/// let forward = f.forward();
/// assert_eq!(forward.len(), 2);
/// assert_eq!(forward[1].axis, Axis::Y);
/// assert_eq!(forward[1].stride.as_slice(), &[Axis::X]);
///
/// // (1, 2) in a 3 x 4 system, second site: 2 * (1 + 3 * 2) + 2
/// assert_eq!(f.evaluate_forward(&[3, 4], [1, 2, 0], 2), 16);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexFormula {
    dimension: usize,
    sites_per_cell: u32,
}

impl IndexFormula {
    /// Create a formula.
    pub fn new(dimension: usize, sites_per_cell: u32) -> Result<Self, LatticeError> {
        if !(1..=3).contains(&dimension) {
            return Err(LatticeError::InvalidDimension { dimension });
        }
        if sites_per_cell == 0 {
            return Err(LatticeError::NoSites);
        }
        Ok(Self {
            dimension,
            sites_per_cell,
        })
    }

    /// Create the formula for a model.
    pub fn for_model(model: &ProcessList) -> Result<Self, LatticeError> {
        Self::new(model.dimension(), model.sites_per_cell())
    }

    /// Lattice dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Sites per unit cell (`S`).
    pub fn sites_per_cell(&self) -> u32 {
        self.sites_per_cell
    }

    /// Active axes.
    pub fn axes(&self) -> &'static [Axis] {
        Axis::active(self.dimension)
    }

    /// Forward terms, one per active axis, innermost first.
    pub fn forward(&self) -> Vec<ForwardTerm> {
        let axes = self.axes();
        axes.iter()
            .enumerate()
            .map(|(i, &axis)| ForwardTerm {
                axis,
                stride: axes[..i].iter().copied().collect(),
            })
            .collect()
    }

    /// Inverse terms, one per active axis, innermost first.
    pub fn inverse(&self) -> Vec<InverseTerm> {
        let axes = self.axes();
        let last = axes.len() - 1;
        axes.iter()
            .enumerate()
            .map(|(i, &axis)| InverseTerm {
                axis,
                divisor: axes[..i].iter().copied().collect(),
                modulus: (i < last).then_some(axis),
            })
            .collect()
    }

    /// Evaluate the forward mapping against concrete repeat counts.
    ///
    /// `extents` must cover the active axes with non-zero counts; missing
    /// trailing entries count as one.
    pub fn evaluate_forward(&self, extents: &[u32], cell: [i32; 3], local: u32) -> u64 {
        let extent = |a: Axis| extents.get(a.index()).copied().unwrap_or(1).max(1) as i64;
        let cell_number: i64 = self
            .forward()
            .iter()
            .map(|term| {
                let wrapped = (cell[term.axis.index()] as i64).rem_euclid(extent(term.axis));
                term.stride.iter().fold(wrapped, |acc, &a| acc * extent(a))
            })
            .sum();
        self.sites_per_cell as u64 * cell_number as u64 + local as u64
    }

    /// Evaluate the inverse mapping against concrete repeat counts.
    ///
    /// Returns the cell coordinates and one-based local index.
    pub fn evaluate_inverse(&self, extents: &[u32], index: u64) -> ([i32; 3], u32) {
        let extent = |a: Axis| extents.get(a.index()).copied().unwrap_or(1).max(1) as u64;
        let n = index.saturating_sub(1);
        let s = self.sites_per_cell as u64;
        let local = (n % s) as u32 + 1;
        let cell_number = n / s;
        let mut cell = [0i32; 3];
        for term in self.inverse() {
            let divisor: u64 = term.divisor.iter().map(|&a| extent(a)).product();
            let mut value = cell_number / divisor;
            if let Some(m) = term.modulus {
                value %= extent(m);
            }
            cell[term.axis.index()] = value as i32;
        }
        (cell, local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{IndexMapping, LatticeSite};
    use proptest::prelude::*;

    #[test]
    fn terms_follow_axis_nesting() {
        let f = IndexFormula::new(3, 1).unwrap();
        let fwd = f.forward();
        assert_eq!(fwd[0].stride.len(), 0);
        assert_eq!(fwd[2].stride.as_slice(), &[Axis::X, Axis::Y]);
        let inv = f.inverse();
        assert_eq!(inv[0].modulus, Some(Axis::X));
        assert_eq!(inv[1].divisor.as_slice(), &[Axis::X]);
        assert_eq!(inv[2].modulus, None);
    }

    #[test]
    fn one_dimensional_inverse_has_no_wrap() {
        let f = IndexFormula::new(1, 4).unwrap();
        let inv = f.inverse();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv[0].modulus, None);
        assert_eq!(f.evaluate_inverse(&[5], 20), ([4, 0, 0], 4));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(IndexFormula::new(4, 1).is_err());
        assert!(IndexFormula::new(2, 0).is_err());
    }

    #[test]
    fn axis_display() {
        let names: Vec<String> = Axis::ALL.iter().map(|a| a.to_string()).collect();
        assert_eq!(names, ["x", "y", "z"]);
    }

    proptest! {
        #[test]
        fn agrees_with_mapping(
            dimension in 1usize..=3,
            s in 1u32..5,
            nx in 1u32..7, ny in 1u32..7, nz in 1u32..7,
            x in -10i32..10, y in -10i32..10, z in -10i32..10,
            local in 1u32..5,
        ) {
            let extents = [nx, ny, nz];
            let extents = &extents[..dimension];
            let local = (local - 1) % s + 1;
            let mut cell = [x, y, z];
            for c in cell.iter_mut().skip(dimension) {
                *c = 0;
            }
            let f = IndexFormula::new(dimension, s).unwrap();
            let m = IndexMapping::new(dimension, s, extents).unwrap();

            let expected = m.to_index(&LatticeSite::new(cell, local)).unwrap();
            prop_assert_eq!(f.evaluate_forward(extents, cell, local), expected);

            let site = m.to_coord(expected).unwrap();
            prop_assert_eq!(f.evaluate_inverse(extents, expected), (site.cell, site.local));
        }
    }
}
