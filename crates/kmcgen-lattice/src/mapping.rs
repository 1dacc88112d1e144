//! Concrete index mapping for a system with known repeat counts.

use kmcgen_core::ProcessList;

use crate::error::LatticeError;

/// A site addressed by unit-cell coordinates and a one-based site index.
///
/// Cell coordinates of axes beyond the lattice dimension are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatticeSite {
    /// Unit-cell coordinates `(x, y, z)`.
    pub cell: [i32; 3],
    /// Site index inside the unit cell, in `[1, S]`.
    pub local: u32,
}

impl LatticeSite {
    /// Create a site.
    pub fn new(cell: [i32; 3], local: u32) -> Self {
        Self { cell, local }
    }
}

/// Bijective mapping between [`LatticeSite`]s and linear storage indices.
///
/// Cell coordinates wrap periodically on every axis, so any integer cell
/// maps into the system. Axes beyond the dimension have a repeat count of
/// exactly one.
///
/// # Examples
///
/// ```
/// use kmcgen_lattice::{IndexMapping, LatticeSite};
///
/// // A 1D chain of 10 cells with one site per cell.
/// let m = IndexMapping::new(1, 1, &[10]).unwrap();
/// assert_eq!(m.volume(), 10);
/// assert_eq!(m.to_index(&LatticeSite::new([3, 0, 0], 1)).unwrap(), 4);
///
/// // Periodic wrap: cell -1 is cell 9.
/// assert_eq!(m.to_index(&LatticeSite::new([-1, 0, 0], 1)).unwrap(), 10);
/// assert_eq!(m.to_coord(10).unwrap(), LatticeSite::new([9, 0, 0], 1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexMapping {
    dimension: usize,
    sites_per_cell: u32,
    extents: [u32; 3],
    volume: u64,
}

impl IndexMapping {
    /// Largest repeat count per axis: cell coordinates use `i32`.
    pub const MAX_EXTENT: u32 = i32::MAX as u32;

    /// Create a mapping.
    ///
    /// `extents` gives the repeat count of the first `extents.len()` axes;
    /// missing axes default to one. Repeat counts for axes beyond
    /// `dimension` must be one.
    pub fn new(
        dimension: usize,
        sites_per_cell: u32,
        extents: &[u32],
    ) -> Result<Self, LatticeError> {
        if !(1..=3).contains(&dimension) {
            return Err(LatticeError::InvalidDimension { dimension });
        }
        if sites_per_cell == 0 {
            return Err(LatticeError::NoSites);
        }
        if extents.len() > 3 {
            return Err(LatticeError::ExcessAxis {
                axis: 3,
                extent: extents[3],
                dimension,
            });
        }

        let mut full = [1u32; 3];
        for (axis, &extent) in extents.iter().enumerate() {
            if extent == 0 {
                return Err(LatticeError::EmptyAxis { axis });
            }
            if axis >= dimension && extent != 1 {
                return Err(LatticeError::ExcessAxis {
                    axis,
                    extent,
                    dimension,
                });
            }
            if extent > Self::MAX_EXTENT {
                return Err(LatticeError::AxisTooLarge {
                    axis,
                    extent,
                    max: Self::MAX_EXTENT,
                });
            }
            full[axis] = extent;
        }

        let volume = full
            .iter()
            .try_fold(sites_per_cell as u64, |acc, &n| acc.checked_mul(n as u64))
            .ok_or(LatticeError::VolumeOverflow)?;

        Ok(Self {
            dimension,
            sites_per_cell,
            extents: full,
            volume,
        })
    }

    /// Create a mapping for `model` with the given repeat counts.
    pub fn for_model(model: &ProcessList, extents: &[u32]) -> Result<Self, LatticeError> {
        Self::new(model.dimension(), model.sites_per_cell(), extents)
    }

    /// Lattice dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Sites per unit cell (`S`).
    pub fn sites_per_cell(&self) -> u32 {
        self.sites_per_cell
    }

    /// Repeat counts `(Nx, Ny, Nz)`; unused axes are one.
    pub fn extents(&self) -> [u32; 3] {
        self.extents
    }

    /// Number of unit cells in the system.
    pub fn cell_count(&self) -> u64 {
        self.volume / self.sites_per_cell as u64
    }

    /// Number of sites in the system, i.e. the largest linear index.
    pub fn volume(&self) -> u64 {
        self.volume
    }

    /// Wrap a cell coordinate into the system.
    pub fn wrap_cell(&self, cell: [i32; 3]) -> [i32; 3] {
        let mut out = [0i32; 3];
        for axis in 0..3 {
            out[axis] = cell[axis].rem_euclid(self.extents[axis] as i32);
        }
        out
    }

    /// Linear index of a site. Cell coordinates wrap periodically.
    pub fn to_index(&self, site: &LatticeSite) -> Result<u64, LatticeError> {
        if site.local == 0 || site.local > self.sites_per_cell {
            return Err(LatticeError::LocalOutOfRange {
                local: site.local,
                sites_per_cell: self.sites_per_cell,
            });
        }
        let [x, y, z] = self.wrap_cell(site.cell);
        let [nx, ny, _] = self.extents;
        let cell = x as u64 + nx as u64 * (y as u64 + ny as u64 * z as u64);
        Ok(self.sites_per_cell as u64 * cell + site.local as u64)
    }

    /// Site at a linear index; the exact inverse of [`to_index`](Self::to_index).
    pub fn to_coord(&self, index: u64) -> Result<LatticeSite, LatticeError> {
        if index == 0 || index > self.volume {
            return Err(LatticeError::IndexOutOfRange {
                index,
                volume: self.volume,
            });
        }
        let n = index - 1;
        let s = self.sites_per_cell as u64;
        let [nx, ny, _] = self.extents.map(u64::from);
        let local = (n % s) as u32 + 1;
        let cell = n / s;
        let x = cell % nx;
        let y = (cell / nx) % ny;
        let z = cell / (nx * ny);
        Ok(LatticeSite {
            cell: [x as i32, y as i32, z as i32],
            local,
        })
    }

    /// Move `site` by a cell offset to site index `local`, wrapping periodically.
    ///
    /// `offset` may be shorter than three components; missing axes are zero.
    pub fn translate(&self, site: &LatticeSite, offset: &[i32], local: u32) -> LatticeSite {
        let mut cell = site.cell;
        for (axis, &d) in offset.iter().enumerate().take(3) {
            cell[axis] += d;
        }
        LatticeSite {
            cell: self.wrap_cell(cell),
            local,
        }
    }

    /// All sites in linear-index order.
    pub fn canonical_ordering(&self) -> impl Iterator<Item = LatticeSite> + '_ {
        (1..=self.volume).filter_map(move |i| self.to_coord(i).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    #[test]
    fn one_site_chain_is_offset_by_one() {
        let m = IndexMapping::new(1, 1, &[7]).unwrap();
        for x in 0..7 {
            assert_eq!(m.to_index(&LatticeSite::new([x, 0, 0], 1)).unwrap(), x as u64 + 1);
        }
    }

    #[test]
    fn local_index_is_innermost_stride() {
        let m = IndexMapping::new(2, 3, &[4, 5]).unwrap();
        let a = m.to_index(&LatticeSite::new([1, 2, 0], 1)).unwrap();
        let b = m.to_index(&LatticeSite::new([1, 2, 0], 3)).unwrap();
        assert_eq!(b - a, 2);
        assert_eq!(a, 3 * (1 + 4 * 2) + 1);
    }

    #[test]
    fn unused_axes_collapse_to_one() {
        let m = IndexMapping::new(2, 2, &[3, 3]).unwrap();
        assert_eq!(m.extents(), [3, 3, 1]);
        assert_eq!(m.cell_count(), 9);
        // z coordinates of any value wrap to zero.
        let a = m.to_index(&LatticeSite::new([1, 1, 0], 1)).unwrap();
        let b = m.to_index(&LatticeSite::new([1, 1, 5], 1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(m.to_coord(a).unwrap().cell[2], 0);
    }

    #[test]
    fn negative_cells_wrap() {
        let m = IndexMapping::new(3, 1, &[2, 3, 4]).unwrap();
        let a = m.to_index(&LatticeSite::new([-1, -1, -1], 1)).unwrap();
        let b = m.to_index(&LatticeSite::new([1, 2, 3], 1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(matches!(
            IndexMapping::new(0, 1, &[1]),
            Err(LatticeError::InvalidDimension { dimension: 0 })
        ));
        assert!(matches!(IndexMapping::new(1, 0, &[1]), Err(LatticeError::NoSites)));
        assert!(matches!(
            IndexMapping::new(2, 1, &[3, 0]),
            Err(LatticeError::EmptyAxis { axis: 1 })
        ));
        assert!(matches!(
            IndexMapping::new(1, 1, &[3, 2]),
            Err(LatticeError::ExcessAxis { axis: 1, .. })
        ));
        assert!(matches!(
            IndexMapping::new(1, 1, &[u32::MAX]),
            Err(LatticeError::AxisTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_lookups() {
        let m = IndexMapping::new(1, 2, &[3]).unwrap();
        assert!(matches!(m.to_coord(0), Err(LatticeError::IndexOutOfRange { .. })));
        assert!(matches!(m.to_coord(7), Err(LatticeError::IndexOutOfRange { .. })));
        assert!(matches!(
            m.to_index(&LatticeSite::new([0, 0, 0], 3)),
            Err(LatticeError::LocalOutOfRange { .. })
        ));
    }

    #[test]
    fn translate_wraps() {
        let m = IndexMapping::new(2, 2, &[4, 4]).unwrap();
        let s = LatticeSite::new([0, 3, 0], 1);
        assert_eq!(m.translate(&s, &[-1, 1], 2), LatticeSite::new([3, 0, 0], 2));
    }

    #[test]
    fn compliance_small_systems() {
        for (dimension, s, extents) in [
            (1, 1, vec![1]),
            (1, 3, vec![5]),
            (2, 2, vec![3, 4]),
            (3, 4, vec![2, 3, 2]),
        ] {
            let m = IndexMapping::new(dimension, s, &extents).unwrap();
            compliance::run_full_compliance(&m);
        }
    }

    proptest! {
        #[test]
        fn index_round_trip(
            dimension in 1usize..=3,
            s in 1u32..6,
            nx in 1u32..9, ny in 1u32..9, nz in 1u32..9,
            x in -20i32..20, y in -20i32..20, z in -20i32..20,
            local in 1u32..6,
        ) {
            let extents = [nx, ny, nz];
            let m = IndexMapping::new(dimension, s, &extents[..dimension]).unwrap();
            let local = (local - 1) % s + 1;
            let mut cell = [x, y, z];
            for c in cell.iter_mut().skip(dimension) {
                *c = 0;
            }
            let site = LatticeSite::new(cell, local);
            let index = m.to_index(&site).unwrap();
            prop_assert!(index >= 1 && index <= m.volume());
            let back = m.to_coord(index).unwrap();
            prop_assert_eq!(back, LatticeSite::new(m.wrap_cell(cell), local));
            prop_assert_eq!(m.to_index(&back).unwrap(), index);
        }

        #[test]
        fn coord_round_trip(
            dimension in 1usize..=3,
            s in 1u32..6,
            nx in 1u32..9, ny in 1u32..9, nz in 1u32..9,
            seed in 0u64..10_000,
        ) {
            let extents = [nx, ny, nz];
            let m = IndexMapping::new(dimension, s, &extents[..dimension]).unwrap();
            let n = seed % m.volume() + 1;
            let site = m.to_coord(n).unwrap();
            prop_assert_eq!(m.to_index(&site).unwrap(), n);
            for axis in dimension..3 {
                prop_assert_eq!(site.cell[axis], 0);
            }
        }
    }
}
