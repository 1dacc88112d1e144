//! Error types for lattice indexing.

use thiserror::Error;

/// Errors arising from index mapping construction or lookups.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// Dimension outside `1..=3`.
    #[error("lattice dimension must be 1, 2 or 3, got {dimension}")]
    InvalidDimension {
        /// The requested dimension.
        dimension: usize,
    },
    /// The unit cell holds no sites.
    #[error("sites-per-unit-cell constant must be at least 1")]
    NoSites,
    /// A repeat count is zero.
    #[error("repeat count on axis {axis} must be at least 1")]
    EmptyAxis {
        /// Zero-based axis.
        axis: usize,
    },
    /// A repeat count was given for an axis beyond the dimension.
    #[error("axis {axis} is unused in a {dimension}D lattice, its repeat count must be 1, got {extent}")]
    ExcessAxis {
        /// Zero-based axis.
        axis: usize,
        /// The repeat count given.
        extent: u32,
        /// Lattice dimension.
        dimension: usize,
    },
    /// A repeat count does not fit the `i32` cell coordinates.
    #[error("repeat count {extent} on axis {axis} exceeds {max}")]
    AxisTooLarge {
        /// Zero-based axis.
        axis: usize,
        /// The repeat count given.
        extent: u32,
        /// Largest supported repeat count.
        max: u32,
    },
    /// The total number of sites does not fit in `u64`.
    #[error("total site count overflows u64")]
    VolumeOverflow,
    /// A linear index is outside `[1, volume]`.
    #[error("linear index {index} out of range [1, {volume}]")]
    IndexOutOfRange {
        /// The offending index.
        index: u64,
        /// Number of sites in the system.
        volume: u64,
    },
    /// A site index is outside `[1, S]`.
    #[error("site index {local} out of range [1, {sites_per_cell}]")]
    LocalOutOfRange {
        /// The offending site index.
        local: u32,
        /// Sites per unit cell.
        sites_per_cell: u32,
    },
}
