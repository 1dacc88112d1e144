//! Strongly-typed identifiers and the [`Offset`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a species within a process list.
///
/// Species are numbered in declaration order starting at zero.
/// `SpeciesId(n)` corresponds to the n-th species of the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeciesId(pub u32);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SpeciesId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a process within a process list.
///
/// Processes are numbered in declaration order starting at one, matching
/// the process constants written into the generated kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ProcessId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Global index of a site type within the unit cell.
///
/// Site types are enumerated layer by layer, in declaration order,
/// starting at one. The largest index equals the sites-per-unit-cell
/// constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteIndex(pub u32);

impl fmt::Display for SiteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SiteIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// An integer unit-cell offset.
///
/// Its length always equals the model dimension (1 to 3). `SmallVec`
/// keeps every offset of a three-dimensional model inline.
pub type Offset = SmallVec<[i32; 3]>;

/// Returns `true` if every component of `offset` is zero.
pub fn is_zero(offset: &[i32]) -> bool {
    offset.iter().all(|&c| c == 0)
}
