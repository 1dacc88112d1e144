//! Lattice coordinates: an integer cell offset plus a site type.

use std::fmt;

use crate::conversion::ConversionTable;
use crate::error::ModelError;
use crate::id::{self, Offset};

/// A relative or absolute lattice position.
///
/// Equality is structural: two coordinates are equal when their offsets,
/// site types and layers all match. The offset always has one component
/// per model axis.
///
/// # Examples
///
/// ```
/// use kmcgen_core::Coordinate;
/// use smallvec::smallvec;
///
/// let c = Coordinate::new(smallvec![1, 0], "cus", "ruo2");
/// assert!(!c.is_anchor());
/// assert_eq!(c.to_string(), "cus.(1, 0, 0).ruo2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    /// Unit-cell offset, one component per axis.
    pub offset: Offset,
    /// Site-type name within `layer`.
    pub site: String,
    /// Owning layer name.
    pub layer: String,
}

impl Coordinate {
    /// Create a coordinate.
    pub fn new(offset: Offset, site: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            offset,
            site: site.into(),
            layer: layer.into(),
        }
    }

    /// `true` if the offset is zero on every axis.
    pub fn is_anchor(&self) -> bool {
        id::is_zero(&self.offset)
    }

    /// Express `self` relative to `origin`.
    ///
    /// Both positions are brought into `origin`'s layer frame through
    /// `table` before subtracting, so the resulting offset is the cell
    /// distance from `origin` to `self`. The result keeps `self`'s site
    /// type and layer.
    ///
    /// Returns [`ModelError::MissingConversion`] when the layers differ and
    /// `table` has no entry for the pair.
    pub fn relative_to(
        &self,
        origin: &Coordinate,
        table: &ConversionTable,
    ) -> Result<Coordinate, ModelError> {
        let shift = table.shift(&self.layer, &origin.layer)?;
        let offset: Offset = self
            .offset
            .iter()
            .zip(origin.offset.iter())
            .zip(shift.iter())
            .map(|((&a, &o), &s)| a + s - o)
            .collect();
        Ok(Coordinate {
            offset,
            site: self.site.clone(),
            layer: self.layer.clone(),
        })
    }

    /// Offset component on `axis`, zero for axes beyond the model dimension.
    pub fn axis(&self, axis: usize) -> i32 {
        self.offset.get(axis).copied().unwrap_or(0)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.({}, {}, {}).{}",
            self.site,
            self.axis(0),
            self.axis(1),
            self.axis(2),
            self.layer
        )
    }
}
