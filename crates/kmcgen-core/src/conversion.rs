//! Explicit lattice-to-lattice conversion table.
//!
//! A multi-layer model relates the cell frames of its layers only through
//! entries registered here. A position at cell `p` in layer `from` is the
//! position `p + shift(from, to)` in layer `to`. Translating between two
//! layers with no registered entry is a consistency error; no implicit
//! fallback is attempted.

use indexmap::IndexMap;
use smallvec::smallvec;

use crate::error::ModelError;
use crate::id::Offset;

/// Per-(from, to) layer pair cell shifts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionTable {
    shifts: IndexMap<(String, String), Offset>,
}

impl ConversionTable {
    /// An empty table: only same-layer translation is possible.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table declaring that all `layers` share one unit cell, i.e. the
    /// shift between every ordered pair is zero.
    pub fn shared_unit_cell<'a>(
        layers: impl IntoIterator<Item = &'a str>,
        dimension: usize,
    ) -> Self {
        let names: Vec<&str> = layers.into_iter().collect();
        let mut table = Self::new();
        for (i, from) in names.iter().enumerate() {
            for to in &names[i + 1..] {
                table.insert(*from, *to, smallvec![0; dimension]);
            }
        }
        table
    }

    /// Register the shift from `from` to `to`.
    ///
    /// The inverse entry (`to` to `from`, negated) is registered as well so
    /// the table is always consistent in both directions.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>, shift: Offset) {
        let from = from.into();
        let to = to.into();
        let inverse: Offset = shift.iter().map(|&s| -s).collect();
        self.shifts.insert((to.clone(), from.clone()), inverse);
        self.shifts.insert((from, to), shift);
    }

    /// Shift from `from` to `to`.
    ///
    /// Same-layer lookups always succeed with a zero shift.
    pub fn shift(&self, from: &str, to: &str) -> Result<Offset, ModelError> {
        if from == to {
            return Ok(smallvec![0; 3]);
        }
        self.shifts
            .get(&(from.to_string(), to.to_string()))
            .cloned()
            .ok_or_else(|| ModelError::MissingConversion {
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    /// `true` if a translation between the two layers is defined.
    pub fn contains(&self, from: &str, to: &str) -> bool {
        from == to
            || self
                .shifts
                .contains_key(&(from.to_string(), to.to_string()))
    }

    /// Registered `(from, to, shift)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Offset)> {
        self.shifts
            .iter()
            .map(|((from, to), shift)| (from.as_str(), to.as_str(), shift))
    }

    /// Number of registered ordered pairs.
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// `true` if no pair is registered.
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}
