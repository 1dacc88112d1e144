//! Species: the occupants a lattice site can hold.

use crate::id::SpeciesId;

/// A chemical species (or vacancy) that can occupy a site.
///
/// Exactly one species per model is the default occupant; it stands for
/// an empty site and is what every site holds after initialisation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Species {
    /// Unique name, also used as the species constant in generated code.
    pub name: String,
    /// Declaration-order identifier.
    pub id: SpeciesId,
}

impl Species {
    /// Create a species.
    pub fn new(name: impl Into<String>, id: SpeciesId) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}
