//! Layers (sublattices) and the site types replicated in their unit cells.

/// A named position inside a layer's unit cell.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteType {
    /// Name, unique within the owning layer.
    pub name: String,
    /// Fractional position inside the unit cell.
    pub position: [f64; 3],
}

impl SiteType {
    /// Create a site type at the given fractional position.
    pub fn new(name: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// A named sublattice.
///
/// `cell_size` is the spatial extent of one unit cell. It has nothing to
/// do with how many cells the simulated system repeats; that count is only
/// known to the runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Unique layer name.
    pub name: String,
    /// Spatial unit-cell size per axis.
    pub cell_size: [f64; 3],
    /// Site types in declaration order.
    pub sites: Vec<SiteType>,
}

impl Layer {
    /// Create a layer with a unit cube cell and no sites.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell_size: [1.0, 1.0, 1.0],
            sites: Vec::new(),
        }
    }

    /// Set the spatial unit-cell size.
    pub fn with_cell_size(mut self, cell_size: [f64; 3]) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Append a site type.
    pub fn with_site(mut self, site: SiteType) -> Self {
        self.sites.push(site);
        self
    }

    /// Look up a site type by name.
    pub fn site(&self, name: &str) -> Option<&SiteType> {
        self.sites.iter().find(|s| s.name == name)
    }

    /// Zero-based position of a site type within this layer.
    pub fn site_position(&self, name: &str) -> Option<usize> {
        self.sites.iter().position(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_lookup_by_name() {
        let layer = Layer::new("ruo2")
            .with_site(SiteType::new("bridge", [0.0, 0.5, 0.7]))
            .with_site(SiteType::new("cus", [0.5, 0.5, 0.7]));
        assert_eq!(layer.site_position("cus"), Some(1));
        assert!(layer.site("hollow").is_none());
        assert_eq!(layer.site("bridge").unwrap().position[1], 0.5);
    }
}
