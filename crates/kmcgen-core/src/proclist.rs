//! The validated process list consumed by the compiler.
//!
//! [`ProcessList`] can only be obtained through [`ProcessListBuilder::build`]
//! (or the JSON loader, which uses the builder), so every instance has
//! passed [`ProcessList::validate`]. It is immutable afterwards: the
//! compiler reads it and never writes it.

use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use tracing::{debug, warn};

use crate::conversion::ConversionTable;
use crate::coord::Coordinate;
use crate::error::ModelError;
use crate::id::{Offset, ProcessId, SiteIndex, SpeciesId};
use crate::layer::{Layer, SiteType};
use crate::process::Process;
use crate::species::Species;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("identifier pattern is a valid regex")
});

/// A site type together with its layer and global unit-cell index.
#[derive(Clone, Copy, Debug)]
pub struct SiteRef<'a> {
    /// Owning layer.
    pub layer: &'a Layer,
    /// The site type.
    pub site: &'a SiteType,
    /// Global one-based index within the unit cell.
    pub index: SiteIndex,
}

/// The complete, validated kMC model.
#[derive(Clone, Debug)]
pub struct ProcessList {
    dimension: usize,
    species: Vec<Species>,
    default_species: SpeciesId,
    layers: Vec<Layer>,
    conversions: ConversionTable,
    processes: Vec<Process>,
}

impl ProcessList {
    /// Start building a model of the given dimension.
    pub fn builder(dimension: usize) -> ProcessListBuilder {
        ProcessListBuilder {
            dimension,
            species: Vec::new(),
            default_species: None,
            layers: Vec::new(),
            conversions: ConversionTable::new(),
            shared_unit_cell: false,
            processes: Vec::new(),
        }
    }

    /// Model dimension (1 to 3).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Species in declaration order.
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// The default ("empty") species.
    pub fn default_species(&self) -> &Species {
        &self.species[self.default_species.0 as usize]
    }

    /// Layers in declaration order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The first declared layer, used for coordinates without a layer suffix.
    pub fn default_layer(&self) -> &Layer {
        &self.layers[0]
    }

    /// Layer-to-layer conversion table.
    pub fn conversions(&self) -> &ConversionTable {
        &self.conversions
    }

    /// Processes in declaration order.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Processes paired with their one-based identifiers.
    pub fn processes_with_ids(&self) -> impl Iterator<Item = (ProcessId, &Process)> {
        self.processes
            .iter()
            .enumerate()
            .map(|(i, p)| (ProcessId(i as u32 + 1), p))
    }

    /// Look up a process by identifier.
    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        (id.0 as usize)
            .checked_sub(1)
            .and_then(|i| self.processes.get(i))
    }

    /// Look up a species by name.
    pub fn species_by_name(&self, name: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.name == name)
    }

    /// Look up a species by name, reporting `process` as the context of a miss.
    pub fn require_species(&self, process: &str, name: &str) -> Result<&Species, ModelError> {
        self.species_by_name(name)
            .ok_or_else(|| ModelError::UnknownSpecies {
                process: process.to_string(),
                species: name.to_string(),
            })
    }

    /// `true` if `name` is the default species.
    pub fn is_default(&self, name: &str) -> bool {
        self.default_species().name == name
    }

    /// Look up a layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Number of site types per unit cell, summed over all layers.
    pub fn sites_per_cell(&self) -> u32 {
        self.layers.iter().map(|l| l.sites.len() as u32).sum()
    }

    /// All site types in global index order.
    pub fn sites(&self) -> Vec<SiteRef<'_>> {
        let mut out = Vec::with_capacity(self.sites_per_cell() as usize);
        let mut next = 1u32;
        for layer in &self.layers {
            for site in &layer.sites {
                out.push(SiteRef {
                    layer,
                    site,
                    index: SiteIndex(next),
                });
                next += 1;
            }
        }
        out
    }

    /// Global unit-cell index of `site` in `layer`.
    pub fn site_index(&self, layer: &str, site: &str) -> Result<SiteIndex, ModelError> {
        let mut base = 0u32;
        for l in &self.layers {
            if l.name == layer {
                let pos = l.site_position(site).ok_or_else(|| ModelError::UnknownSite {
                    context: "site lookup".to_string(),
                    layer: layer.to_string(),
                    site: site.to_string(),
                })?;
                return Ok(SiteIndex(base + pos as u32 + 1));
            }
            base += l.sites.len() as u32;
        }
        Err(ModelError::UnknownLayer {
            context: "site lookup".to_string(),
            layer: layer.to_string(),
        })
    }

    /// Global unit-cell index of the site a coordinate names.
    pub fn coord_index(&self, coord: &Coordinate) -> Result<SiteIndex, ModelError> {
        self.site_index(&coord.layer, &coord.site)
    }

    /// Check every invariant the compiler relies on.
    ///
    /// Called by [`ProcessListBuilder::build`]; exposed so callers holding a
    /// model can re-assert it cheaply in tests.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(1..=3).contains(&self.dimension) {
            return Err(ModelError::InvalidDimension {
                dimension: self.dimension,
            });
        }
        if self.species.is_empty() {
            return Err(ModelError::NoSpecies);
        }
        if self.layers.is_empty() {
            return Err(ModelError::NoLayers);
        }

        let mut generated: IndexSet<String> = IndexSet::new();
        let mut claim = |kind: &'static str, name: &str| -> Result<(), ModelError> {
            if !IDENTIFIER.is_match(name) {
                return Err(ModelError::InvalidIdentifier {
                    kind,
                    name: name.to_string(),
                });
            }
            // Generated identifiers are case-insensitive.
            if !generated.insert(name.to_ascii_lowercase()) {
                return Err(ModelError::DuplicateName {
                    kind,
                    name: name.to_string(),
                });
            }
            Ok(())
        };

        for species in &self.species {
            claim("species", &species.name)?;
        }
        for layer in &self.layers {
            claim("layer", &layer.name)?;
            if layer.sites.is_empty() {
                return Err(ModelError::EmptyLayer {
                    layer: layer.name.clone(),
                });
            }
            let mut seen = IndexSet::new();
            for site in &layer.sites {
                if !seen.insert(site.name.as_str()) {
                    return Err(ModelError::DuplicateSite {
                        layer: layer.name.clone(),
                        site: site.name.clone(),
                    });
                }
                claim("site", &format!("{}_{}", layer.name, site.name))?;
            }
        }
        for process in &self.processes {
            claim("process", &process.name)?;
        }

        for (from, to, shift) in self.conversions.iter() {
            let context = format!("conversion '{from}' -> '{to}'");
            for layer in [from, to] {
                if self.layer(layer).is_none() {
                    return Err(ModelError::UnknownLayer {
                        context,
                        layer: layer.to_string(),
                    });
                }
            }
            if shift.len() != self.dimension {
                return Err(ModelError::OffsetDimension {
                    context,
                    expected: self.dimension,
                    found: shift.len(),
                });
            }
        }

        for process in &self.processes {
            self.validate_process(process)?;
        }

        self.warn_unused_species();
        Ok(())
    }

    fn validate_process(&self, process: &Process) -> Result<(), ModelError> {
        let context = format!("process '{}'", process.name);

        let mut conditions: IndexMap<&Coordinate, &str> = IndexMap::new();
        for condition in &process.conditions {
            self.check_coord(&context, &condition.coord)?;
            self.require_species(&process.name, &condition.species)?;
            if conditions
                .insert(&condition.coord, condition.species.as_str())
                .is_some()
            {
                return Err(ModelError::DuplicateCondition {
                    process: process.name.clone(),
                    coord: condition.coord.to_string(),
                });
            }
        }

        let anchor = process.anchor().ok_or_else(|| ModelError::MissingAnchor {
            process: process.name.clone(),
        })?;

        let mut acted: IndexSet<&Coordinate> = IndexSet::new();
        for action in &process.actions {
            self.check_coord(&context, &action.coord)?;
            self.require_species(&process.name, &action.species)?;
            if !conditions.contains_key(&action.coord) {
                return Err(ModelError::UnmatchedAction {
                    process: process.name.clone(),
                    coord: action.coord.to_string(),
                });
            }
            if !acted.insert(&action.coord) {
                return Err(ModelError::DuplicateAction {
                    process: process.name.clone(),
                    coord: action.coord.to_string(),
                });
            }
        }
        if process.actions.is_empty() {
            warn!(process = %process.name, "process has no actions and can never change the lattice");
        }

        // Every condition must be reachable from the anchor's layer.
        for condition in &process.conditions {
            if !self
                .conversions
                .contains(&condition.coord.layer, &anchor.coord.layer)
            {
                return Err(ModelError::MissingConversion {
                    from: condition.coord.layer.clone(),
                    to: anchor.coord.layer.clone(),
                });
            }
        }

        debug!(
            process = %process.name,
            conditions = process.conditions.len(),
            actions = process.actions.len(),
            "validated process"
        );
        Ok(())
    }

    fn check_coord(&self, context: &str, coord: &Coordinate) -> Result<(), ModelError> {
        if coord.offset.len() != self.dimension {
            return Err(ModelError::OffsetDimension {
                context: context.to_string(),
                expected: self.dimension,
                found: coord.offset.len(),
            });
        }
        let layer = self
            .layer(&coord.layer)
            .ok_or_else(|| ModelError::UnknownLayer {
                context: context.to_string(),
                layer: coord.layer.clone(),
            })?;
        if layer.site(&coord.site).is_none() {
            return Err(ModelError::UnknownSite {
                context: context.to_string(),
                layer: coord.layer.clone(),
                site: coord.site.clone(),
            });
        }
        Ok(())
    }

    fn warn_unused_species(&self) {
        for species in &self.species {
            if species.id == self.default_species {
                continue;
            }
            let used = self.processes.iter().any(|p| {
                p.conditions.iter().any(|c| c.species == species.name)
                    || p.actions.iter().any(|a| a.species == species.name)
            });
            if !used {
                warn!(species = %species.name, "species is not referenced by any process");
            }
        }
    }
}

/// Builder for [`ProcessList`].
///
/// # Examples
///
/// ```
/// use kmcgen_core::{Coordinate, Layer, Process, ProcessList, SiteType};
/// use smallvec::smallvec;
///
/// let here = Coordinate::new(smallvec![0], "a", "default");
/// let model = ProcessList::builder(1)
///     .species("empty")
///     .species("A")
///     .default_species("empty")
///     .layer(Layer::new("default").with_site(SiteType::new("a", [0.0; 3])))
///     .process(
///         Process::new("adsA", "k_ads")
///             .with_condition(here.clone(), "empty")
///             .with_action(here, "A"),
///     )
///     .build()
///     .unwrap();
/// assert_eq!(model.default_species().name, "empty");
/// ```
#[derive(Debug)]
pub struct ProcessListBuilder {
    dimension: usize,
    species: Vec<String>,
    default_species: Option<String>,
    layers: Vec<Layer>,
    conversions: ConversionTable,
    shared_unit_cell: bool,
    processes: Vec<Process>,
}

impl ProcessListBuilder {
    /// Declare a species. Identifiers follow declaration order.
    pub fn species(mut self, name: impl Into<String>) -> Self {
        self.species.push(name.into());
        self
    }

    /// Designate the default ("empty") species.
    pub fn default_species(mut self, name: impl Into<String>) -> Self {
        self.default_species = Some(name.into());
        self
    }

    /// Declare a layer.
    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Register a cell shift between two layers.
    pub fn conversion(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        shift: Offset,
    ) -> Self {
        self.conversions.insert(from, to, shift);
        self
    }

    /// Declare that all layers share one unit cell (zero shift between
    /// every pair). Applied when the model is built, after all layers are known.
    pub fn shared_unit_cell(mut self) -> Self {
        self.shared_unit_cell = true;
        self
    }

    /// Append a process.
    pub fn process(mut self, process: Process) -> Self {
        self.processes.push(process);
        self
    }

    /// Assemble and validate the model.
    pub fn build(self) -> Result<ProcessList, ModelError> {
        let mut species = Vec::with_capacity(self.species.len());
        for (i, name) in self.species.into_iter().enumerate() {
            if species.iter().any(|s: &Species| s.name == name) {
                return Err(ModelError::DuplicateName {
                    kind: "species",
                    name,
                });
            }
            species.push(Species::new(name, SpeciesId(i as u32)));
        }
        if species.is_empty() {
            return Err(ModelError::NoSpecies);
        }

        let default_name = self
            .default_species
            .unwrap_or_else(|| species[0].name.clone());
        let default_species = species
            .iter()
            .find(|s| s.name == default_name)
            .map(|s| s.id)
            .ok_or(ModelError::UnknownDefaultSpecies { name: default_name })?;

        let mut conversions = self.conversions;
        if self.shared_unit_cell {
            let shared = ConversionTable::shared_unit_cell(
                self.layers.iter().map(|l| l.name.as_str()),
                self.dimension,
            );
            for (from, to, shift) in shared.iter() {
                if !conversions.contains(from, to) {
                    conversions.insert(from, to, shift.clone());
                }
            }
        }

        let model = ProcessList {
            dimension: self.dimension,
            species,
            default_species,
            layers: self.layers,
            conversions,
            processes: self.processes,
        };
        model.validate()?;
        debug!(
            dimension = model.dimension,
            species = model.species.len(),
            layers = model.layers.len(),
            processes = model.processes.len(),
            "built process list"
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn c1(dx: i32, site: &str) -> Coordinate {
        Coordinate::new(smallvec![dx], site, "default")
    }

    fn base() -> ProcessListBuilder {
        ProcessList::builder(1)
            .species("empty")
            .species("A")
            .default_species("empty")
            .layer(
                Layer::new("default")
                    .with_site(SiteType::new("a", [0.0; 3]))
                    .with_site(SiteType::new("b", [0.5, 0.0, 0.0])),
            )
    }

    #[test]
    fn site_indices_are_one_based_and_global() {
        let model = base()
            .layer(Layer::new("top").with_site(SiteType::new("t", [0.0; 3])))
            .build()
            .unwrap();
        assert_eq!(model.sites_per_cell(), 3);
        assert_eq!(model.site_index("default", "a").unwrap(), SiteIndex(1));
        assert_eq!(model.site_index("default", "b").unwrap(), SiteIndex(2));
        assert_eq!(model.site_index("top", "t").unwrap(), SiteIndex(3));
        let sites: Vec<u32> = model.sites().iter().map(|s| s.index.0).collect();
        assert_eq!(sites, vec![1, 2, 3]);
    }

    #[test]
    fn conversion_shift_must_match_dimension() {
        let err = ProcessList::builder(2)
            .species("empty")
            .species("A")
            .layer(Layer::new("bottom").with_site(SiteType::new("a", [0.0; 3])))
            .layer(Layer::new("top").with_site(SiteType::new("t", [0.0; 3])))
            .conversion("top", "bottom", smallvec![1])
            .process(
                Process::new("p", "k")
                    .with_condition(Coordinate::new(smallvec![0, 0], "a", "bottom"), "A")
                    .with_condition(Coordinate::new(smallvec![0, 1], "t", "top"), "empty"),
            )
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::OffsetDimension { ref context, expected: 2, found: 1 }
                if context.contains("'top' -> 'bottom'") || context.contains("'bottom' -> 'top'")
        ));
    }

    #[test]
    fn conversion_to_undeclared_layer_is_rejected() {
        let err = base().conversion("default", "nowhere", smallvec![0]).build().unwrap_err();
        assert!(matches!(
            err,
            ModelError::UnknownLayer { ref layer, .. } if layer == "nowhere"
        ));
    }

    #[test]
    fn missing_anchor_is_rejected() {
        let err = base()
            .process(Process::new("p", "k").with_condition(c1(1, "a"), "A"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::MissingAnchor { process } if process == "p"));
    }

    #[test]
    fn unmatched_action_is_rejected() {
        let err = base()
            .process(
                Process::new("p", "k")
                    .with_condition(c1(0, "a"), "A")
                    .with_action(c1(1, "a"), "empty"),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::UnmatchedAction { .. }));
    }

    #[test]
    fn duplicate_condition_is_rejected() {
        let err = base()
            .process(
                Process::new("p", "k")
                    .with_condition(c1(0, "a"), "A")
                    .with_condition(c1(0, "a"), "empty"),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateCondition { .. }));
    }

    #[test]
    fn unknown_species_is_rejected() {
        let err = base()
            .process(Process::new("p", "k").with_condition(c1(0, "a"), "B"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownSpecies { species, .. } if species == "B"));
    }

    #[test]
    fn unknown_site_is_rejected() {
        let err = base()
            .process(Process::new("p", "k").with_condition(c1(0, "z"), "A"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownSite { .. }));
    }

    #[test]
    fn offset_length_must_match_dimension() {
        let wrong = Coordinate::new(smallvec![0, 0], "a", "default");
        let err = base()
            .process(Process::new("p", "k").with_condition(wrong, "A"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::OffsetDimension {
                expected: 1,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn names_clash_case_insensitively() {
        let err = base()
            .process(Process::new("a_proc", "k").with_condition(c1(0, "a"), "A"))
            .process(Process::new("A_PROC", "k").with_condition(c1(0, "a"), "A"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateName { kind: "process", .. }));
    }

    #[test]
    fn invalid_identifier_is_rejected() {
        let err = ProcessList::builder(1)
            .species("empty")
            .species("2A")
            .layer(Layer::new("default").with_site(SiteType::new("a", [0.0; 3])))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidIdentifier { kind: "species", .. }));
    }

    #[test]
    fn unknown_default_species_is_rejected() {
        let err = ProcessList::builder(1)
            .species("A")
            .default_species("empty")
            .layer(Layer::new("default").with_site(SiteType::new("a", [0.0; 3])))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownDefaultSpecies { .. }));
    }

    #[test]
    fn invalid_dimension_is_rejected() {
        let err = ProcessList::builder(4)
            .species("empty")
            .layer(Layer::new("default").with_site(SiteType::new("a", [0.0; 3])))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidDimension { dimension: 4 }));
    }

    #[test]
    fn cross_layer_condition_needs_conversion() {
        let top = Coordinate::new(smallvec![0], "t", "top");
        let builder = || {
            base()
                .layer(Layer::new("top").with_site(SiteType::new("t", [0.0; 3])))
                .process(
                    Process::new("p", "k")
                        .with_condition(c1(0, "a"), "A")
                        .with_condition(top.clone(), "empty"),
                )
        };
        assert!(matches!(
            builder().build().unwrap_err(),
            ModelError::MissingConversion { .. }
        ));
        assert!(builder().shared_unit_cell().build().is_ok());
    }

    #[test]
    fn process_ids_are_one_based() {
        let model = base()
            .process(Process::new("p", "k").with_condition(c1(0, "a"), "A"))
            .process(Process::new("q", "k").with_condition(c1(0, "b"), "A"))
            .build()
            .unwrap();
        let ids: Vec<(u32, &str)> = model
            .processes_with_ids()
            .map(|(id, p)| (id.0, p.name.as_str()))
            .collect();
        assert_eq!(ids, vec![(1, "p"), (2, "q")]);
        assert_eq!(model.process(ProcessId(2)).unwrap().name, "q");
        assert!(model.process(ProcessId(0)).is_none());
    }
}
