//! Executes a compiled plan against an in-memory lattice.
//!
//! The interpreter follows the same contract as the generated kernel:
//! an update procedure writes the lattice and then runs its decision tree,
//! a touch-up removes and re-registers processes at one site, and firing a
//! process calls the update procedures of its dispatch entry. The
//! availability it maintains must always equal [`brute_force`]
//! (recomputed from every anchored check).
//!
//! [`brute_force`]: KernelInterpreter::brute_force

use indexmap::IndexSet;
use kmcgen_compiler::{Direction, EventKey, KernelPlan, Payload};
use kmcgen_core::{Coordinate, ProcessId, ProcessList};
use kmcgen_lattice::{IndexMapping, LatticeSite};

/// A periodic lattice driven by a compiled plan.
pub struct KernelInterpreter<'a> {
    model: &'a ProcessList,
    plan: &'a KernelPlan,
    mapping: IndexMapping,
    occupation: Vec<String>,
    available: IndexSet<(ProcessId, u64)>,
}

impl<'a> KernelInterpreter<'a> {
    /// A lattice of the given repeat counts, filled with the default
    /// species, with nothing registered.
    pub fn new(model: &'a ProcessList, plan: &'a KernelPlan, extents: &[u32]) -> Self {
        let mapping = IndexMapping::for_model(model, extents).expect("valid extents");
        let default = model.default_species().name.clone();
        Self {
            model,
            plan,
            occupation: vec![default; mapping.volume() as usize],
            mapping,
            available: IndexSet::new(),
        }
    }

    /// The index mapping of the simulated lattice.
    pub fn mapping(&self) -> &IndexMapping {
        &self.mapping
    }

    /// Species at a linear index.
    pub fn species_at(&self, index: u64) -> &str {
        &self.occupation[(index - 1) as usize]
    }

    /// Overwrite a site without updating availability.
    pub fn set_raw(&mut self, index: u64, species: &str) {
        self.occupation[(index - 1) as usize] = species.to_string();
    }

    /// Linear index of `coord` seen from the site at `origin`.
    pub fn resolve(&self, origin: u64, coord: &Coordinate) -> u64 {
        let site = self.mapping.to_coord(origin).expect("origin in range");
        self.resolve_from(&site, coord)
    }

    fn resolve_from(&self, site: &LatticeSite, coord: &Coordinate) -> u64 {
        let local = self.model.coord_index(coord).expect("known site").0;
        let target = self.mapping.translate(site, &coord.offset, local);
        self.mapping.to_index(&target).expect("target in range")
    }

    fn site_type(&self, index: u64) -> (&'a str, &'a str) {
        let plan: &'a KernelPlan = self.plan;
        let site = self.mapping.to_coord(index).expect("index in range");
        let constant = &plan.sites()[(site.local - 1) as usize];
        (constant.layer.as_str(), constant.site.as_str())
    }

    fn apply_payloads(&mut self, origin: u64, fired: Vec<&'a Payload>) {
        for payload in fired {
            let at = self.resolve(origin, payload.location());
            match payload {
                Payload::Enable { process, .. } => {
                    let fresh = self.available.insert((*process, at));
                    assert!(fresh, "process {process} enabled twice at site {at}");
                }
                Payload::Disable { process, .. } => {
                    self.available.shift_remove(&(*process, at));
                }
            }
        }
    }

    /// Run `touchup_<layer>_<site>` at one site.
    pub fn touchup(&mut self, index: u64) {
        let plan = self.plan;
        let (layer, site) = self.site_type(index);
        let procedure = plan.touchup(layer, site).expect("touch-up exists");
        for &process in &procedure.removals {
            self.available.shift_remove(&(process, index));
        }
        let fired = procedure
            .tree
            .evaluate(|c| self.species_at(self.resolve(index, c)).to_string());
        self.apply_payloads(index, fired);
    }

    /// Set every site to the default species and touch every site up.
    pub fn initialize(&mut self) {
        let default = self.model.default_species().name.clone();
        self.occupation.fill(default);
        self.available.clear();
        for index in 1..=self.mapping.volume() {
            self.touchup(index);
        }
    }

    /// Touch every site up, keeping the occupation.
    pub fn touchup_all(&mut self) {
        for index in 1..=self.mapping.volume() {
            self.touchup(index);
        }
    }

    /// Run `<put|take>_<species>_<layer>_<site>` at one site.
    pub fn update(&mut self, direction: Direction, species: &str, index: u64) {
        let plan = self.plan;
        let (layer, site) = self.site_type(index);
        let key = EventKey::new(species, layer, site, direction);
        let procedure = plan
            .update(&key)
            .unwrap_or_else(|| panic!("no update procedure for {key}"));
        assert_eq!(
            self.species_at(index),
            procedure.from,
            "{} called on a site holding {}",
            procedure.name,
            self.species_at(index)
        );
        self.set_raw(index, &procedure.to);
        let fired = procedure
            .tree
            .evaluate(|c| self.species_at(self.resolve(index, c)).to_string());
        self.apply_payloads(index, fired);
    }

    /// Fire a process anchored at `index` through its dispatch entry.
    pub fn run_process(&mut self, process: ProcessId, index: u64) {
        let plan = self.plan;
        let entry = &plan.dispatch()[(process.0 - 1) as usize];
        for step in &entry.steps {
            let target = self.resolve(index, &step.coord);
            self.update(step.direction, &step.species, target);
        }
    }

    /// Registered `(process, anchor site)` pairs, sorted.
    pub fn available(&self) -> Vec<(ProcessId, u64)> {
        let mut out: Vec<_> = self.available.iter().copied().collect();
        out.sort_unstable();
        out
    }

    /// `true` if `process` is registered at `index`.
    pub fn can_do(&self, process: ProcessId, index: u64) -> bool {
        self.available.contains(&(process, index))
    }

    /// Availability recomputed from scratch with the anchored checks, sorted.
    pub fn brute_force(&self) -> Vec<(ProcessId, u64)> {
        let mut out = Vec::new();
        for index in 1..=self.mapping.volume() {
            let (layer, site) = self.site_type(index);
            for (id, _) in self.model.processes_with_ids() {
                let Some(check) = self.plan.anchor_check(id) else {
                    continue;
                };
                if check.origin.layer != layer || check.origin.site != site {
                    continue;
                }
                let holds = check
                    .conditions
                    .iter()
                    .all(|c| self.species_at(self.resolve(index, &c.coord)) == c.species);
                if holds {
                    out.push((check.process, index));
                }
            }
        }
        out.sort_unstable();
        out
    }
}
