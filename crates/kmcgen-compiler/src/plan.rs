//! The compiled kernel plan.
//!
//! [`compile`] runs every pass and assembles the procedures the emitter
//! renders, each already named, ordered and resolved. The plan carries no
//! target-language syntax.

use indexmap::IndexMap;
use kmcgen_core::{
    model_fingerprint, Condition, Coordinate, ModelError, ProcessId, ProcessList, SiteIndex,
};
use kmcgen_lattice::IndexFormula;
use tracing::{debug, info, trace};

use crate::classify::{self, Direction, EventClassification, EventKey};
use crate::error::CompileError;
use crate::frame::{self, ProcessFrame};
use crate::report::CompileReport;
use crate::tree::{synthesize, DecisionTree, Item};

/// Names the generated kernel defines besides the per-model ones. No model
/// name may reuse them.
pub const RUNTIME_NAMES: &[&str] = &[
    "kind_values",
    "iint",
    "base",
    "lattice",
    "proclist",
    "system_size",
    "set_system_size",
    "to_index",
    "to_coord",
    "get_species",
    "replace_species",
    "add_proc",
    "del_proc",
    "can_do",
    "determine_procsite",
    "run_proc_nr",
    "do_kmc_step",
    "initialize_state",
    "touchup_site",
    "get_proc_name",
    "get_species_name",
    "get_site_name",
    "nr_of_proc",
    "nr_of_species",
    "nr_of_layers",
    "spuck",
    "lattice_dimension",
    "default_species",
];

// ── Procedures ─────────────────────────────────────────────────────

/// What a decision tree does once a process's availability is decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Register the process at `location`.
    Enable {
        /// The process.
        process: ProcessId,
        /// Its anchor, relative to the procedure's site argument.
        location: Coordinate,
    },
    /// Unregister the process at `location` if registered.
    Disable {
        /// The process.
        process: ProcessId,
        /// Its anchor, relative to the procedure's site argument.
        location: Coordinate,
    },
}

impl Payload {
    /// The affected process.
    pub fn process(&self) -> ProcessId {
        match self {
            Payload::Enable { process, .. } | Payload::Disable { process, .. } => *process,
        }
    }

    /// Where the affected process is anchored.
    pub fn location(&self) -> &Coordinate {
        match self {
            Payload::Enable { location, .. } | Payload::Disable { location, .. } => location,
        }
    }
}

/// A site-type constant `<layer>_<site> = index`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConstant {
    /// Constant name.
    pub name: String,
    /// Owning layer.
    pub layer: String,
    /// Site type.
    pub site: String,
    /// Global unit-cell index.
    pub index: SiteIndex,
}

/// Tests whether every condition of a process holds around a site.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckProcedure {
    /// `check_<process>` or `check_<process>_<k>`.
    pub name: String,
    /// The process checked.
    pub process: ProcessId,
    /// `None` when the site argument is the anchor, otherwise the
    /// one-based number of the condition the argument stands for.
    pub condition: Option<usize>,
    /// Site type of the argument, zero offset.
    pub origin: Coordinate,
    /// All conditions of the process, relative to the argument.
    pub conditions: Vec<Condition>,
}

/// Applies a put or take to one site and updates availability.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateProcedure {
    /// `<put|take>_<species>_<layer>_<site>`.
    pub name: String,
    /// The event handled.
    pub event: EventKey,
    /// Species the site holds before the event.
    pub from: String,
    /// Species the site holds after the event.
    pub to: String,
    /// Availability changes, run after the lattice is written.
    pub tree: DecisionTree<Payload>,
}

/// Recomputes availability at one site from scratch.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchupProcedure {
    /// `touchup_<layer>_<site>`.
    pub name: String,
    /// Owning layer.
    pub layer: String,
    /// Site type.
    pub site: String,
    /// Processes anchored on this site type, removed first.
    pub removals: Vec<ProcessId>,
    /// Re-registers each anchored process whose conditions hold.
    pub tree: DecisionTree<Payload>,
}

/// One lattice update performed when a process fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionStep {
    /// Put or take.
    pub direction: Direction,
    /// Species put or taken.
    pub species: String,
    /// Target site, relative to the process anchor.
    pub coord: Coordinate,
    /// The update procedure called.
    pub procedure: String,
}

/// Lattice updates for one process, in action order.
#[derive(Clone, Debug, PartialEq)]
pub struct RunStep {
    /// The process.
    pub process: ProcessId,
    /// Process name.
    pub name: String,
    /// The process anchor; step coordinates are relative to it.
    pub anchor: Coordinate,
    /// Updates, in order.
    pub steps: Vec<ActionStep>,
}

// ── Plan ───────────────────────────────────────────────────────────

/// Everything the emitter needs, resolved and ordered.
#[derive(Clone, Debug)]
#[must_use]
pub struct KernelPlan {
    fingerprint: u64,
    formula: IndexFormula,
    sites: Vec<SiteConstant>,
    checks: Vec<CheckProcedure>,
    updates: Vec<UpdateProcedure>,
    touchups: Vec<TouchupProcedure>,
    dispatch: Vec<RunStep>,
    report: CompileReport,
}

impl KernelPlan {
    /// Fingerprint of the compiled model.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Index mapping formula.
    pub fn formula(&self) -> &IndexFormula {
        &self.formula
    }

    /// Site-type constants in index order.
    pub fn sites(&self) -> &[SiteConstant] {
        &self.sites
    }

    /// Check procedures, grouped by process.
    pub fn checks(&self) -> &[CheckProcedure] {
        &self.checks
    }

    /// The anchor-relative check of a process.
    pub fn anchor_check(&self, process: ProcessId) -> Option<&CheckProcedure> {
        self.checks
            .iter()
            .find(|c| c.process == process && c.condition.is_none())
    }

    /// Update procedures, species-major.
    pub fn updates(&self) -> &[UpdateProcedure] {
        &self.updates
    }

    /// The update procedure for an event.
    pub fn update(&self, event: &EventKey) -> Option<&UpdateProcedure> {
        self.updates.iter().find(|u| &u.event == event)
    }

    /// Touch-up procedures in site index order.
    pub fn touchups(&self) -> &[TouchupProcedure] {
        &self.touchups
    }

    /// The touch-up procedure of a site type.
    pub fn touchup(&self, layer: &str, site: &str) -> Option<&TouchupProcedure> {
        self.touchups
            .iter()
            .find(|t| t.layer == layer && t.site == site)
    }

    /// Per-process dispatch in process-id order.
    pub fn dispatch(&self) -> &[RunStep] {
        &self.dispatch
    }

    /// Compilation statistics.
    pub fn report(&self) -> &CompileReport {
        &self.report
    }
}

/// Compile a model.
///
/// # Examples
///
/// ```
/// use kmcgen_core::ProcessList;
///
/// let model = ProcessList::from_json(r#"{
///     "dimension": 1,
///     "species": ["empty", "A"],
///     "layers": [{ "name": "default", "sites": [{ "name": "a" }] }],
///     "processes": [
///         { "name": "adsA", "conditions": [{ "coord": "a.(0,0,0)", "species": "empty" }],
///           "actions": [{ "coord": "a.(0,0,0)", "species": "A" }] }
///     ]
/// }"#).unwrap();
///
/// let plan = kmcgen_compiler::compile(&model).unwrap();
/// assert_eq!(plan.checks().len(), 1);
/// assert_eq!(plan.updates().len(), 2);
/// assert_eq!(plan.touchups()[0].name, "touchup_default_a");
/// ```
pub fn compile(model: &ProcessList) -> Result<KernelPlan, CompileError> {
    info!(
        processes = model.processes().len(),
        species = model.species().len(),
        sites_per_cell = model.sites_per_cell(),
        "compiling process list"
    );

    let formula = IndexFormula::for_model(model)?;
    let frames = frame::frames(model)?;

    let sites: Vec<SiteConstant> = model
        .sites()
        .iter()
        .map(|s| SiteConstant {
            name: format!("{}_{}", s.layer.name, s.site.name),
            layer: s.layer.name.clone(),
            site: s.site.name.clone(),
            index: s.index,
        })
        .collect();

    let checks = check_procedures(&frames);
    let classifications = classify::classify_with(model, &frames)?;
    let default = &model.default_species().name;
    let updates: Vec<UpdateProcedure> = classifications
        .into_iter()
        .map(|c| update_procedure(c, default))
        .collect();
    let touchups: Vec<TouchupProcedure> = sites
        .iter()
        .map(|s| touchup_procedure(&frames, s))
        .collect();
    let dispatch = frames
        .iter()
        .map(|f| run_step(f, default))
        .collect::<Result<Vec<_>, _>>()?;

    let plan = KernelPlan {
        fingerprint: model_fingerprint(model),
        report: CompileReport::from_parts(model, &updates, &touchups),
        formula,
        sites,
        checks,
        updates,
        touchups,
        dispatch,
    };
    check_names(model, &plan)?;

    info!(
        updates = plan.updates.len(),
        queries = plan.report.total_queries(),
        "compiled process list"
    );
    Ok(plan)
}

fn check_procedures(frames: &[ProcessFrame<'_>]) -> Vec<CheckProcedure> {
    let mut out = Vec::new();
    for f in frames {
        out.push(CheckProcedure {
            name: format!("check_{}", f.name()),
            process: f.id,
            condition: None,
            origin: f.anchor_coord().clone(),
            conditions: f.conditions_from(f.anchor),
        });
        for (k, c) in f.conditions.iter().enumerate() {
            if k == f.anchor {
                continue;
            }
            out.push(CheckProcedure {
                name: format!("check_{}_{}", f.name(), k + 1),
                process: f.id,
                condition: Some(k + 1),
                origin: Coordinate::new(
                    c.coord.offset.iter().map(|_| 0).collect(),
                    c.coord.site.clone(),
                    c.coord.layer.clone(),
                ),
                conditions: f.conditions_from(k),
            });
        }
    }
    out
}

fn update_procedure(c: EventClassification, default: &str) -> UpdateProcedure {
    let (from, to) = match c.event.direction {
        Direction::Put => (default.to_string(), c.event.species.clone()),
        Direction::Take => (c.event.species.clone(), default.to_string()),
    };

    // Removals first: they need no queries.
    let mut items: Vec<Item<Payload>> = c
        .disables
        .into_iter()
        .map(|d| {
            Item::new(
                Vec::new(),
                Payload::Disable {
                    process: d.process,
                    location: d.location,
                },
            )
        })
        .collect();
    items.extend(c.enables.into_iter().map(|e| {
        Item::new(
            e.questions,
            Payload::Enable {
                process: e.process,
                location: e.location,
            },
        )
    }));

    let tree = synthesize(items);
    debug!(
        procedure = %c.event.procedure_name(),
        queries = tree.query_count(),
        depth = tree.depth(),
        "synthesized update tree"
    );
    UpdateProcedure {
        name: c.event.procedure_name(),
        event: c.event,
        from,
        to,
        tree,
    }
}

fn touchup_procedure(frames: &[ProcessFrame<'_>], site: &SiteConstant) -> TouchupProcedure {
    let anchored: Vec<&ProcessFrame<'_>> = frames
        .iter()
        .filter(|f| {
            let a = f.anchor_coord();
            a.site == site.site && a.layer == site.layer
        })
        .collect();

    let removals = anchored.iter().map(|f| f.id).collect();
    let items = anchored
        .iter()
        .map(|f| {
            Item::new(
                f.conditions_from(f.anchor),
                Payload::Enable {
                    process: f.id,
                    location: f.anchor_coord().clone(),
                },
            )
        })
        .collect();

    let tree = synthesize(items);
    let name = format!("touchup_{}", site.name);
    debug!(procedure = %name, queries = tree.query_count(), "synthesized touch-up tree");
    TouchupProcedure {
        name,
        layer: site.layer.clone(),
        site: site.site.clone(),
        removals,
        tree,
    }
}

fn run_step(f: &ProcessFrame<'_>, default: &str) -> Result<RunStep, CompileError> {
    let mut steps = Vec::new();
    for action in &f.actions {
        let condition = f
            .condition_at(&action.coord)
            .ok_or_else(|| ModelError::UnmatchedAction {
                process: f.name().to_string(),
                coord: action.coord.to_string(),
            })?;
        let step = |direction, species: &str| {
            let key = EventKey::new(species, &action.coord.layer, &action.coord.site, direction);
            ActionStep {
                direction,
                species: species.to_string(),
                coord: action.coord.clone(),
                procedure: key.procedure_name(),
            }
        };

        if action.species == condition.species {
            trace!(process = f.name(), coord = %action.coord, "action leaves site unchanged");
        } else if condition.species == default {
            steps.push(step(Direction::Put, &action.species));
        } else if action.species == default {
            steps.push(step(Direction::Take, &condition.species));
        } else {
            steps.push(step(Direction::Take, &condition.species));
            steps.push(step(Direction::Put, &action.species));
        }
    }
    Ok(RunStep {
        process: f.id,
        name: f.name().to_string(),
        anchor: f.anchor_coord().clone(),
        steps,
    })
}

/// Every generated identifier must be unique, ignoring case.
fn check_names(model: &ProcessList, plan: &KernelPlan) -> Result<(), CompileError> {
    let mut seen: IndexMap<String, String> = IndexMap::new();
    let mut claim = |name: &str, owner: String| -> Result<(), CompileError> {
        if let Some(first) = seen.insert(name.to_ascii_lowercase(), owner.clone()) {
            return Err(CompileError::NameCollision {
                name: name.to_string(),
                first,
                second: owner,
            });
        }
        Ok(())
    };

    for name in RUNTIME_NAMES {
        claim(name, "the runtime".to_string())?;
    }
    for s in model.species() {
        claim(&s.name, format!("species '{}'", s.name))?;
    }
    for l in model.layers() {
        claim(&l.name, format!("layer '{}'", l.name))?;
    }
    for s in &plan.sites {
        claim(&s.name, format!("site '{}.{}'", s.layer, s.site))?;
    }
    for p in model.processes() {
        claim(&p.name, format!("process '{}'", p.name))?;
    }
    for c in &plan.checks {
        claim(&c.name, "a check procedure".to_string())?;
    }
    for u in &plan.updates {
        claim(&u.name, format!("the {} update", u.event))?;
    }
    for t in &plan.touchups {
        claim(&t.name, "a touch-up procedure".to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmcgen_core::{Layer, Process, SiteType};
    use smallvec::smallvec;

    fn at(dx: i32) -> Coordinate {
        Coordinate::new(smallvec![dx], "a", "default")
    }

    fn model(processes: Vec<Process>) -> ProcessList {
        let mut b = ProcessList::builder(1)
            .species("empty")
            .species("A")
            .species("B")
            .layer(Layer::new("default").with_site(SiteType::new("a", [0.0; 3])));
        for p in processes {
            b = b.process(p);
        }
        b.build().unwrap()
    }

    fn diffusion() -> Process {
        Process::new("diff", "k")
            .with_condition(at(0), "A")
            .with_condition(at(1), "empty")
            .with_action(at(0), "empty")
            .with_action(at(1), "A")
    }

    #[test]
    fn check_procedures_cover_every_condition() {
        let plan = compile(&model(vec![diffusion()])).unwrap();
        let names: Vec<&str> = plan.checks().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["check_diff", "check_diff_2"]);

        let suffixed = &plan.checks()[1];
        assert_eq!(suffixed.condition, Some(2));
        assert!(suffixed.origin.is_anchor());
        assert_eq!(suffixed.conditions[0].coord.offset.as_slice(), &[-1]);
        assert!(suffixed.conditions[1].coord.is_anchor());
    }

    #[test]
    fn dispatch_orders_take_before_put() {
        let swap = Process::new("swap", "k")
            .with_condition(at(0), "A")
            .with_action(at(0), "B");
        let plan = compile(&model(vec![diffusion(), swap])).unwrap();

        let diff = &plan.dispatch()[0];
        let calls: Vec<&str> = diff.steps.iter().map(|s| s.procedure.as_str()).collect();
        assert_eq!(calls, ["take_A_default_a", "put_A_default_a"]);
        assert_eq!(diff.steps[1].coord.offset.as_slice(), &[1]);

        let swap = &plan.dispatch()[1];
        let calls: Vec<&str> = swap.steps.iter().map(|s| s.procedure.as_str()).collect();
        assert_eq!(calls, ["take_A_default_a", "put_B_default_a"]);
    }

    #[test]
    fn unchanged_actions_are_skipped() {
        let spectator = Process::new("spectator", "k")
            .with_condition(at(0), "A")
            .with_condition(at(1), "B")
            .with_action(at(0), "A")
            .with_action(at(1), "empty");
        let plan = compile(&model(vec![spectator])).unwrap();
        let steps = &plan.dispatch()[0].steps;
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].procedure, "take_B_default_a");
    }

    #[test]
    fn update_procedures_record_the_lattice_write() {
        let plan = compile(&model(vec![diffusion()])).unwrap();
        let put = plan
            .update(&EventKey::new("A", "default", "a", Direction::Put))
            .unwrap();
        assert_eq!((put.from.as_str(), put.to.as_str()), ("empty", "A"));
        // One removal first, then one guarded enable.
        assert!(matches!(put.tree.nodes()[0], crate::tree::Node::Fire(Payload::Disable { .. })));
        assert_eq!(put.tree.query_count(), 1);

        let take = plan
            .update(&EventKey::new("A", "default", "a", Direction::Take))
            .unwrap();
        assert_eq!((take.from.as_str(), take.to.as_str()), ("A", "empty"));
    }

    #[test]
    fn touchup_queries_all_anchored_conditions() {
        let plan = compile(&model(vec![diffusion()])).unwrap();
        let t = plan.touchup("default", "a").unwrap();
        assert_eq!(t.removals, [ProcessId(1)]);
        assert_eq!(t.tree.query_count(), 2);
    }

    #[test]
    fn names_colliding_with_procedures_are_rejected() {
        let clash = Process::new("touchup_default_a", "k")
            .with_condition(at(0), "empty")
            .with_action(at(0), "A");
        let err = compile(&model(vec![clash])).unwrap_err();
        assert!(matches!(err, CompileError::NameCollision { ref name, .. } if name == "touchup_default_a"));
    }

    #[test]
    fn runtime_names_are_reserved() {
        let clash = Process::new("do_kmc_step", "k")
            .with_condition(at(0), "empty")
            .with_action(at(0), "A");
        assert!(matches!(
            compile(&model(vec![clash])),
            Err(CompileError::NameCollision { .. })
        ));
    }

    #[test]
    fn compile_is_deterministic() {
        let m = model(vec![diffusion()]);
        let a = compile(&m).unwrap();
        let b = compile(&m).unwrap();
        assert_eq!(a.updates(), b.updates());
        assert_eq!(a.touchups(), b.touchups());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
