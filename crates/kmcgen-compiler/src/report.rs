//! Compilation statistics.

use std::fmt;

use kmcgen_core::{model_fingerprint, ProcessList};

use crate::classify::EventKey;
use crate::plan::{Payload, TouchupProcedure, UpdateProcedure};

/// Statistics for one update procedure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventStats {
    /// The event.
    pub event: EventKey,
    /// Processes the event may enable.
    pub enables: usize,
    /// Processes the event certainly disables.
    pub disables: usize,
    /// Occupation queries in the synthesized tree.
    pub queries: usize,
    /// Deepest query nesting.
    pub depth: usize,
}

/// Statistics for one touch-up procedure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TouchupStats {
    /// Procedure name.
    pub procedure: String,
    /// Processes anchored on the site type.
    pub processes: usize,
    /// Occupation queries in the synthesized tree.
    pub queries: usize,
}

/// Per-procedure statistics of one compilation.
///
/// `Display` renders a plain-text table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileReport {
    /// Model fingerprint.
    pub fingerprint: u64,
    /// Number of processes.
    pub processes: usize,
    /// Sites per unit cell.
    pub sites_per_cell: u32,
    /// One entry per update procedure, in plan order.
    pub events: Vec<EventStats>,
    /// One entry per touch-up procedure, in plan order.
    pub touchups: Vec<TouchupStats>,
}

impl CompileReport {
    pub(crate) fn from_parts(
        model: &ProcessList,
        updates: &[UpdateProcedure],
        touchups: &[TouchupProcedure],
    ) -> Self {
        let events = updates
            .iter()
            .map(|u| {
                let mut enables = 0;
                let mut disables = 0;
                for payload in u.tree.payloads() {
                    match payload {
                        Payload::Enable { .. } => enables += 1,
                        Payload::Disable { .. } => disables += 1,
                    }
                }
                EventStats {
                    event: u.event.clone(),
                    enables,
                    disables,
                    queries: u.tree.query_count(),
                    depth: u.tree.depth(),
                }
            })
            .collect();
        let touchups = touchups
            .iter()
            .map(|t| TouchupStats {
                procedure: t.name.clone(),
                processes: t.removals.len(),
                queries: t.tree.query_count(),
            })
            .collect();
        Self {
            fingerprint: model_fingerprint(model),
            processes: model.processes().len(),
            sites_per_cell: model.sites_per_cell(),
            events,
            touchups,
        }
    }

    /// Queries across every update and touch-up tree.
    pub fn total_queries(&self) -> usize {
        self.events.iter().map(|e| e.queries).sum::<usize>()
            + self.touchups.iter().map(|t| t.queries).sum::<usize>()
    }

    /// Update procedures that affect no process.
    pub fn idle_events(&self) -> impl Iterator<Item = &EventStats> {
        self.events
            .iter()
            .filter(|e| e.enables == 0 && e.disables == 0)
    }
}

impl fmt::Display for CompileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "model fingerprint: {:016x}", self.fingerprint)?;
        writeln!(
            f,
            "processes: {}, sites per unit cell: {}",
            self.processes, self.sites_per_cell
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<40} {:>8} {:>8} {:>8} {:>6}",
            "procedure", "enable", "disable", "queries", "depth"
        )?;
        for e in &self.events {
            writeln!(
                f,
                "{:<40} {:>8} {:>8} {:>8} {:>6}",
                e.event.procedure_name(),
                e.enables,
                e.disables,
                e.queries,
                e.depth
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:<40} {:>8} {:>8}", "procedure", "procs", "queries")?;
        for t in &self.touchups {
            writeln!(f, "{:<40} {:>8} {:>8}", t.procedure, t.processes, t.queries)?;
        }
        write!(f, "total queries: {}", self.total_queries())
    }
}

#[cfg(test)]
mod tests {
    use kmcgen_core::{Coordinate, Layer, Process, ProcessList, SiteType};
    use smallvec::smallvec;

    use crate::plan::compile;

    #[test]
    fn counts_match_the_plan() {
        let here = Coordinate::new(smallvec![0, 0], "a", "default");
        let model = ProcessList::builder(2)
            .species("empty")
            .species("A")
            .layer(Layer::new("default").with_site(SiteType::new("a", [0.0; 3])))
            .process(
                Process::new("adsA", "k")
                    .with_condition(here.clone(), "empty")
                    .with_action(here.clone(), "A"),
            )
            .process(
                Process::new("desA", "k")
                    .with_condition(here.clone(), "A")
                    .with_action(here, "empty"),
            )
            .build()
            .unwrap();
        let plan = compile(&model).unwrap();
        let report = plan.report();
        assert_eq!(report.processes, 2);
        assert_eq!(report.events.len(), 2);
        for e in &report.events {
            assert_eq!((e.enables, e.disables, e.queries), (1, 1, 0));
        }
        assert_eq!(report.touchups[0].processes, 2);
        assert_eq!(report.touchups[0].queries, 1);
        assert_eq!(report.total_queries(), 1);
        assert_eq!(report.idle_events().count(), 0);

        let text = report.to_string();
        assert!(text.contains("put_A_default_a"));
        assert!(text.ends_with("total queries: 1"));
    }
}
