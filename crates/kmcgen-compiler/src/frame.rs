//! Processes re-expressed in runtime cell deltas.
//!
//! Model coordinates are written relative to the anchor cell of their own
//! layer. The generated kernel addresses every layer through one shared
//! cell index, so each coordinate is translated into the anchor's frame
//! once, here, through the model's conversion table. Every later pass only
//! subtracts offsets.

use kmcgen_core::{Action, Condition, Coordinate, ModelError, Process, ProcessId, ProcessList};

use crate::error::CompileError;

/// A process with all coordinates measured from its anchor cell.
#[derive(Clone, Debug)]
pub struct ProcessFrame<'a> {
    /// One-based process identifier.
    pub id: ProcessId,
    /// The process as declared.
    pub process: &'a Process,
    /// Position of the anchor condition in `conditions`.
    pub anchor: usize,
    /// Conditions in declaration order, measured from the anchor.
    pub conditions: Vec<Condition>,
    /// Actions in declaration order, measured from the anchor.
    pub actions: Vec<Action>,
}

impl<'a> ProcessFrame<'a> {
    /// Build the frame of one process.
    pub fn new(
        model: &ProcessList,
        id: ProcessId,
        process: &'a Process,
    ) -> Result<Self, CompileError> {
        let anchor = process
            .conditions
            .iter()
            .position(|c| c.coord.is_anchor())
            .ok_or_else(|| ModelError::MissingAnchor {
                process: process.name.clone(),
            })?;
        let origin = &process.conditions[anchor].coord;
        let table = model.conversions();

        let conditions = process
            .conditions
            .iter()
            .map(|c| Ok(Condition::new(c.coord.relative_to(origin, table)?, c.species.clone())))
            .collect::<Result<Vec<_>, ModelError>>()?;
        let actions = process
            .actions
            .iter()
            .map(|a| Ok(Action::new(a.coord.relative_to(origin, table)?, a.species.clone())))
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(Self {
            id,
            process,
            anchor,
            conditions,
            actions,
        })
    }

    /// Process name.
    pub fn name(&self) -> &str {
        &self.process.name
    }

    /// The anchor coordinate (zero offset, primary layer).
    pub fn anchor_coord(&self) -> &Coordinate {
        &self.conditions[self.anchor].coord
    }

    /// Where the anchor lies seen from condition `k`.
    pub fn anchor_from(&self, k: usize) -> Coordinate {
        displacement(self.anchor_coord(), &self.conditions[k].coord)
    }

    /// Every condition seen from condition `k`, `k` itself included.
    pub fn conditions_from(&self, k: usize) -> Vec<Condition> {
        let origin = &self.conditions[k].coord;
        self.conditions
            .iter()
            .map(|c| Condition::new(displacement(&c.coord, origin), c.species.clone()))
            .collect()
    }

    /// The conditions other than `k`, seen from condition `k`.
    pub fn questions_from(&self, k: usize) -> Vec<Condition> {
        let origin = &self.conditions[k].coord;
        self.conditions
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != k)
            .map(|(_, c)| Condition::new(displacement(&c.coord, origin), c.species.clone()))
            .collect()
    }

    /// The condition constraining an anchor-relative coordinate.
    pub fn condition_at(&self, coord: &Coordinate) -> Option<&Condition> {
        self.conditions.iter().find(|c| &c.coord == coord)
    }
}

/// Frames of every process, in process-id order.
pub fn frames(model: &ProcessList) -> Result<Vec<ProcessFrame<'_>>, CompileError> {
    model
        .processes_with_ids()
        .map(|(id, p)| ProcessFrame::new(model, id, p))
        .collect()
}

/// `target - origin` on offsets, keeping `target`'s site and layer. Both
/// must already be in the same frame.
pub(crate) fn displacement(target: &Coordinate, origin: &Coordinate) -> Coordinate {
    Coordinate::new(
        target
            .offset
            .iter()
            .zip(origin.offset.iter())
            .map(|(&t, &o)| t - o)
            .collect(),
        target.site.clone(),
        target.layer.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmcgen_core::{Layer, SiteType};
    use smallvec::smallvec;

    fn two_layer_model() -> ProcessList {
        let hop = Process::new("hop", "k")
            .with_condition(Coordinate::new(smallvec![0], "a", "bottom"), "A")
            .with_condition(Coordinate::new(smallvec![1], "t", "top"), "empty")
            .with_action(Coordinate::new(smallvec![0], "a", "bottom"), "empty")
            .with_action(Coordinate::new(smallvec![1], "t", "top"), "A");
        ProcessList::builder(1)
            .species("empty")
            .species("A")
            .layer(Layer::new("bottom").with_site(SiteType::new("a", [0.0; 3])))
            .layer(Layer::new("top").with_site(SiteType::new("t", [0.5, 0.0, 0.0])))
            .conversion("top", "bottom", smallvec![2])
            .process(hop)
            .build()
            .unwrap()
    }

    #[test]
    fn cross_layer_coordinates_take_the_shift() {
        let model = two_layer_model();
        let frames = frames(&model).unwrap();
        let f = &frames[0];
        assert_eq!(f.anchor, 0);
        assert_eq!(f.conditions[1].coord.offset.as_slice(), &[3]);
        assert_eq!(f.actions[1].coord.offset.as_slice(), &[3]);
        assert_eq!(f.conditions[1].coord.layer, "top");
    }

    #[test]
    fn views_from_a_condition() {
        let model = two_layer_model();
        let frames = frames(&model).unwrap();
        let f = &frames[0];
        let anchor = f.anchor_from(1);
        assert_eq!(anchor.offset.as_slice(), &[-3]);
        assert_eq!(anchor.site, "a");

        let qs = f.questions_from(1);
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].species, "A");
        assert_eq!(qs[0].coord.offset.as_slice(), &[-3]);

        let all = f.conditions_from(1);
        assert_eq!(all.len(), 2);
        assert!(all[1].coord.is_anchor());
    }
}
