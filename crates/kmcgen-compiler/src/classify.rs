//! Event classification.
//!
//! An event is a species being put on, or taken from, one site type. For
//! each event, every process condition on that site type is classified by
//! what the event does to its truth value:
//!
//! | direction | condition requires | outcome |
//! |-----------|--------------------|---------|
//! | put `s`   | `s`                | enable candidate |
//! | put `s`   | default species    | disable |
//! | take `s`  | default species    | enable candidate |
//! | take `s`  | `s`                | disable |
//!
//! A condition on any other species cannot change truth value through the
//! event and is left unaffected. When the event species is the default
//! species, a default-species condition matches both rules and
//! classification fails.

use std::fmt;

use kmcgen_core::{Condition, Coordinate, ModelError, ProcessId, ProcessList};
use tracing::{debug, trace};

use crate::error::CompileError;
use crate::frame::{self, ProcessFrame};

/// Whether a species arrives at or leaves a site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// The site changes from the default species to the event species.
    Put,
    /// The site changes from the event species to the default species.
    Take,
}

impl Direction {
    /// Both directions, put first.
    pub const ALL: [Direction; 2] = [Direction::Put, Direction::Take];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Put => "put",
            Direction::Take => "take",
        })
    }
}

/// What an event does to one process condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The condition may newly hold.
    Enable,
    /// The condition certainly stops holding.
    Disable,
    /// The condition's truth value cannot change.
    Unaffected,
}

/// Classify a condition requiring `required` against an event. Returns
/// `None` when both rules apply.
fn outcome(direction: Direction, species: &str, required: &str, default: &str) -> Option<Outcome> {
    let (enables, disables) = match direction {
        Direction::Put => (required == species, required == default),
        Direction::Take => (required == default, required == species),
    };
    match (enables, disables) {
        (true, true) => None,
        (true, false) => Some(Outcome::Enable),
        (false, true) => Some(Outcome::Disable),
        (false, false) => Some(Outcome::Unaffected),
    }
}

/// Identifies one update procedure: `<direction>_<species>_<layer>_<site>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventKey {
    /// Species being placed or removed.
    pub species: String,
    /// Layer of the site type.
    pub layer: String,
    /// The site type.
    pub site: String,
    /// Put or take.
    pub direction: Direction,
}

impl EventKey {
    /// Create a key.
    pub fn new(
        species: impl Into<String>,
        layer: impl Into<String>,
        site: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            species: species.into(),
            layer: layer.into(),
            site: site.into(),
            direction,
        }
    }

    /// Name of the generated update procedure.
    pub fn procedure_name(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.direction, self.species, self.layer, self.site
        )
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} on {}.{}",
            self.direction, self.species, self.layer, self.site
        )
    }
}

/// A process the event may enable, pending its other conditions.
#[derive(Clone, Debug, PartialEq)]
pub struct EnableCandidate {
    /// The process.
    pub process: ProcessId,
    /// Index of the triggering condition in the process.
    pub trigger: usize,
    /// The process anchor, relative to the event site.
    pub location: Coordinate,
    /// The remaining conditions, relative to the event site.
    pub questions: Vec<Condition>,
}

/// A process the event certainly disables.
#[derive(Clone, Debug, PartialEq)]
pub struct DisableRule {
    /// The process.
    pub process: ProcessId,
    /// Index of the triggering condition in the process.
    pub trigger: usize,
    /// The process anchor, relative to the event site.
    pub location: Coordinate,
}

/// Classification of every process condition against one event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventClassification {
    /// The event.
    pub event: EventKey,
    /// Enable candidates in process order, then condition order.
    pub enables: Vec<EnableCandidate>,
    /// Disable rules in process order, then condition order.
    pub disables: Vec<DisableRule>,
}

impl EventClassification {
    /// `true` if the event affects no process.
    pub fn is_empty(&self) -> bool {
        self.enables.is_empty() && self.disables.is_empty()
    }
}

/// Classify every process condition against one event.
pub fn classify_event(
    model: &ProcessList,
    frames: &[ProcessFrame<'_>],
    event: EventKey,
) -> Result<EventClassification, CompileError> {
    // Surfaces unknown references before any scanning.
    model.site_index(&event.layer, &event.site)?;
    model.require_species("", &event.species)?;
    let default = &model.default_species().name;

    let mut enables = Vec::new();
    let mut disables = Vec::new();
    for frame in frames {
        for (k, condition) in frame.conditions.iter().enumerate() {
            if condition.coord.site != event.site || condition.coord.layer != event.layer {
                continue;
            }
            let result = outcome(event.direction, &event.species, &condition.species, default)
                .ok_or_else(|| ModelError::AmbiguousEmptySpecies {
                    process: frame.name().to_string(),
                    condition: frame.process.conditions[k].to_string(),
                    species: event.species.clone(),
                })?;
            trace!(
                event = %event,
                process = frame.name(),
                condition = k,
                outcome = ?result,
                "classified condition"
            );
            match result {
                Outcome::Enable => enables.push(EnableCandidate {
                    process: frame.id,
                    trigger: k,
                    location: frame.anchor_from(k),
                    questions: frame.questions_from(k),
                }),
                Outcome::Disable => disables.push(DisableRule {
                    process: frame.id,
                    trigger: k,
                    location: frame.anchor_from(k),
                }),
                Outcome::Unaffected => {}
            }
        }
    }

    debug!(
        event = %event,
        enables = enables.len(),
        disables = disables.len(),
        "classified event"
    );
    Ok(EventClassification {
        event,
        enables,
        disables,
    })
}

/// Classify every event of the model.
///
/// Events are enumerated species-major (non-default species in declaration
/// order), then site types in global index order, then put before take.
pub fn classify_all(model: &ProcessList) -> Result<Vec<EventClassification>, CompileError> {
    let frames = frame::frames(model)?;
    classify_with(model, &frames)
}

pub(crate) fn classify_with(
    model: &ProcessList,
    frames: &[ProcessFrame<'_>],
) -> Result<Vec<EventClassification>, CompileError> {
    let mut out = Vec::new();
    for species in model.species().iter().filter(|s| !model.is_default(&s.name)) {
        for site in model.sites() {
            for direction in Direction::ALL {
                let key = EventKey::new(&species.name, &site.layer.name, &site.site.name, direction);
                out.push(classify_event(model, frames, key)?);
            }
        }
    }
    Ok(out)
}
