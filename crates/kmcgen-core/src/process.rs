//! Elementary processes: conditions, actions and a rate expression.

use std::fmt;

use crate::coord::Coordinate;

/// Asserts that a coordinate currently holds a species.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Condition {
    /// Where the species is required, relative to the process anchor.
    pub coord: Coordinate,
    /// Required species name.
    pub species: String,
}

impl Condition {
    /// Create a condition.
    pub fn new(coord: Coordinate, species: impl Into<String>) -> Self {
        Self {
            coord,
            species: species.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.species, self.coord)
    }
}

/// Asserts that a coordinate will hold a species once the process fires.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Action {
    /// Where the species is placed, relative to the process anchor.
    pub coord: Coordinate,
    /// Resulting species name.
    pub species: String,
}

impl Action {
    /// Create an action.
    pub fn new(coord: Coordinate, species: impl Into<String>) -> Self {
        Self {
            coord,
            species: species.into(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.coord, self.species)
    }
}

/// A named elementary lattice event.
///
/// The rate constant is an opaque expression handed through to the
/// runtime; the compiler never evaluates it.
#[derive(Clone, Debug, PartialEq)]
pub struct Process {
    /// Unique process name.
    pub name: String,
    /// Ordered conditions.
    pub conditions: Vec<Condition>,
    /// Ordered actions.
    pub actions: Vec<Action>,
    /// Rate-constant expression.
    pub rate_constant: String,
}

impl Process {
    /// Create a process with no conditions or actions.
    pub fn new(name: impl Into<String>, rate_constant: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conditions: Vec::new(),
            actions: Vec::new(),
            rate_constant: rate_constant.into(),
        }
    }

    /// Append a condition.
    pub fn with_condition(mut self, coord: Coordinate, species: impl Into<String>) -> Self {
        self.conditions.push(Condition::new(coord, species));
        self
    }

    /// Append an action.
    pub fn with_action(mut self, coord: Coordinate, species: impl Into<String>) -> Self {
        self.actions.push(Action::new(coord, species));
        self
    }

    /// The anchor condition: the first condition with a zero offset.
    ///
    /// Its layer is the process's primary layer. A validated process
    /// always has one.
    pub fn anchor(&self) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.coord.is_anchor())
    }

    /// The executing (center) coordinate, i.e. the anchor's coordinate.
    pub fn executing_coord(&self) -> Option<&Coordinate> {
        self.anchor().map(|c| &c.coord)
    }

    /// The condition constraining `coord`, if any.
    pub fn condition_at(&self, coord: &Coordinate) -> Option<&Condition> {
        self.conditions.iter().find(|c| &c.coord == coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn coord(dx: i32, site: &str) -> Coordinate {
        Coordinate::new(smallvec![dx], site, "default")
    }

    #[test]
    fn anchor_is_first_zero_offset_condition() {
        let p = Process::new("diff", "k")
            .with_condition(coord(1, "a"), "empty")
            .with_condition(coord(0, "a"), "A")
            .with_condition(coord(0, "b"), "empty");
        let anchor = p.anchor().unwrap();
        assert_eq!(anchor.species, "A");
        assert_eq!(p.executing_coord(), Some(&coord(0, "a")));
    }

    #[test]
    fn no_anchor_without_zero_offset() {
        let p = Process::new("p", "k").with_condition(coord(1, "a"), "A");
        assert!(p.anchor().is_none());
    }

    #[test]
    fn condition_at_matches_structurally() {
        let p = Process::new("p", "k")
            .with_condition(coord(0, "a"), "A")
            .with_condition(coord(-1, "a"), "B");
        assert_eq!(p.condition_at(&coord(-1, "a")).unwrap().species, "B");
        assert!(p.condition_at(&coord(1, "a")).is_none());
    }
}
