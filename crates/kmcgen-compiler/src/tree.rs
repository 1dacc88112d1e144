//! Disambiguation tree synthesis.
//!
//! Given items, each a list of open questions ("does coordinate `c` hold
//! species `s`?") and a payload, [`synthesize`] builds a decision tree that
//! fires exactly the payloads whose questions all hold, querying each
//! coordinate as few times as the greedy strategy allows:
//!
//! 1. Items with no open questions fire, in input order.
//! 2. The coordinate asked about by the most items is queried. Ties go to
//!    the coordinate first seen in input order.
//! 3. Items asking about it are grouped by the species they require, one
//!    arm per species in first-seen order, and the arm bodies are
//!    synthesized from the items with that question removed.
//! 4. Items not asking about it continue at step 1 as siblings of the
//!    branch.
//!
//! Each round either fires items or removes one question from every item
//! it branches on, so synthesis terminates with depth at most the largest
//! question count. The result is a heuristic, not a minimum tree.

use indexmap::IndexMap;
use kmcgen_core::{Condition, Coordinate};
use tracing::trace;

/// A payload guarded by open questions.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<P> {
    /// Conditions that must all hold for the payload to fire.
    pub questions: Vec<Condition>,
    /// What fires.
    pub payload: P,
}

impl<P> Item<P> {
    /// Create an item.
    pub fn new(questions: Vec<Condition>, payload: P) -> Self {
        Self { questions, payload }
    }
}

/// One node of a decision tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node<P> {
    /// Apply the payload.
    Fire(P),
    /// Query the species at `coord` and run the matching arm, if any.
    Branch {
        /// The queried coordinate.
        coord: Coordinate,
        /// One arm per species some item requires at `coord`.
        arms: Vec<Arm<P>>,
    },
}

/// A branch arm.
#[derive(Clone, Debug, PartialEq)]
pub struct Arm<P> {
    /// Species that selects this arm.
    pub species: String,
    /// Nodes run when selected, in order.
    pub body: Vec<Node<P>>,
}

/// A synthesized decision procedure: a sequence of nodes run in order.
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionTree<P> {
    nodes: Vec<Node<P>>,
}

impl<P> Default for DecisionTree<P> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<P> DecisionTree<P> {
    /// Top-level nodes.
    pub fn nodes(&self) -> &[Node<P>] {
        &self.nodes
    }

    /// `true` if the tree does nothing.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of occupation queries (branch nodes).
    pub fn query_count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |node| {
            if matches!(node, Node::Branch { .. }) {
                n += 1;
            }
        });
        n
    }

    /// Total number of fire nodes.
    pub fn fire_count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |node| {
            if matches!(node, Node::Fire(_)) {
                n += 1;
            }
        });
        n
    }

    /// Every payload in the tree, in pre-order.
    pub fn payloads(&self) -> Vec<&P> {
        let mut out = Vec::new();
        walk_nodes(&self.nodes, &mut |node| {
            if let Node::Fire(p) = node {
                out.push(p);
            }
        });
        out
    }

    /// Every queried coordinate, in pre-order.
    pub fn queries(&self) -> Vec<&Coordinate> {
        let mut out = Vec::new();
        walk_nodes(&self.nodes, &mut |node| {
            if let Node::Branch { coord, .. } = node {
                out.push(coord);
            }
        });
        out
    }

    /// Deepest branch nesting; zero for a tree without queries.
    pub fn depth(&self) -> usize {
        fn depth_of<P>(nodes: &[Node<P>]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    Node::Fire(_) => 0,
                    Node::Branch { arms, .. } => {
                        1 + arms.iter().map(|a| depth_of(&a.body)).max().unwrap_or(0)
                    }
                })
                .max()
                .unwrap_or(0)
        }
        depth_of(&self.nodes)
    }

    /// Run the tree against an occupation and collect the fired payloads
    /// in firing order.
    pub fn evaluate<F, S>(&self, mut occupant: F) -> Vec<&P>
    where
        F: FnMut(&Coordinate) -> S,
        S: AsRef<str>,
    {
        let mut fired = Vec::new();
        run(&self.nodes, &mut occupant, &mut fired);
        fired
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node<P>)) {
        walk_nodes(&self.nodes, visit);
    }
}

fn walk_nodes<'a, P>(nodes: &'a [Node<P>], visit: &mut impl FnMut(&'a Node<P>)) {
    for node in nodes {
        visit(node);
        if let Node::Branch { arms, .. } = node {
            for arm in arms {
                walk_nodes(&arm.body, visit);
            }
        }
    }
}

fn run<'a, P, F, S>(nodes: &'a [Node<P>], occupant: &mut F, fired: &mut Vec<&'a P>)
where
    F: FnMut(&Coordinate) -> S,
    S: AsRef<str>,
{
    for node in nodes {
        match node {
            Node::Fire(p) => fired.push(p),
            Node::Branch { coord, arms } => {
                let species = occupant(coord);
                if let Some(arm) = arms.iter().find(|a| a.species == species.as_ref()) {
                    run(&arm.body, occupant, fired);
                }
            }
        }
    }
}

/// Build the decision tree for `items`. An empty item set gives an empty
/// tree.
pub fn synthesize<P>(items: Vec<Item<P>>) -> DecisionTree<P> {
    let mut nodes = Vec::new();
    build(items, &mut nodes, 0);
    DecisionTree { nodes }
}

fn build<P>(mut items: Vec<Item<P>>, out: &mut Vec<Node<P>>, depth: usize) {
    loop {
        let (ready, open): (Vec<_>, Vec<_>) =
            items.into_iter().partition(|i| i.questions.is_empty());
        out.extend(ready.into_iter().map(|i| Node::Fire(i.payload)));

        let Some(coord) = most_common(&open) else {
            return;
        };
        trace!(%coord, depth, items = open.len(), "branching");

        let mut arms: IndexMap<String, Vec<Item<P>>> = IndexMap::new();
        let mut deferred = Vec::new();
        for mut item in open {
            match item.questions.iter().position(|q| q.coord == coord) {
                Some(pos) => {
                    let answered = item.questions.remove(pos);
                    arms.entry(answered.species).or_default().push(item);
                }
                None => deferred.push(item),
            }
        }

        let arms = arms
            .into_iter()
            .map(|(species, group)| {
                let mut body = Vec::new();
                build(group, &mut body, depth + 1);
                Arm { species, body }
            })
            .collect();
        out.push(Node::Branch { coord, arms });
        items = deferred;
    }
}

/// The coordinate asked about by the most items, ties broken by first
/// appearance. An item asking twice counts twice.
fn most_common<P>(items: &[Item<P>]) -> Option<Coordinate> {
    let mut counts: IndexMap<&Coordinate, usize> = IndexMap::new();
    for item in items {
        for q in &item.questions {
            *counts.entry(&q.coord).or_default() += 1;
        }
    }
    let mut best: Option<(&Coordinate, usize)> = None;
    for (coord, count) in counts {
        // Strictly greater keeps the earliest coordinate on ties.
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((coord, count));
        }
    }
    best.map(|(coord, _)| coord.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;

    fn q(dx: i32, species: &str) -> Condition {
        Condition::new(Coordinate::new(smallvec![dx], "a", "l"), species)
    }

    #[test]
    fn empty_input_gives_empty_tree() {
        let tree: DecisionTree<u32> = synthesize(vec![]);
        assert!(tree.is_empty());
        assert_eq!(tree.query_count(), 0);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn unconditional_items_fire_in_order() {
        let tree = synthesize(vec![Item::new(vec![], 1), Item::new(vec![], 2)]);
        assert_eq!(tree.nodes(), &[Node::Fire(1), Node::Fire(2)]);
    }

    #[test]
    fn shared_coordinate_is_queried_once() {
        let items = vec![
            Item::new(vec![q(1, "empty")], "p1"),
            Item::new(vec![q(1, "empty"), q(2, "A")], "p2"),
            Item::new(vec![q(1, "B")], "p3"),
        ];
        let tree = synthesize(items);
        assert_eq!(tree.nodes().len(), 1);
        let Node::Branch { coord, arms } = &tree.nodes()[0] else {
            panic!("expected a branch");
        };
        assert_eq!(coord.offset.as_slice(), &[1]);
        let species: Vec<&str> = arms.iter().map(|a| a.species.as_str()).collect();
        assert_eq!(species, ["empty", "B"]);
        assert_eq!(tree.query_count(), 2);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn ties_prefer_first_seen() {
        let items = vec![
            Item::new(vec![q(3, "A")], 1),
            Item::new(vec![q(2, "A")], 2),
        ];
        let tree = synthesize(items);
        let queried: Vec<i32> = tree.queries().iter().map(|c| c.offset[0]).collect();
        assert_eq!(queried, [3, 2]);
    }

    #[test]
    fn unrelated_items_become_siblings() {
        let items = vec![
            Item::new(vec![q(1, "A")], 1),
            Item::new(vec![q(1, "A")], 2),
            Item::new(vec![q(5, "A")], 3),
        ];
        let tree = synthesize(items);
        assert_eq!(tree.nodes().len(), 2);
        assert_eq!(tree.query_count(), 2);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn evaluate_follows_occupation() {
        let items = vec![
            Item::new(vec![q(1, "empty")], 1),
            Item::new(vec![q(1, "A"), q(2, "A")], 2),
            Item::new(vec![], 3),
        ];
        let tree = synthesize(items);
        let fired = tree.evaluate(|_| "A");
        assert_eq!(fired, [&3, &2]);
        let fired = tree.evaluate(|_| "empty");
        assert_eq!(fired, [&3, &1]);
    }

    fn arb_items() -> impl Strategy<Value = Vec<Vec<(i32, u8)>>> {
        // Up to 8 items, each with distinct coordinates from a pool of 5.
        prop::collection::vec(
            prop::collection::btree_map(0i32..5, 0u8..3, 0..5)
                .prop_map(|m| m.into_iter().collect::<Vec<_>>()),
            0..8,
        )
    }

    proptest! {
        #[test]
        fn fires_exactly_the_satisfied_items(
            raw in arb_items(),
            occupation in prop::collection::vec(0u8..3, 5),
        ) {
            let names = ["empty", "A", "B"];
            let items: Vec<Item<usize>> = raw
                .iter()
                .enumerate()
                .map(|(i, qs)| {
                    Item::new(
                        qs.iter().map(|&(dx, s)| q(dx, names[s as usize])).collect(),
                        i,
                    )
                })
                .collect();
            let expected: Vec<usize> = raw
                .iter()
                .enumerate()
                .filter(|(_, qs)| qs.iter().all(|&(dx, s)| occupation[dx as usize] == s))
                .map(|(i, _)| i)
                .collect();

            let tree = synthesize(items);
            let mut fired: Vec<usize> = tree
                .evaluate(|c| names[occupation[c.offset[0] as usize] as usize])
                .into_iter()
                .copied()
                .collect();
            fired.sort_unstable();
            prop_assert_eq!(fired, expected);

            let max_questions = raw.iter().map(Vec::len).max().unwrap_or(0);
            prop_assert!(tree.depth() <= max_questions);
            let total: usize = raw.iter().map(Vec::len).sum();
            prop_assert!(tree.query_count() <= total);
            prop_assert_eq!(tree.fire_count(), raw.len());
        }

        #[test]
        fn synthesis_is_deterministic(raw in arb_items()) {
            let names = ["empty", "A", "B"];
            let make = || -> Vec<Item<usize>> {
                raw.iter()
                    .enumerate()
                    .map(|(i, qs)| {
                        let questions = qs.iter().map(|&(dx, s)| q(dx, names[s as usize]));
                        Item::new(questions.collect(), i)
                    })
                    .collect()
            };
            prop_assert_eq!(synthesize(make()), synthesize(make()));
        }
    }
}
