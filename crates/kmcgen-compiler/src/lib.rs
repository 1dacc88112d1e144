//! The process-list compiler.
//!
//! Turns a validated [`ProcessList`](kmcgen_core::ProcessList) into a
//! [`KernelPlan`]: everything the source emitter needs, already resolved
//! and ordered.
//!
//! # Passes
//!
//! 1. [`frame`]: every process is re-expressed in runtime cell deltas
//!    measured from its anchor, resolving cross-layer shifts once.
//! 2. [`classify`]: for every `(species, site type, put|take)` event, find
//!    the processes it may enable or disable, and from where.
//! 3. [`tree`]: turn each event's candidates into a disambiguation tree
//!    that queries shared neighbour coordinates once.
//! 4. [`plan`]: assemble check, update, touch-up and dispatch procedures.
//!
//! The compiler is a pure, single-threaded transformation. Compiling the
//! same model twice yields identical plans: every collection is ordered by
//! declaration order, never by hash order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod error;
pub mod frame;
pub mod plan;
pub mod report;
pub mod tree;

pub use classify::{
    classify_all, classify_event, DisableRule, Direction, EnableCandidate, EventClassification,
    EventKey, Outcome,
};
pub use error::CompileError;
pub use frame::ProcessFrame;
pub use plan::{
    compile, ActionStep, CheckProcedure, KernelPlan, Payload, RunStep, SiteConstant,
    TouchupProcedure, UpdateProcedure, RUNTIME_NAMES,
};
pub use report::{CompileReport, EventStats, TouchupStats};
pub use tree::{synthesize, Arm, DecisionTree, Item, Node};
