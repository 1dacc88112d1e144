//! kmcgen: a compiler from lattice kinetic Monte Carlo models to Fortran
//! kernels.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all kmcgen sub-crates. The `kmcgen` binary in this crate drives the
//! same pipeline from the command line.
//!
//! # Quick start
//!
//! ```rust
//! use kmcgen::prelude::*;
//!
//! let model = ProcessList::from_json(r#"{
//!     "dimension": 1,
//!     "species": ["empty", "A"],
//!     "layers": [{ "name": "default", "sites": [{ "name": "a" }] }],
//!     "processes": [
//!         { "name": "adsA", "rate_constant": "k_ads",
//!           "conditions": [{ "coord": "a.(0,0,0)", "species": "empty" }],
//!           "actions": [{ "coord": "a.(0,0,0)", "species": "A" }] },
//!         { "name": "desA", "rate_constant": "k_des",
//!           "conditions": [{ "coord": "a.(0,0,0)", "species": "A" }],
//!           "actions": [{ "coord": "a.(0,0,0)", "species": "empty" }] }
//!     ]
//! }"#).unwrap();
//!
//! let plan = compile(&model).unwrap();
//! assert!(plan.report().events.iter().all(|e| e.queries == 0));
//!
//! let sources = generate(&model, &plan, &EmitConfig::default()).unwrap();
//! assert!(sources.proclist.contains("subroutine take_A_default_a(site)"));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`model`] | `kmcgen-core` | Coordinates, layers, processes, validation, JSON loading |
//! | [`lattice`] | `kmcgen-lattice` | Site index mapping and its symbolic formulas |
//! | [`compiler`] | `kmcgen-compiler` | Event classification, decision trees, kernel plans |
//! | [`emit`] | `kmcgen-emit` | Fortran rendering and output files |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Model types, validation and JSON loading (`kmcgen-core`).
pub use kmcgen_core as model;

/// Lattice index mapping (`kmcgen-lattice`).
///
/// [`lattice::IndexMapping`] converts between site coordinates and linear
/// indices at runtime; [`lattice::IndexFormula`] is the same mapping in
/// symbolic form for emission.
pub use kmcgen_lattice as lattice;

/// Event classification and decision-tree synthesis (`kmcgen-compiler`).
pub use kmcgen_compiler as compiler;

/// Fortran source emission (`kmcgen-emit`).
pub use kmcgen_emit as emit;

/// Common imports for typical kmcgen usage.
///
/// ```rust
/// use kmcgen::prelude::*;
/// ```
pub mod prelude {
    // Model
    pub use kmcgen_core::{
        Coordinate, Layer, Process, ProcessId, ProcessList, ProcessListBuilder, SiteType,
        SpeciesId,
    };

    // Errors
    pub use kmcgen_compiler::CompileError;
    pub use kmcgen_core::ModelError;
    pub use kmcgen_emit::EmitError;
    pub use kmcgen_lattice::LatticeError;

    // Pipeline
    pub use kmcgen_compiler::{compile, CompileReport, KernelPlan};
    pub use kmcgen_emit::{build, generate, EmitConfig, GeneratedSources, OverwritePolicy};
    pub use kmcgen_lattice::{IndexFormula, IndexMapping};
}
