//! Core lattice model types for the kmcgen kMC kernel compiler.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the declarative model the compiler consumes: species, layers and their
//! site types, relative coordinates, elementary processes, and the
//! validated [`ProcessList`] that owns them all.
//!
//! # Loading a model
//!
//! ```
//! use kmcgen_core::ProcessList;
//!
//! let json = r#"{
//!     "dimension": 1,
//!     "species": ["empty", "A"],
//!     "default_species": "empty",
//!     "layers": [{ "name": "default", "sites": [{ "name": "a" }] }],
//!     "processes": [
//!         { "name": "adsA", "rate_constant": "k_ads",
//!           "conditions": [{ "coord": "a.(0,0,0)", "species": "empty" }],
//!           "actions": [{ "coord": "a.(0,0,0)", "species": "A" }] }
//!     ]
//! }"#;
//! let model = ProcessList::from_json(json).unwrap();
//! assert_eq!(model.sites_per_cell(), 1);
//! assert_eq!(model.processes().len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod conversion;
pub mod coord;
pub mod error;
pub mod hash;
pub mod id;
pub mod layer;
pub mod parse;
pub mod process;
pub mod proclist;
pub mod schema;
pub mod species;

pub use conversion::ConversionTable;
pub use coord::Coordinate;
pub use error::{ModelError, ParseError};
pub use hash::model_fingerprint;
pub use id::{Offset, ProcessId, SiteIndex, SpeciesId};
pub use layer::{Layer, SiteType};
pub use parse::parse_coordinate;
pub use process::{Action, Condition, Process};
pub use proclist::{ProcessList, ProcessListBuilder, SiteRef};
pub use schema::ModelDocument;
pub use species::Species;
