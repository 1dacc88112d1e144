//! Source emission for compiled kMC kernels.
//!
//! Renders a [`KernelPlan`] as two Fortran 90 modules:
//!
//! - `lattice`: lattice constants, `to_index`/`to_coord`, and site access
//!   wrappers over the runtime's linear storage.
//! - `proclist`: species and process constants, `check_*`, `put_*`/`take_*`
//!   and `touchup_*` procedures, `run_proc_nr`/`do_kmc_step` dispatch,
//!   `initialize_state`, and name tables.
//!
//! Rendering is pure: [`generate`] returns both files as strings, and
//! only [`write_sources`] touches the filesystem. Identical models give
//! byte-identical output.
//!
//! # Examples
//!
//! ```
//! use kmcgen_core::ProcessList;
//! use kmcgen_emit::{generate, EmitConfig};
//!
//! let model = ProcessList::from_json(r#"{
//!     "dimension": 1,
//!     "species": ["empty", "A"],
//!     "layers": [{ "name": "default", "sites": [{ "name": "a" }] }],
//!     "processes": [
//!         { "name": "adsA", "conditions": [{ "coord": "a.(0,0,0)", "species": "empty" }],
//!           "actions": [{ "coord": "a.(0,0,0)", "species": "A" }] }
//!     ]
//! }"#).unwrap();
//! let plan = kmcgen_compiler::compile(&model).unwrap();
//! let sources = generate(&model, &plan, &EmitConfig::default()).unwrap();
//! assert!(sources.proclist.contains("subroutine put_A_default_a(site)"));
//! assert!(sources.lattice.contains("pure function to_index(site)"));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod lattice;
pub mod names;
pub mod output;
pub mod proclist;
pub mod writer;

use std::path::{Path, PathBuf};

use kmcgen_compiler::{compile, KernelPlan};
use kmcgen_core::{model_fingerprint, ProcessList};
use tracing::info;

pub use config::{EmitConfig, OverwritePolicy};
pub use error::EmitError;
pub use output::write_sources;

/// Rendered source text of both generated files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedSources {
    /// Contents of the lattice file.
    pub lattice: String,
    /// Contents of the process-list file.
    pub proclist: String,
}

/// Render both files for a plan compiled from `model`.
pub fn generate(
    model: &ProcessList,
    plan: &KernelPlan,
    config: &EmitConfig,
) -> Result<GeneratedSources, EmitError> {
    config.validate()?;
    let fingerprint = model_fingerprint(model);
    if plan.fingerprint() != fingerprint {
        return Err(EmitError::PlanMismatch {
            plan: plan.fingerprint(),
            model: fingerprint,
        });
    }
    Ok(GeneratedSources {
        lattice: lattice::render_lattice(model, plan, config.indent)?,
        proclist: proclist::render_proclist(model, plan, config.indent)?,
    })
}

/// Result of [`build`].
#[derive(Debug)]
pub struct BuildOutput {
    /// The compiled plan.
    pub plan: KernelPlan,
    /// Paths written, lattice first.
    pub paths: Vec<PathBuf>,
}

/// Compile `model`, render it, and write both files.
///
/// Nothing is written unless compilation and rendering both succeed.
pub fn build<F>(model: &ProcessList, config: &EmitConfig, confirm: F) -> Result<BuildOutput, EmitError>
where
    F: FnMut(&Path) -> bool,
{
    let plan = compile(model)?;
    let sources = generate(model, &plan, config)?;
    let paths = write_sources(&sources, config, confirm)?;
    info!(
        fingerprint = %format!("{:016x}", plan.fingerprint()),
        files = paths.len(),
        "build complete"
    );
    Ok(BuildOutput { plan, paths })
}
