//! Emission errors.

use std::io;
use std::path::PathBuf;

use kmcgen_compiler::CompileError;
use kmcgen_core::ModelError;
use thiserror::Error;

/// Emission failed. No output file is valid after an error.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Compiling the model failed.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// A lookup into the model failed while rendering.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The emit configuration is unusable.
    #[error("invalid emit configuration: {reason}")]
    Config {
        /// What is wrong.
        reason: String,
    },
    /// The plan was compiled from a different model.
    #[error("kernel plan fingerprint {plan:016x} does not match model fingerprint {model:016x}")]
    PlanMismatch {
        /// Fingerprint recorded in the plan.
        plan: u64,
        /// Fingerprint of the model passed in.
        model: u64,
    },
    /// A generated identifier exceeds the target language limit.
    #[error("generated identifier '{name}' is {length} characters long, the limit is {limit}")]
    IdentifierTooLong {
        /// The identifier.
        name: String,
        /// Its length.
        length: usize,
        /// The limit.
        limit: usize,
    },
    /// An output file exists and overwriting it was not authorized.
    #[error("output file {} already exists (use --force to overwrite)", .path.display())]
    OutputConflict {
        /// The existing file.
        path: PathBuf,
    },
    /// Reading or writing an output path failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The path involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}
