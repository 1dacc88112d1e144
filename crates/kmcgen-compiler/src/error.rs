//! Compilation errors.

use kmcgen_core::ModelError;
use kmcgen_lattice::LatticeError;
use thiserror::Error;

/// Compilation failed.
///
/// Model inconsistencies surface unchanged as [`CompileError::Model`], so
/// callers can match on the underlying [`ModelError`] variant.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The model violates an invariant the compiler assumes.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The lattice parameters cannot be indexed.
    #[error(transparent)]
    Lattice(#[from] LatticeError),
    /// Two generated procedures would share a name. Generated names are
    /// compared case-insensitively.
    #[error("generated procedure name '{name}' is produced by both {first} and {second}")]
    NameCollision {
        /// The colliding name.
        name: String,
        /// What produced it first.
        first: String,
        /// What produced it again.
        second: String,
    },
}
