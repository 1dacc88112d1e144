//! Lattice indexing for generated kMC kernels.
//!
//! A simulated system repeats the model's unit cell `Nx x Ny x Nz` times
//! with periodic boundaries. Every site is addressed either by its
//! [`LatticeSite`] (cell coordinates plus a one-based site index inside the
//! cell) or by a one-based linear storage index:
//!
//! ```text
//! index = S * (x mod Nx + Nx * (y mod Ny) + Nx * Ny * (z mod Nz)) + local
//! ```
//!
//! where `S` is the sites-per-unit-cell constant.
//!
//! # Components
//!
//! - [`IndexMapping`]: concrete mapping for known repeat counts, with the
//!   exact inverse. Used by tests and by anything that interprets a
//!   compiled kernel in Rust.
//! - [`IndexFormula`]: the same mapping kept symbolic in the repeat counts,
//!   which are only known to the runtime. The source emitter renders it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod formula;
pub mod mapping;

#[cfg(test)]
pub(crate) mod compliance;

pub use error::LatticeError;
pub use formula::{Axis, ForwardTerm, IndexFormula, InverseTerm};
pub use mapping::{IndexMapping, LatticeSite};
