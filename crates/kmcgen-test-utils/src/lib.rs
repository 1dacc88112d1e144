//! Test utilities for kmcgen development.
//!
//! - [`fixtures`]: small, well-understood models used across crates.
//! - [`KernelInterpreter`]: runs a compiled [`KernelPlan`] on a periodic
//!   lattice in Rust, so tests can compare the incrementally maintained
//!   availability against a brute-force recomputation.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod interpreter;

pub use interpreter::KernelInterpreter;

#[doc(no_inline)]
pub use kmcgen_compiler::KernelPlan;
