//! Naming, default-literal rendering, and insertion-point splicing core of a
//! schema-driven C++ code generator.
//!
//! Given an immutable descriptor tree, this crate derives collision-free,
//! C++-legal identifiers for every schema element ([`names`]), renders
//! default values as C++ literals ([`defaults`]), and lets independent
//! generator plugins compose fragments into a shared set of output files
//! through named insertion points ([`context`]).

pub mod context;
pub mod defaults;
pub mod descriptor;
mod error;
pub mod generator;
pub mod mock;
pub mod names;
pub mod output;

pub use context::GeneratorContext;
pub use error::CodeGenError;
pub use generator::CodeGenerator;
pub use output::{DiskOutputStreamProvider, OutputStreamProvider};
