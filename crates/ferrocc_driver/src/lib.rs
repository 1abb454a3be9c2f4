//! Pipeline orchestration for the ferrocc C front-end — spec.md §2's
//! component G (`Optimization & output driver`) plus the glue that wires
//! every earlier stage together end to end.
//!
//! `ferrocc_codegen` only lowers an AST to an (unoptimized, unverified)
//! `inkwell::Module`; everything downstream of that — target machine
//! selection, the optimization pipeline, file emission, and linking — is
//! this crate, matching the crate-per-component split in SPEC_FULL.md §2.

pub mod emit;
mod emitter;
pub mod error;
pub mod link;
pub mod opt;
pub mod pipeline;

pub use emitter::Emitter;
pub use error::DriverError;
pub use pipeline::{parse_to_ast, run, CompileOptions, OutputKind};
