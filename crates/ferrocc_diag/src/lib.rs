//! Source map and diagnostics rendering for the ferrocc C front-end.
//!
//! This crate owns source buffers (spec.md §4.A's "small table") and renders
//! diagnostics in the `<file>:<line>:<col>: <severity>: <msg>` shape spec.md
//! §6.5 specifies, with an optional source snippet, caret, and fix-it hint.
//! It is infrastructure shared by every later stage, not a language feature,
//! so none of it is touched by the spec's Non-goals.

mod diagnostic;
mod emitter;
mod location;
mod source_map;

pub use diagnostic::{Diagnostic, Severity};
pub use emitter::Emitter;
pub use location::SourceLocation;
pub use source_map::SourceMap;
