//! Optimization pipeline invocation — spec.md §4.G.
//!
//! Grounded on the teacher's `pipeline::compile::emit_and_link`
//! (`examples/bherbruck-llts/crates/llts_driver/src/pipeline/compile.rs`),
//! which maps an `OptimizationLevel` onto a named `"default<On>"` pass
//! pipeline and runs it through LLVM's new pass manager before object
//! emission. ferrocc additionally turns on the per-level vectorization
//! knobs spec.md §4.G calls for (loop-interleave/vectorize + SLP at O2+,
//! loop-unroll at O3), which the teacher's fixed two-knob call doesn't need
//! since LTS has no vectorizable hot loops worth distinguishing.

use inkwell::module::Module;
use inkwell::passes::PassBuilderOptions;
use inkwell::targets::TargetMachine;

/// Runs the named `default<On>` pipeline for `opt_level` (0-3) against
/// `module`, in place. `opt_level == 0` is a no-op: spec.md §8.3 scenario 2
/// requires `-O0` to preserve the unoptimized add/mul sequence verbatim.
pub fn optimize(module: &Module, machine: &TargetMachine, opt_level: u8) -> Result<(), String> {
    if opt_level == 0 {
        return Ok(());
    }

    let passes = match opt_level {
        1 => "default<O1>",
        2 => "default<O2>",
        _ => "default<O3>",
    };

    let options = PassBuilderOptions::create();
    options.set_verify_each(true);
    if opt_level >= 2 {
        options.set_loop_interleaving(true);
        options.set_loop_vectorization(true);
        options.set_slp_vectorization(true);
    }
    if opt_level >= 3 {
        options.set_loop_unrolling(true);
    }

    module
        .run_passes(passes, machine, options)
        .map_err(|e| e.to_string())
}
