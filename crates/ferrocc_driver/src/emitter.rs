//! The public code-generation facade — spec.md §6.2's `Emitter`.
//!
//! spec.md's library surface describes `Emitter` as a single stateful
//! object (`new(backend, target_triple)`, `set_opt_level`,
//! `set_debug_info`, `generate`, the `emit_*` family, `link`,
//! `last_error`) that owns the whole lowering-through-link lifecycle.
//! `ferrocc_codegen::CodeGenerator` only covers lowering (spec.md
//! component F); `Emitter` is the component-G wrapper that adds target
//! machine selection, optimization, file emission, and linking on top,
//! matching the crate split in SPEC_FULL.md §2 (`F` = `ferrocc_codegen`,
//! `G` = `ferrocc_driver`).
//!
//! `generate`/`emit_*`/`link` return `bool` rather than `Result`,
//! mirroring spec.md §6.2's literal surface (`bool` success + a
//! `last_error()` query) instead of this corpus's more common
//! `Result<T, E>` shape elsewhere in `ferrocc` — `Emitter` is the one seam
//! where the spec itself dictates the signature, so it is followed
//! verbatim rather than generalized.

use std::path::Path;

use ferrocc_ast::{Arena, NodeId};
use ferrocc_codegen::CodeGenerator;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::targets::{
    CodeModel, InitializationConfig, RelocMode, Target, TargetMachine, TargetTriple,
};
use inkwell::OptimizationLevel;

use crate::{emit, link, opt};

/// Owns the LLVM context/module/target-machine for one compilation.
/// `'ctx` borrows a `Context` the caller creates (the same `&'ctx Context`
/// threading `ferrocc_codegen::CodeGenerator` already uses — `Context`
/// cannot be created and returned from `Emitter::new` itself without a
/// self-referential struct, since `Module<'ctx>` borrows it).
pub struct Emitter<'ctx> {
    context: &'ctx Context,
    machine: TargetMachine,
    module: Option<Module<'ctx>>,
    opt_level: u8,
    /// Accepted and stored per spec.md §6.1 (`-g`); debug-info emission
    /// itself is an explicit Non-goal (spec.md §1), so this only gates
    /// whether a caller's `-g` flag round-trips, not any DWARF output.
    debug_info: bool,
    last_error: Option<String>,
}

impl<'ctx> Emitter<'ctx> {
    /// `backend` is checked against spec.md §6.1's `--backend` set:
    /// only `"llvm"` is implemented, matching the CLI contract ("other
    /// backends rejected with a clear diagnostic, not silently ignored").
    /// `target_triple` is resolved per spec.md §9's open-question fix: try
    /// the caller-supplied triple first, fall back to the host default
    /// triple on failure, with no intermediate handle that could be freed
    /// twice (the original's `allocated_triple`-compared-twice bug).
    pub fn new(context: &'ctx Context, backend: &str, target_triple: Option<&str>) -> Result<Self, String> {
        if backend != "llvm" {
            return Err(format!(
                "backend `{backend}` is not implemented; only `llvm` is"
            ));
        }

        Target::initialize_native(&InitializationConfig::default()).map_err(|e| e.to_string())?;

        let mut triple = target_triple
            .map(TargetTriple::create)
            .unwrap_or_else(TargetMachine::get_default_triple);
        let target = match Target::from_triple(&triple) {
            Ok(target) => target,
            Err(_) => {
                triple = TargetMachine::get_default_triple();
                Target::from_triple(&triple).map_err(|e| e.to_string())?
            }
        };

        let cpu = TargetMachine::get_host_cpu_name();
        let features = TargetMachine::get_host_cpu_features();
        let machine = target
            .create_target_machine(
                &triple,
                cpu.to_str().unwrap_or("generic"),
                features.to_str().unwrap_or(""),
                OptimizationLevel::Default,
                RelocMode::PIC,
                CodeModel::Default,
            )
            .ok_or_else(|| "failed to create target machine".to_string())?;

        Ok(Self {
            context,
            machine,
            module: None,
            opt_level: 0,
            debug_info: false,
            last_error: None,
        })
    }

    pub fn set_opt_level(&mut self, level: u8) {
        self.opt_level = level;
    }

    pub fn set_debug_info(&mut self, enabled: bool) {
        self.debug_info = enabled;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn module(&self) -> Option<&Module<'ctx>> {
        self.module.as_ref()
    }

    fn fail(&mut self, message: String) -> bool {
        self.last_error = Some(message);
        false
    }

    /// Lowers `root` (a `ferrocc_ast::NodeKind::TranslationUnit`) out of
    /// `arena` into a fresh LLVM module named `module_name`, then runs the
    /// optimization pipeline for the current `set_opt_level`. On success
    /// the module is retained (`Self::module`) for the `emit_*`/`link`
    /// calls that follow; on failure it is not, so a stale half-lowered
    /// module can never be emitted.
    pub fn generate(&mut self, arena: &Arena, root: NodeId, module_name: &str) -> bool {
        let cg = CodeGenerator::new(self.context, arena, module_name);
        let module = match cg.generate(root) {
            Ok(m) => m,
            Err(e) => return self.fail(e.to_string()),
        };
        if let Err(e) = opt::optimize(&module, &self.machine, self.opt_level) {
            return self.fail(e);
        }
        if let Err(e) = module.verify().map_err(|e| e.to_string()) {
            return self.fail(e);
        }
        self.module = Some(module);
        true
    }

    pub fn emit_object(&mut self, path: &Path) -> bool {
        let Some(module) = &self.module else {
            return self.fail("no module generated yet".to_string());
        };
        match emit::emit_object(module, &self.machine, path) {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    pub fn emit_assembly(&mut self, path: &Path) -> bool {
        let Some(module) = &self.module else {
            return self.fail("no module generated yet".to_string());
        };
        match emit::emit_assembly(module, &self.machine, path) {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    pub fn emit_llvm_ir(&mut self, path: &Path) -> bool {
        let Some(module) = &self.module else {
            return self.fail("no module generated yet".to_string());
        };
        match emit::emit_llvm_ir(module, path) {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    pub fn emit_bitcode(&mut self, path: &Path) -> bool {
        let Some(module) = &self.module else {
            return self.fail("no module generated yet".to_string());
        };
        match emit::emit_bitcode(module, path) {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    pub fn link(&mut self, objects: &[std::path::PathBuf], output: &Path, is_shared: bool) -> bool {
        match link::link(objects, output, is_shared) {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unimplemented_backend() {
        let context = Context::create();
        let err = Emitter::new(&context, "zig", None).unwrap_err();
        assert!(err.contains("zig"));
    }
}
