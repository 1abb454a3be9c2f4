//! Lowers a `ferrocc_ast::Ast` to an LLVM `Module` via `inkwell` —
//! spec.md §4.F.
//!
//! Generalizes the teacher's `CodeGenerator<'ctx>`
//! (`examples/bherbruck-llts/crates/llts_codegen/src/lib.rs`), which holds
//! one fixed variable scope and walks a pre-lowered `ProgramIR`, into a
//! `CodeGenerator<'ctx, 'a>` that walks `ferrocc_ast` nodes directly (this
//! crate has no separate typed-IR stage between parsing and codegen) and
//! carries a real lexical scope stack plus goto/label support a C front-end
//! needs that LTS's structured-only control flow didn't.

mod coerce;
pub mod decl;
pub mod error;
mod expr;
pub mod layout;
mod stmt;
pub mod symtab;
pub mod types;

use std::collections::HashMap;

use ferrocc_ast::{Arena, NodeId};
use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::values::FunctionValue;

pub use error::LowerError;
pub use types::CType;

use symtab::{JumpTargets, SymbolTable};
use types::TypeEnv;

/// The main code generator. Holds the LLVM context/module/builder, the
/// type system (`TypeRegistry`/`TypeEnv`), the lexical symbol table, and
/// the handful of pieces of state that only make sense while a single
/// function body is being lowered (`current_function`, `labels`, ...).
///
/// `'ctx` is LLVM's context lifetime (inkwell's convention); `'a` borrows
/// the `Arena` the AST being lowered lives in — the two are independent
/// since the AST and the LLVM context have unrelated lifetimes in the
/// driver that owns both.
pub struct CodeGenerator<'ctx, 'a> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    registry: types::TypeRegistry<'ctx>,
    type_env: TypeEnv,
    symbols: SymbolTable<'ctx>,
    jumps: JumpTargets<'ctx>,
    arena: &'a Arena,
    /// Set for the duration of `decl::lower_body`'s walk of one function.
    current_function: Option<FunctionValue<'ctx>>,
    current_return_type: Option<CType>,
    /// `main` falling off the end, or hitting a bare `return;`, returns
    /// `0` to the C runtime regardless of how it was declared (C99
    /// 5.1.2.2.3) — tracked separately from `current_return_type` since
    /// `main`'s declared type and its actual LLVM return type can differ
    /// (a `void main(void)` still has to hand the runtime an `i32`).
    current_function_is_main: bool,
    /// Label name -> pre-created basic block, populated by a pre-pass over
    /// a function body before its statements are lowered, so a forward
    /// `goto` resolves without a second pass.
    labels: HashMap<String, BasicBlock<'ctx>>,
    /// Enumerator constant name -> value, populated by `decl`'s tag
    /// registration pass. C enum constants are compile-time `int`s, not
    /// variables, so they live here rather than in `symbols`.
    enum_constants: HashMap<String, i64>,
    string_counter: u32,
}

impl<'ctx, 'a> CodeGenerator<'ctx, 'a> {
    pub fn new(context: &'ctx Context, arena: &'a Arena, module_name: &str) -> Self {
        let module = context.create_module(module_name);
        let builder = context.create_builder();
        let registry = types::TypeRegistry::new(context);
        Self {
            context,
            module,
            builder,
            registry,
            type_env: TypeEnv::default(),
            symbols: SymbolTable::new(),
            jumps: JumpTargets::new(),
            arena,
            current_function: None,
            current_return_type: None,
            current_function_is_main: false,
            labels: HashMap::new(),
            enum_constants: HashMap::new(),
            string_counter: 0,
        }
    }

    /// Runs the full declare-signatures-then-lower-bodies pipeline over a
    /// translation unit and hands back the finished module.
    pub fn generate(mut self, root: NodeId) -> Result<Module<'ctx>, LowerError> {
        decl::lower_translation_unit(&mut self, root)?;
        Ok(self.module)
    }

    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }

    fn resolve_type_node(&mut self, node: NodeId, loc: ferrocc_diag::SourceLocation) -> Result<CType, LowerError> {
        types::resolve_type(node, self.arena, &self.type_env, loc)
    }
}
