//! Identifier resolution during lowering — spec.md §9's
//! `symbol_table_lookup` local-vs-global ambiguity, resolved by keeping
//! locals and globals in distinct entry kinds rather than one shared table
//! searched by name alone.
//!
//! Scoping follows `ferrocc_parser::scope::TypedefScopes`'s push/pop-per-
//! block shape, generalized from a flat name set to a name → value map.

use std::collections::HashMap;

use inkwell::values::{FunctionValue, PointerValue};

use crate::types::CType;

#[derive(Debug, Clone)]
pub enum SymbolEntry<'ctx> {
    /// A local variable or parameter: its stack slot, type, and the
    /// function it belongs to (so a lookup can never silently resolve
    /// against a slot left over from a different function).
    Local {
        ptr: PointerValue<'ctx>,
        ty: CType,
        function: FunctionValue<'ctx>,
    },
    /// A file-scope variable or a function.
    Global { ptr: PointerValue<'ctx>, ty: CType },
    Function { value: FunctionValue<'ctx>, ty: CType },
}

impl<'ctx> SymbolEntry<'ctx> {
    pub fn ty(&self) -> &CType {
        match self {
            SymbolEntry::Local { ty, .. } | SymbolEntry::Global { ty, .. } | SymbolEntry::Function { ty, .. } => ty,
        }
    }
}

/// A scoped stack of name tables, one pushed per compound statement (and
/// per function's parameter list), mirroring `TypedefScopes`.
#[derive(Debug, Default)]
pub struct SymbolTable<'ctx> {
    globals: HashMap<String, SymbolEntry<'ctx>>,
    scopes: Vec<HashMap<String, SymbolEntry<'ctx>>>,
}

impl<'ctx> SymbolTable<'ctx> {
    pub fn new() -> Self {
        Self { globals: HashMap::new(), scopes: Vec::new() }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn declare_global(&mut self, name: &str, entry: SymbolEntry<'ctx>) {
        self.globals.insert(name.to_string(), entry);
    }

    /// Declares `name` in the innermost open scope, or at file scope if no
    /// block is currently open (top-level declarations between functions).
    pub fn declare_local(&mut self, name: &str, entry: SymbolEntry<'ctx>) {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(name.to_string(), entry);
            }
            None => {
                self.globals.insert(name.to_string(), entry);
            }
        }
    }

    /// Innermost-first lookup: a local shadows an outer local, which
    /// shadows a global, the same precedence C's block scoping gives.
    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry<'ctx>> {
        for scope in self.scopes.iter().rev() {
            if let Some(entry) = scope.get(name) {
                return Some(entry);
            }
        }
        self.globals.get(name)
    }
}

/// Per-function loop/switch jump targets, pushed on entry and popped on
/// exit so `break`/`continue` always resolve to the innermost enclosing
/// construct (spec.md §4.F.5).
#[derive(Debug, Default)]
pub struct JumpTargets<'ctx> {
    break_targets: Vec<inkwell::basic_block::BasicBlock<'ctx>>,
    continue_targets: Vec<inkwell::basic_block::BasicBlock<'ctx>>,
}

impl<'ctx> JumpTargets<'ctx> {
    pub fn new() -> Self {
        Self { break_targets: Vec::new(), continue_targets: Vec::new() }
    }

    /// Used by loops, which are both a break and a continue target.
    pub fn push(
        &mut self,
        break_bb: inkwell::basic_block::BasicBlock<'ctx>,
        continue_bb: inkwell::basic_block::BasicBlock<'ctx>,
    ) {
        self.break_targets.push(break_bb);
        self.continue_targets.push(continue_bb);
    }

    pub fn pop(&mut self) {
        self.break_targets.pop();
        self.continue_targets.pop();
    }

    /// Used by `switch`, which is a break target but not a continue target —
    /// `continue` inside a `switch` still targets the enclosing loop.
    pub fn push_break_only(&mut self, break_bb: inkwell::basic_block::BasicBlock<'ctx>) {
        self.break_targets.push(break_bb);
    }

    pub fn pop_break_only(&mut self) {
        self.break_targets.pop();
    }

    pub fn current_break(&self) -> Option<inkwell::basic_block::BasicBlock<'ctx>> {
        self.break_targets.last().copied()
    }

    pub fn current_continue(&self) -> Option<inkwell::basic_block::BasicBlock<'ctx>> {
        self.continue_targets.last().copied()
    }
}
