use rustc_hash::FxHashSet;

/// Tracks which identifiers currently name a type, so the parser can tell
/// `(x)` the cast from `(x)` the parenthesized expression, and `T *p;` the
/// declaration from `T * p;` the multiplication-expression-statement.
///
/// A scoped stack of sets rather than one flat/shared set (spec.md §9's
/// "typedef ambiguity" design note): a typedef declared inside a block must
/// stop being a type name once the block closes, even if an outer scope (or
/// a *different* declaration of the same identifier as an ordinary name)
/// still uses that spelling. Each [`TypedefScopes::push`]/[`pop`] pair
/// brackets one block, parameter list, or struct body.
#[derive(Debug)]
pub struct TypedefScopes {
    scopes: Vec<FxHashSet<String>>,
}

impl TypedefScopes {
    /// Seeds the outermost scope with the handful of names every
    /// translation unit can use as types without a preceding `typedef` —
    /// `size_t`, `FILE`, `va_list` and the other system/compiler built-ins
    /// spec.md §4.E.3 names, plus `examples/original_source/src/syntax/
    /// c_syntax.c`'s own `size_t`/`ptrdiff_t`/`intptr_t`/`uintptr_t` seed
    /// list. Anything else beginning `__builtin_` is accepted by
    /// [`Self::is_type_name`]'s prefix rule instead of being listed here.
    pub fn new() -> Self {
        let mut root = FxHashSet::default();
        for name in [
            "__builtin_va_list",
            "va_list",
            "size_t",
            "ssize_t",
            "ptrdiff_t",
            "intptr_t",
            "uintptr_t",
            "wchar_t",
            "wint_t",
            "FILE",
            "pthread_t",
            "pthread_mutex_t",
            "pthread_cond_t",
            "pthread_attr_t",
            "__uint8_t",
            "__uint16_t",
            "__uint32_t",
            "__uint64_t",
            "__int8_t",
            "__int16_t",
            "__int32_t",
            "__int64_t",
            "int8_t",
            "int16_t",
            "int32_t",
            "int64_t",
            "uint8_t",
            "uint16_t",
            "uint32_t",
            "uint64_t",
        ] {
            root.insert(name.to_string());
        }
        Self {
            scopes: vec![root],
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(FxHashSet::default());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "popped the root typedef scope");
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Registers `name` as a type name in the innermost scope.
    pub fn declare(&mut self, name: &str) {
        self.scopes
            .last_mut()
            .expect("at least one scope")
            .insert(name.to_string());
    }

    pub fn is_type_name(&self, name: &str) -> bool {
        name.starts_with("__builtin_") || self.scopes.iter().rev().any(|s| s.contains(name))
    }
}

impl Default for TypedefScopes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typedef_goes_out_of_scope_after_pop() {
        let mut scopes = TypedefScopes::new();
        scopes.push();
        scopes.declare("widget_t");
        assert!(scopes.is_type_name("widget_t"));
        scopes.pop();
        assert!(!scopes.is_type_name("widget_t"));
    }

    #[test]
    fn outer_typedef_visible_in_nested_scope() {
        let mut scopes = TypedefScopes::new();
        scopes.declare("widget_t");
        scopes.push();
        assert!(scopes.is_type_name("widget_t"));
        scopes.pop();
    }

    #[test]
    fn builtin_va_list_is_seeded() {
        let scopes = TypedefScopes::new();
        assert!(scopes.is_type_name("__builtin_va_list"));
    }

    #[test]
    fn system_built_in_type_names_are_seeded() {
        let scopes = TypedefScopes::new();
        for name in ["size_t", "FILE", "pthread_t", "uint32_t", "__uint32_t"] {
            assert!(scopes.is_type_name(name), "{name} should be a seeded type name");
        }
    }

    #[test]
    fn any_builtin_prefixed_identifier_is_a_type_name() {
        let scopes = TypedefScopes::new();
        assert!(scopes.is_type_name("__builtin_ms_va_list"));
        assert!(!scopes.is_type_name("builtin_not_reserved"));
    }
}
