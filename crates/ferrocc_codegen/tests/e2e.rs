//! End-to-end lex -> parse -> lower scenarios, spec.md §8.3.
//!
//! Grounded on the teacher's own codegen test style
//! (`examples/bherbruck-llts/crates/llts_codegen/src/lib.rs` has inline
//! `#[test]` functions that build a `ProgramIR` value and assert on
//! `codegen.module().verify()`/the printed IR text) — ferrocc extends the
//! same pattern one stage earlier, starting from C source text instead of
//! a hand-built IR value, since this crate has no separate typed-IR stage
//! to hand-build.

use ferrocc_codegen::CodeGenerator;
use inkwell::context::Context;

fn lower(source: &str) -> String {
    let syntax = ferrocc_syntax::gnu_c11();
    let (tokens, lex_errors) = ferrocc_lexer::lex(source, 0, &syntax);
    assert!(lex_errors.is_empty(), "unexpected lex errors: {lex_errors:?}");
    let (ast, parse_errors) = ferrocc_parser::parse(&tokens);
    assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");

    let context = Context::create();
    let cg = CodeGenerator::new(&context, &ast.arena, "test");
    let module = cg.generate(ast.root).expect("lowering should succeed");
    module.verify().expect("module should verify");
    module.print_to_string().to_string()
}

/// spec.md §8.3 scenario 1: `int add(int a, int b) { return a + b; }`.
#[test]
fn arithmetic_function_emits_single_add_and_ret() {
    let ir = lower("int add(int a, int b) { return a + b; }");
    assert!(ir.contains("define i32 @add(i32 %a, i32 %b)"), "{ir}");
    assert!(ir.contains("add i32"), "{ir}");
    assert!(ir.contains("ret i32"), "{ir}");
}

/// spec.md §8.3 scenario 2: at `-O0` the unoptimized add/mul sequence
/// survives (ferrocc's optimization pipeline lives in `ferrocc_driver`,
/// not here, so this crate's IR is always the unoptimized form — the
/// second half of the scenario, `-O2` folding to `ret i32 14`, is
/// `ferrocc_driver`'s responsibility and tested there).
#[test]
fn constant_folding_candidate_preserves_unfolded_ops_before_optimization() {
    let ir = lower("int f(void) { return 2 + 3 * 4; }");
    assert!(ir.contains("mul"), "{ir}");
    assert!(ir.contains("add"), "{ir}");
}

/// spec.md §8.3 scenario 3: `sign(x)` — three return paths, all
/// terminated, module verifies (the `lower` helper already asserts
/// verification).
#[test]
fn control_flow_sign_function_has_three_returns() {
    let ir = lower(
        "int sign(int x) { if (x > 0) return 1; else if (x < 0) return -1; else return 0; }",
    );
    assert_eq!(ir.matches("ret i32").count(), 3, "{ir}");
}

/// spec.md §8.3 scenario 4: recursive `fact` calls itself once.
#[test]
fn recursion_emits_one_self_call() {
    let ir = lower("int fact(int n) { if (n <= 1) return 1; return n * fact(n - 1); }");
    assert_eq!(ir.matches("call i32 @fact").count(), 1, "{ir}");
}

/// spec.md §8.3 scenario 5: `a && b` short-circuits via two blocks and a
/// phi yielding i1.
#[test]
fn short_circuit_and_emits_phi() {
    let ir = lower("int g(int a, int b) { return a && b; }");
    assert!(ir.contains("phi i1"), "{ir}");
    assert!(ir.contains("br i1"), "{ir}");
}

/// spec.md §8.3 scenario 6: typedef disambiguation — `T x;` declares a
/// variable of type `int`, and `x * 2` in a later expression is a
/// multiplication, not a declaration, because `T` was registered as a
/// typedef name before it was used.
#[test]
fn typedef_disambiguation_parses_and_lowers_as_multiplication() {
    let ir = lower("typedef int T;\nT x = 5;\nint y = x * 2;\n");
    assert!(ir.contains("mul"), "{ir}");
}

/// Declaration menagerie (spec.md §8.4): pointer-to-function-returning-
/// pointer-to-function declarators parse and at least produce a callable
/// prototype once lowered.
#[test]
fn function_pointer_declarator_lowers_without_error() {
    let ir = lower("void (*signal(int sig, void (*handler)(int)))(int);\n");
    assert!(ir.contains("declare") || ir.contains("define"), "{ir}");
}

/// Struct member access lowers to a GEP against the computed layout
/// (spec.md §9's struct/sizeof redesign flag).
#[test]
fn struct_member_access_lowers_to_struct_gep() {
    let ir = lower(
        r#"
        struct Point { int x; int y; };
        int get_x(struct Point *p) { return p->x; }
        "#,
    );
    assert!(ir.contains("getelementptr"), "{ir}");
}

/// `sizeof` folds to the struct's computed byte size, not the
/// placeholder `4` spec.md §9 flags.
#[test]
fn sizeof_struct_folds_to_computed_layout_size() {
    let ir = lower(
        r#"
        struct Pair { int a; int b; };
        unsigned long pair_size(void) { return sizeof(struct Pair); }
        "#,
    );
    assert!(ir.contains("ret i64 8"), "{ir}");
}

/// `switch` lowers to a real LLVM `switch` instruction with fallthrough,
/// not the sequential-execution stub spec.md §9 flags.
#[test]
fn switch_statement_lowers_to_llvm_switch() {
    let ir = lower(
        r#"
        int classify(int x) {
            switch (x) {
                case 0: return 100;
                case 1:
                case 2: return 200;
                default: return 0;
            }
        }
        "#,
    );
    assert!(ir.contains("switch i32"), "{ir}");
}

/// spec.md §4.F.6/§8.1 property 6: statement lowering must stop descending
/// once the current block already has a terminator, so dead code after an
/// unconditional transfer doesn't get built into the same (already
/// terminated) basic block. `module.verify()` inside `lower()` is the
/// actual assertion here — a stray instruction after `ret`/`br` would fail
/// LLVM's verifier with "Instruction does not dominate all uses" or
/// "Terminator found in the middle of a basic block".
#[test]
fn statement_after_unconditional_return_is_not_lowered_into_the_same_block() {
    let ir = lower("int f(void) { return 1; int unreachable = 2; }");
    assert_eq!(ir.matches("ret i32").count(), 1, "{ir}");
}

#[test]
fn statement_after_break_inside_loop_is_not_lowered_into_the_same_block() {
    // `module.verify()` inside `lower()` is the real assertion: without the
    // terminator guard, `i = i + 1` would be built right after the `break`'s
    // unconditional branch in the same block, which LLVM rejects.
    let ir = lower(
        r#"
        int g(void) {
            int i = 0;
            while (i < 10) {
                break;
                i = i + 1;
            }
            return i;
        }
        "#,
    );
    assert!(ir.contains("ret i32"), "{ir}");
}
