//! spec.md §8.3 scenario 2: at `-O0` the add/mul sequence survives; at
//! `-O2`, constant folding collapses `2 + 3 * 4` to `ret i32 14`.
//!
//! Exercises `ferrocc_driver::Emitter` directly (rather than `run`, which
//! writes files to disk) so the test only touches the in-memory module.

use ferrocc_diag::{Emitter as DiagEmitter, SourceMap};
use ferrocc_driver::{pipeline::CompileOptions, Emitter};
use inkwell::context::Context;

fn lower_with_opt(source: &str, opt_level: u8) -> String {
    let mut sources = SourceMap::new();
    let mut diags = DiagEmitter::new();
    let options = CompileOptions::default();
    let ast = ferrocc_driver::parse_to_ast(source, "<test>", &options, &mut sources, &mut diags)
        .expect("parse should succeed");

    let context = Context::create();
    let mut emitter = Emitter::new(&context, "llvm", None).expect("emitter should construct");
    emitter.set_opt_level(opt_level);
    assert!(
        emitter.generate(&ast.arena, ast.root, "test"),
        "lowering failed: {:?}",
        emitter.last_error()
    );
    emitter.module().unwrap().print_to_string().to_string()
}

#[test]
fn minus_o0_preserves_unfolded_arithmetic() {
    let ir = lower_with_opt("int f(void) { return 2 + 3 * 4; }", 0);
    assert!(ir.contains("mul"), "{ir}");
    assert!(ir.contains("add"), "{ir}");
}

#[test]
fn minus_o2_folds_constant_expression() {
    let ir = lower_with_opt("int f(void) { return 2 + 3 * 4; }", 2);
    assert!(ir.contains("ret i32 14"), "{ir}");
}
