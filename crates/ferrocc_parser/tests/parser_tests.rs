use ferrocc_ast::{visit, NodeKind, Payload};
use ferrocc_syntax::profile;

fn parse_source(source: &str) -> (ferrocc_ast::Ast, Vec<ferrocc_parser::ParseError>) {
    let syntax = profile::gnu_c11();
    let (tokens, lex_errors) = ferrocc_lexer::lex(source, 0, &syntax);
    assert!(lex_errors.is_empty(), "unexpected lex errors: {lex_errors:?}");
    ferrocc_parser::parse(&tokens)
}

#[test]
fn parses_simple_function_with_no_errors() {
    let (ast, errors) = parse_source("int add(int a, int b) { return a + b; }");
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    let functions = visit::collect_kind(&ast.arena, ast.root, NodeKind::FunctionDecl);
    assert_eq!(functions.len(), 1);
    let name = match &ast.get(functions[0]).payload {
        Payload::Decl { name, .. } => name.clone(),
        other => panic!("expected Decl payload, got {other:?}"),
    };
    assert_eq!(name, "add");
}

#[test]
fn typedef_disambiguates_redeclaration_as_type_name() {
    let (ast, errors) = parse_source(
        "typedef struct Point { int x; int y; } Point;\nPoint origin;\n",
    );
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    let vars = visit::collect_kind(&ast.arena, ast.root, NodeKind::VarDecl);
    assert_eq!(vars.len(), 1);
}

#[test]
fn identifier_shadowing_typedef_name_parses_as_ordinary_variable() {
    // `Point` is a typedef name in scope, but appearing after `return` it
    // can only be the start of an expression, so `Point * 2` must parse as
    // a multiplication rather than ever being considered for declarator
    // disambiguation.
    let (ast, errors) = parse_source(
        "typedef int Point;\nint f(int Point) { return Point * 2; }\n",
    );
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    let functions = visit::collect_kind(&ast.arena, ast.root, NodeKind::FunctionDecl);
    assert_eq!(functions.len(), 1);
    let body = ast.get(functions[0]).children.last().copied().unwrap();
    let returns = visit::collect_kind(&ast.arena, body, NodeKind::ReturnStmt);
    assert_eq!(returns.len(), 1);
    let expr = ast.get(returns[0]).children[0];
    assert_eq!(ast.get(expr).kind, NodeKind::MulExpr);
}

#[test]
fn declarator_menagerie_parses_without_errors() {
    let (_, errors) = parse_source(
        r#"
        int plain;
        int *ptr;
        int arr[10];
        int *ptr_arr[4];
        int (*arr_ptr)[4];
        int (*fn_ptr)(int, int);
        int (*fn_ptr_arr[3])(void);
        const char *name;
        struct Point { int x, y; } origin;
        "#,
    );
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
}

#[test]
fn function_pointer_returning_array_pointer_parses() {
    let (ast, errors) = parse_source("int (*f(void))[3];");
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    let protos = visit::collect_kind(&ast.arena, ast.root, NodeKind::FunctionProto);
    assert_eq!(protos.len(), 1);
}

#[test]
fn malformed_declaration_recovers_and_keeps_parsing_later_functions() {
    let (ast, errors) = parse_source(
        "int broken( ;\nint ok(void) { return 1; }\n",
    );
    assert!(!errors.is_empty(), "expected at least one recovered error");
    let functions = visit::collect_kind(&ast.arena, ast.root, NodeKind::FunctionDecl);
    assert!(
        functions.iter().any(|&f| matches!(
            &ast.get(f).payload,
            Payload::Decl { name, .. } if name == "ok"
        )),
        "parser should have recovered far enough to see `ok`"
    );
}

#[test]
fn short_circuit_and_ternary_parse_with_correct_shape() {
    let (ast, errors) = parse_source("int f(int a, int b) { return a && b ? a : b; }");
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    let conds = visit::collect_kind(&ast.arena, ast.root, NodeKind::ConditionalExpr);
    assert_eq!(conds.len(), 1);
    let cond_expr = ast.get(conds[0]).children[0];
    assert_eq!(ast.get(cond_expr).kind, NodeKind::LogicalAndExpr);
}

#[test]
fn gnu_statement_expression_parses() {
    let (_, errors) = parse_source("int f(void) { return ({ int x = 1; x + 1; }); }");
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
}

#[test]
fn comma_separated_top_level_declarators_are_all_reachable() {
    let (ast, errors) = parse_source("int a, b, *c;\ntypedef int x_t, y_t;\n");
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    let vars = visit::collect_kind(&ast.arena, ast.root, NodeKind::VarDecl);
    assert_eq!(vars.len(), 3, "a, b, and c should all be reachable from the root");
    let typedefs = visit::collect_kind(&ast.arena, ast.root, NodeKind::TypedefDecl);
    assert_eq!(typedefs.len(), 2, "x_t and y_t should both be reachable from the root");
    assert!(ast.arena.get(ast.root).children.len() >= 2);
}

#[test]
fn struct_and_enum_bodies_are_reachable_from_the_type_node() {
    let (ast, errors) = parse_source(
        r#"
        struct Point { int x; int y; };
        enum Color { RED, GREEN, BLUE };
        "#,
    );
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    let structs = visit::collect_kind(&ast.arena, ast.root, NodeKind::StructType);
    assert_eq!(structs.len(), 1);
    assert_eq!(ast.get(structs[0]).children.len(), 2, "Point should carry x and y as children");

    let enums = visit::collect_kind(&ast.arena, ast.root, NodeKind::EnumType);
    assert_eq!(enums.len(), 1);
    assert_eq!(ast.get(enums[0]).children.len(), 3, "Color should carry RED, GREEN, BLUE as children");
}

#[test]
fn scope_push_pop_restores_depth_across_nested_blocks() {
    let (_, errors) = parse_source(
        r#"
        void f(void) {
            typedef int local_t;
            {
                local_t x;
                typedef int deeper_t;
                deeper_t y;
            }
            local_t z;
        }
        "#,
    );
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
}

/// spec.md §4.E.3: `size_t` must be recognized as a type name from the
/// seeded built-in set, with no preceding `typedef` in the unit.
#[test]
fn seeded_builtin_type_name_parses_as_declaration_without_a_prior_typedef() {
    let (ast, errors) = parse_source("void f(void) { size_t n; }");
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    let vars = visit::collect_kind(&ast.arena, ast.root, NodeKind::VarDecl);
    assert_eq!(vars.len(), 1, "size_t n; should parse as a declaration, not an expression statement");
}

/// spec.md §4.E.3(d): any identifier beginning `__builtin_` is accepted as
/// a type name even though it was never seeded or `typedef`'d.
#[test]
fn builtin_prefixed_identifier_parses_as_declaration() {
    let (ast, errors) = parse_source("void f(void) { __builtin_ms_va_list n; }");
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    let vars = visit::collect_kind(&ast.arena, ast.root, NodeKind::VarDecl);
    assert_eq!(vars.len(), 1);
}
