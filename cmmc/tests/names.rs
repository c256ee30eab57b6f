use cmmc::grammar::ast::Decl;
use cmmc::report::MsgKind;
use cmmc::sema::symbol::{Offset, SymKind};

fn errors(code: &str) -> Vec<(usize, usize, String)> {
    let (_, _, rep) = cmmc::analyze("test.cmm", code).unwrap();
    rep.msgs()
        .iter()
        .filter(|m| m.kind == MsgKind::Error)
        .map(|m| (m.line, m.col, m.text.clone()))
        .collect()
}

#[test]
fn test_multiply_declared() {
    let errs = errors("int main() { int x; bool x; return 0; }");
    assert_eq!(errs, vec![(1, 26, "Multiply declared identifier".to_string())]);
}

#[test]
fn test_multiply_declared_formal() {
    let errs = errors("int f(int a, bool a) { return 0; } int main() { return 0; }");
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].2, "Multiply declared identifier");
}

#[test]
fn test_shadowing_is_legal() {
    let errs = errors("int x; int main() { int x; x = 1; return 0; }");
    assert!(errs.is_empty());
}

#[test]
fn test_undeclared() {
    let errs = errors("int main() { x = 1; return 0; }");
    assert_eq!(errs, vec![(1, 14, "Undeclared identifier".to_string())]);
}

#[test]
fn test_non_function_declared_void() {
    let errs = errors("void x; int main() { return 0; }");
    assert_eq!(errs, vec![(1, 6, "Non-function declared void".to_string())]);
}

#[test]
fn test_invalid_struct_type() {
    let errs = errors("struct Q q; int main() { return 0; }");
    assert_eq!(errs, vec![(1, 8, "Invalid name of struct type".to_string())]);
}

#[test]
fn test_invalid_struct_field() {
    let errs =
        errors("struct P { int x; }; int main() { struct P p; p.y = 3; return 0; }");
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].2, "Invalid struct field name");
    assert_eq!(errs[0].1, 49); // at y
}

#[test]
fn test_dot_access_of_non_struct() {
    let errs = errors("int main() { int x; x.y = 1; return 0; }");
    assert_eq!(errs, vec![(1, 21, "Dot-access of non-struct type".to_string())]);
}

#[test]
fn test_chained_dot_access() {
    let errs = errors(
        "struct Q { int n; };
         struct P { struct Q q; };
         int main() { struct P p; p.q.n = 1; return 0; }",
    );
    assert!(errs.is_empty());
}

#[test]
fn test_recursive_struct_rejected() {
    let errs = errors("struct S { struct S next; }; int main() { return 0; }");
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].2, "Invalid name of struct type");
}

#[test]
fn test_no_main() {
    let errs = errors("int f() { return 1; }");
    assert_eq!(errs, vec![(0, 0, "No main function".to_string())]);
}

#[test]
fn test_frame_offsets() {
    let (program, syms, rep) = cmmc::analyze(
        "test.cmm",
        "int g; int f(int a, bool b) { int x; int y; return a; } int main() { return 0; }",
    )
    .unwrap();
    assert!(!rep.has_error());

    let Decl::Var(g) = &program.0[0] else {
        panic!("expected var decl");
    };
    assert_eq!(syms.offset_of(g.name.sym.unwrap()), Offset::Global);

    let Decl::Fn(f) = &program.0[1] else {
        panic!("expected fn decl");
    };
    assert_eq!(
        syms.offset_of(f.formals[0].name.sym.unwrap()),
        Offset::Frame(4)
    );
    assert_eq!(
        syms.offset_of(f.formals[1].name.sym.unwrap()),
        Offset::Frame(8)
    );
    assert_eq!(
        syms.offset_of(f.body.decls[0].name.sym.unwrap()),
        Offset::Frame(-8)
    );
    assert_eq!(
        syms.offset_of(f.body.decls[1].name.sym.unwrap()),
        Offset::Frame(-12)
    );

    match &syms.sym(f.name.sym.unwrap()).kind {
        SymKind::Fn(fn_sym) => {
            assert_eq!(fn_sym.size_params, 8);
            assert_eq!(fn_sym.size_locals, 8);
        }
        other => panic!("expected fn symbol, got {other:?}"),
    }
}

#[test]
fn test_if_else_frame_is_max_of_arms() {
    let (program, syms, rep) = cmmc::analyze(
        "test.cmm",
        "int f(bool c) { int x; if (c) { int a; int b; } else { int d; } return 0; }
         int main() { return 0; }",
    )
    .unwrap();
    assert!(!rep.has_error());

    let Decl::Fn(f) = &program.0[0] else {
        panic!("expected fn decl");
    };
    match &syms.sym(f.name.sym.unwrap()).kind {
        // x at -8, then the wider arm allocates -12 and -16
        SymKind::Fn(fn_sym) => assert_eq!(fn_sym.size_locals, 12),
        other => panic!("expected fn symbol, got {other:?}"),
    }
}

#[test]
fn test_arm_slots_overlap() {
    let (program, syms, rep) = cmmc::analyze(
        "test.cmm",
        "int f(bool c) { if (c) { int a; a = 1; } else { int d; d = 2; } return 0; }
         int main() { return 0; }",
    )
    .unwrap();
    assert!(!rep.has_error());

    let Decl::Fn(f) = &program.0[0] else {
        panic!("expected fn decl");
    };
    let Some(cmmc::grammar::ast::Stmt::IfElse(_, then_body, else_body)) = f.body.stmts.first()
    else {
        panic!("expected if/else");
    };
    // both arms start from the same cursor
    assert_eq!(
        syms.offset_of(then_body.decls[0].name.sym.unwrap()),
        Offset::Frame(-8)
    );
    assert_eq!(
        syms.offset_of(else_body.decls[0].name.sym.unwrap()),
        Offset::Frame(-8)
    );
}

#[test]
fn test_duplicate_function_body_still_analyzed() {
    let errs = errors("int f() { return 0; } bool f() { return y; } int main() { return 0; }");
    assert_eq!(errs.len(), 2);
    assert_eq!(errs[0].2, "Multiply declared identifier");
    assert_eq!(errs[1].2, "Undeclared identifier");
}
