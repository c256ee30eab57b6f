use cmmc::report::{MsgKind, Reporter};
use cmmc::sema::check;

fn errors(code: &str) -> Vec<(usize, usize, String)> {
    let (_, _, rep) = cmmc::analyze("test.cmm", code).unwrap();
    rep.msgs()
        .iter()
        .filter(|m| m.kind == MsgKind::Error)
        .map(|m| (m.line, m.col, m.text.clone()))
        .collect()
}

fn texts(code: &str) -> Vec<String> {
    errors(code).into_iter().map(|(_, _, text)| text).collect()
}

#[test]
fn test_void_call_assignment_mismatch() {
    let errs = errors("void f() {} int main() { int x; x = f(); return 0; }");
    assert_eq!(errs, vec![(1, 33, "Type mismatch".to_string())]);
}

#[test]
fn test_non_bool_if_condition() {
    let errs = errors("int main() { int x; if (x) { x++; } return 0; }");
    assert_eq!(
        errs,
        vec![(1, 25, "Non-bool expression used as an if condition".to_string())]
    );
}

#[test]
fn test_wrong_number_of_args() {
    let errs = errors("int g(int a, bool b) { return a; } int main() { g(1); return 0; }");
    assert_eq!(
        errs,
        vec![(1, 49, "Function call with wrong number of args".to_string())]
    );
}

#[test]
fn test_arithmetic_operand() {
    assert_eq!(
        texts("int main() { int x; x = true + 3; return 0; }"),
        vec!["Arithmetic operator applied to non-numeric operand"]
    );
    assert_eq!(
        texts("int main() { int x; x = -true; return 0; }"),
        vec!["Arithmetic operator applied to non-numeric operand"]
    );
    assert_eq!(
        texts("int main() { bool b; b++; return 0; }"),
        vec!["Arithmetic operator applied to non-numeric operand"]
    );
}

#[test]
fn test_logical_operand() {
    assert_eq!(
        texts("int main() { bool b; b = 1 && true; return 0; }"),
        vec!["Logical operator applied to non-bool operand"]
    );
    assert_eq!(
        texts("int main() { bool b; b = !3; return 0; }"),
        vec!["Logical operator applied to non-bool operand"]
    );
}

#[test]
fn test_relational_operand() {
    assert_eq!(
        texts("int main() { if (true < 3) { } return 0; }"),
        vec!["Relational operator applied to non-numeric operand"]
    );
}

#[test]
fn test_equality_kinds() {
    assert_eq!(
        texts("void f() {} int main() { if (f() == f()) { } return 0; }"),
        vec!["Equality operator applied to void functions"]
    );
    assert_eq!(
        texts("int f() { return 1; } int main() { if (f == f) { } return 0; }"),
        vec!["Equality operator applied to functions"]
    );
    assert_eq!(
        texts("struct P { int x; }; int main() { if (P == P) { } return 0; }"),
        vec!["Equality operator applied to struct names"]
    );
    assert_eq!(
        texts(
            "struct P { int x; };
             int main() { struct P p; struct P q; if (p == q) { } return 0; }"
        ),
        vec!["Equality operator applied to struct variables"]
    );
    assert_eq!(
        texts("int main() { if (1 == true) { } return 0; }"),
        vec!["Type mismatch"]
    );
}

#[test]
fn test_assignment_kinds() {
    assert_eq!(
        texts("int f() { return 1; } int g() { return 2; } int main() { f = g; return 0; }"),
        vec!["Function assignment"]
    );
    assert_eq!(
        texts("struct P { int x; }; struct Q { int x; }; int main() { P = Q; return 0; }"),
        vec!["Struct name assignment", "Type mismatch"]
    );
    assert_eq!(
        texts(
            "struct P { int x; };
             int main() { struct P p; struct P q; p = q; return 0; }"
        ),
        vec!["Struct variable assignment"]
    );
}

#[test]
fn test_call_checks() {
    assert_eq!(
        texts("int main() { int x; x(); return 0; }"),
        vec!["Attempt to call a non-function"]
    );
    assert_eq!(
        texts("int g(int a) { return a; } int main() { g(true); return 0; }"),
        vec!["Type of actual does not match type of formal"]
    );
}

#[test]
fn test_read_write_checks() {
    assert_eq!(
        texts("int main() { cin >> main; return 0; }"),
        vec!["Attempt to read a function"]
    );
    assert_eq!(
        texts("struct P { int x; }; int main() { cin >> P; return 0; }"),
        vec!["Attempt to read a struct name"]
    );
    assert_eq!(
        texts("struct P { int x; }; int main() { struct P p; cin >> p; return 0; }"),
        vec!["Attempt to read a struct variable"]
    );
    assert_eq!(
        texts("int main() { cout << main; return 0; }"),
        vec!["Attempt to write a function"]
    );
    assert_eq!(
        texts("void f() {} int main() { cout << f(); return 0; }"),
        vec!["Attempt to write void"]
    );
}

#[test]
fn test_condition_checks() {
    assert_eq!(
        texts("int main() { while (1) { } return 0; }"),
        vec!["Non-bool expression used as a while condition"]
    );
    assert_eq!(
        texts("int main() { repeat (true) { } return 0; }"),
        vec!["Non-integer expression used as a repeat clause"]
    );
}

#[test]
fn test_return_checks() {
    assert_eq!(
        texts("void f() { return 3; } int main() { return 0; }"),
        vec!["Return with a value in a void function"]
    );
    assert_eq!(
        texts("int f() { return true; } int main() { return 0; }"),
        vec!["Bad return value"]
    );

    let errs = errors("int f() { return; } int main() { return 0; }");
    assert_eq!(errs, vec![(0, 0, "Missing return value".to_string())]);
}

#[test]
fn test_error_type_suppresses_cascades() {
    // the undeclared identifier is the only diagnostic: its error type is
    // swallowed by the enclosing operator and assignment
    let errs = errors("int main() { int x; x = y + 3; return 0; }");
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].2, "Undeclared identifier");
}

#[test]
fn test_check_is_idempotent() {
    let (program, syms, _) = cmmc::analyze(
        "test.cmm",
        "int main() { int x; if (x) { x = true + 1; } while (3) { cout << main; } return false; }",
    )
    .unwrap();

    let mut first = Reporter::new("test.cmm");
    check::check(&program, &syms, &mut first);
    let mut second = Reporter::new("test.cmm");
    check::check(&program, &syms, &mut second);

    assert!(first.has_error());
    assert_eq!(first.msgs(), second.msgs());
}
