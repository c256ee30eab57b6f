use crate::grammar::ast::{BinaryOp, Expr, UnaryOp};
use crate::sema::symbol::Symbols;
use crate::sema::types::SemType;

/// Static type of an expression in a fully linked, well-typed AST. Reports
/// nothing; the emitter uses this to pick syscall codes and store masks.
pub fn type_of(expr: &Expr, syms: &Symbols) -> SemType {
    match expr {
        Expr::IntLit(..) => SemType::Int,
        Expr::StrLit(..) => SemType::Str,
        Expr::True(_) | Expr::False(_) => SemType::Bool,

        Expr::Ident(id) => match id.sym {
            Some(sym) => syms.type_of(sym),
            None => SemType::Error,
        },

        Expr::Dot(dot) => match dot.field.sym {
            Some(sym) if !dot.bad => syms.type_of(sym),
            _ => SemType::Error,
        },

        Expr::Assign(assign) => type_of(&assign.lhs, syms),

        Expr::Call(call) => match call.callee.sym {
            Some(sym) => match &syms.type_of(sym) {
                SemType::Fn { ret, .. } => (**ret).clone(),
                _ => SemType::Error,
            },
            None => SemType::Error,
        },

        Expr::Unary(UnaryOp::Neg, _) => SemType::Int,
        Expr::Unary(UnaryOp::Not, _) => SemType::Bool,

        Expr::Binary(op, ..) => match op {
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide => SemType::Int,
            _ => SemType::Bool,
        },
    }
}
