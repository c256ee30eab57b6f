use crate::grammar::ast::{
    Assign, BinaryOp, Block, Call, Decl, Dot, Expr, Program, Stmt, UnaryOp,
};
use crate::report::Reporter;
use crate::sema::symbol::{SymKind, Symbols};
use crate::sema::types::SemType;

/// Run the type-check pass over a name-analyzed program. Diagnostics are a
/// pure function of the linked AST: running this twice yields the same
/// messages in the same order.
pub fn check(program: &Program, syms: &Symbols, rep: &mut Reporter) {
    let mut pass = TypeCheck { syms, rep };
    for decl in &program.0 {
        if let Decl::Fn(f) = decl {
            let ret = SemType::of_spec(&f.ret);
            pass.block(&f.body, &ret);
        }
    }
}

struct TypeCheck<'a> {
    syms: &'a Symbols,
    rep: &'a mut Reporter,
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

impl<'a> TypeCheck<'a> {
    fn block(&mut self, block: &Block, ret: &SemType) {
        for stmt in &block.stmts {
            self.stmt(stmt, ret);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, ret: &SemType) {
        match stmt {
            Stmt::Assign(assign) => {
                self.assign(assign);
            }

            Stmt::PostInc(e) | Stmt::PostDec(e) => {
                let ty = self.expr(e);
                if !ty.is_error() && !ty.is_int() {
                    self.error(e, "Arithmetic operator applied to non-numeric operand");
                }
            }

            Stmt::Read(e) => {
                let ty = self.expr(e);
                if ty.is_fn() {
                    self.error(e, "Attempt to read a function");
                }
                if ty.is_struct_def() {
                    self.error(e, "Attempt to read a struct name");
                }
                if ty.is_struct() {
                    self.error(e, "Attempt to read a struct variable");
                }
            }

            Stmt::Write(e) => {
                let ty = self.expr(e);
                if ty.is_fn() {
                    self.error(e, "Attempt to write a function");
                }
                if ty.is_struct_def() {
                    self.error(e, "Attempt to write a struct name");
                }
                if ty.is_struct() {
                    self.error(e, "Attempt to write a struct variable");
                }
                if ty.is_void() {
                    self.error(e, "Attempt to write void");
                }
            }

            Stmt::If(cond, body) => {
                let ty = self.expr(cond);
                if !ty.is_error() && !ty.is_bool() {
                    self.error(cond, "Non-bool expression used as an if condition");
                }
                self.block(body, ret);
            }

            Stmt::IfElse(cond, then_body, else_body) => {
                let ty = self.expr(cond);
                if !ty.is_error() && !ty.is_bool() {
                    self.error(cond, "Non-bool expression used as an if condition");
                }
                self.block(then_body, ret);
                self.block(else_body, ret);
            }

            Stmt::While(cond, body) => {
                let ty = self.expr(cond);
                if !ty.is_error() && !ty.is_bool() {
                    self.error(cond, "Non-bool expression used as a while condition");
                }
                self.block(body, ret);
            }

            Stmt::Repeat(clause, body) => {
                let ty = self.expr(clause);
                if !ty.is_error() && !ty.is_int() {
                    self.error(clause, "Non-integer expression used as a repeat clause");
                }
                self.block(body, ret);
            }

            Stmt::Call(call) => {
                self.call(call);
            }

            Stmt::Return(_, Some(e)) => {
                let ty = self.expr(e);
                if ret.is_void() {
                    self.error(e, "Return with a value in a void function");
                } else if !ret.is_error() && !ty.is_error() && *ret != ty {
                    self.error(e, "Bad return value");
                }
            }

            Stmt::Return(_, None) => {
                if !ret.is_void() {
                    self.rep.error(0, 0, "Missing return value");
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl<'a> TypeCheck<'a> {
    fn error(&mut self, at: &Expr, text: &str) {
        let pos = at.pos();
        self.rep.error(pos.line, pos.col, text);
    }

    fn expr(&mut self, expr: &Expr) -> SemType {
        match expr {
            Expr::IntLit(..) => SemType::Int,
            Expr::StrLit(..) => SemType::Str,
            Expr::True(_) | Expr::False(_) => SemType::Bool,

            Expr::Ident(id) => match id.sym {
                Some(sym) => self.syms.type_of(sym),
                None => SemType::Error,
            },

            Expr::Dot(dot) => self.dot(dot),
            Expr::Assign(assign) => self.assign(assign),
            Expr::Call(call) => self.call(call),

            Expr::Unary(UnaryOp::Neg, operand) => {
                let ty = self.expr(operand);
                if ty.is_error() {
                    SemType::Error
                } else if !ty.is_int() {
                    self.error(operand, "Arithmetic operator applied to non-numeric operand");
                    SemType::Error
                } else {
                    SemType::Int
                }
            }

            Expr::Unary(UnaryOp::Not, operand) => {
                let ty = self.expr(operand);
                if ty.is_error() {
                    SemType::Error
                } else if !ty.is_bool() {
                    self.error(operand, "Logical operator applied to non-bool operand");
                    SemType::Error
                } else {
                    SemType::Bool
                }
            }

            Expr::Binary(op, lhs, rhs) => self.binary(expr, *op, lhs, rhs),
        }
    }

    /// The right field's type; `error` once the chain has gone bad.
    fn dot(&mut self, dot: &Dot) -> SemType {
        if dot.bad {
            return SemType::Error;
        }
        match dot.field.sym {
            Some(sym) => self.syms.type_of(sym),
            None => SemType::Error,
        }
    }

    fn assign(&mut self, assign: &Assign) -> SemType {
        let lhs = self.expr(&assign.lhs);
        let rhs = self.expr(&assign.rhs);
        let mut ret = lhs.clone();

        if lhs.is_fn() && rhs.is_fn() {
            self.error(&assign.lhs, "Function assignment");
            ret = SemType::Error;
        }
        if lhs.is_struct_def() && rhs.is_struct_def() {
            self.error(&assign.lhs, "Struct name assignment");
            ret = SemType::Error;
        }
        if lhs.is_struct() && rhs.is_struct() {
            self.error(&assign.lhs, "Struct variable assignment");
            ret = SemType::Error;
        }
        if lhs != rhs && !lhs.is_error() && !rhs.is_error() {
            self.error(&assign.lhs, "Type mismatch");
            ret = SemType::Error;
        }
        if lhs.is_error() || rhs.is_error() {
            ret = SemType::Error;
        }
        ret
    }

    fn call(&mut self, call: &Call) -> SemType {
        let callee = match call.callee.sym {
            Some(sym) => sym,
            None => return SemType::Error,
        };

        let fn_sym = match &self.syms.sym(callee).kind {
            SymKind::Fn(f) => f,
            _ => {
                let pos = call.callee.pos;
                self.rep
                    .error(pos.line, pos.col, "Attempt to call a non-function");
                return SemType::Error;
            }
        };
        let params = fn_sym.params.clone();
        let ret = fn_sym.ret.clone();

        if call.actuals.len() != params.len() {
            let pos = call.callee.pos;
            self.rep
                .error(pos.line, pos.col, "Function call with wrong number of args");
            return ret;
        }

        for (actual, formal) in call.actuals.iter().zip(&params) {
            let ty = self.expr(actual);
            if !ty.is_error() && *formal != ty {
                self.error(actual, "Type of actual does not match type of formal");
            }
        }
        ret
    }

    fn binary(&mut self, whole: &Expr, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> SemType {
        let t1 = self.expr(lhs);
        let t2 = self.expr(rhs);

        match op {
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide => {
                let mut ret = SemType::Int;
                if !t1.is_error() && !t1.is_int() {
                    self.error(lhs, "Arithmetic operator applied to non-numeric operand");
                    ret = SemType::Error;
                }
                if !t2.is_error() && !t2.is_int() {
                    self.error(rhs, "Arithmetic operator applied to non-numeric operand");
                    ret = SemType::Error;
                }
                if t1.is_error() || t2.is_error() {
                    ret = SemType::Error;
                }
                ret
            }

            BinaryOp::And | BinaryOp::Or => {
                let mut ret = SemType::Bool;
                if !t1.is_error() && !t1.is_bool() {
                    self.error(lhs, "Logical operator applied to non-bool operand");
                    ret = SemType::Error;
                }
                if !t2.is_error() && !t2.is_bool() {
                    self.error(rhs, "Logical operator applied to non-bool operand");
                    ret = SemType::Error;
                }
                if t1.is_error() || t2.is_error() {
                    ret = SemType::Error;
                }
                ret
            }

            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => {
                let mut ret = SemType::Bool;
                if !t1.is_error() && !t1.is_int() {
                    self.error(lhs, "Relational operator applied to non-numeric operand");
                    ret = SemType::Error;
                }
                if !t2.is_error() && !t2.is_int() {
                    self.error(rhs, "Relational operator applied to non-numeric operand");
                    ret = SemType::Error;
                }
                if t1.is_error() || t2.is_error() {
                    ret = SemType::Error;
                }
                ret
            }

            BinaryOp::Eq | BinaryOp::Ne => {
                let mut ret = SemType::Bool;
                if t1.is_void() && t2.is_void() {
                    self.error(whole, "Equality operator applied to void functions");
                    ret = SemType::Error;
                }
                if t1.is_fn() && t2.is_fn() {
                    self.error(whole, "Equality operator applied to functions");
                    ret = SemType::Error;
                }
                if t1.is_struct_def() && t2.is_struct_def() {
                    self.error(whole, "Equality operator applied to struct names");
                    ret = SemType::Error;
                }
                if t1.is_struct() && t2.is_struct() {
                    self.error(whole, "Equality operator applied to struct variables");
                    ret = SemType::Error;
                }
                if t1 != t2 && !t1.is_error() && !t2.is_error() {
                    self.error(whole, "Type mismatch");
                    ret = SemType::Error;
                }
                if t1.is_error() || t2.is_error() {
                    ret = SemType::Error;
                }
                ret
            }
        }
    }
}
