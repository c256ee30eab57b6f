use crate::grammar::ast::{
    Assign, BinaryOp, Block, Call, Decl, Expr, FnDecl, Ident, Program, Stmt, UnaryOp,
};
use crate::sema::symbol::{FnSym, Offset, SymKind, Symbols};
use crate::sema::types::SemType;
use crate::sema::typing::type_of;

use indexmap::IndexMap;
use itertools::chain;
use mips::inst::{Inst, Loc};
use mips::line::{render, Line};
use mips::reg::Reg;

pub const TRUE: i32 = 1;
pub const FALSE: i32 = 0;

/// Emit the whole program as one assembly text. Assumes a fully linked,
/// well-typed AST; the label counter and string pool are scoped to this call.
pub fn generate(program: &Program, syms: &Symbols) -> String {
    let mut gen = CodeGen {
        syms,
        lines: Vec::new(),
        labels: 0,
        strings: IndexMap::new(),
    };
    gen.program(program);
    render(&gen.lines)
}

struct CodeGen<'a> {
    syms: &'a Symbols,
    lines: Vec<Line>,
    labels: usize,
    strings: IndexMap<String, String>, // verbatim lexeme -> label
}

/// push: store at the stack top, then grow downward
fn push(reg: Reg) -> Vec<Line> {
    vec![
        Line::Inst(Inst::SW(reg, Loc::Indexed(0, Reg::Sp))),
        Line::Inst(Inst::SUBU(Reg::Sp, Reg::Sp, 4)),
    ]
}

/// pop: mirror of push
fn pop(reg: Reg) -> Vec<Line> {
    vec![
        Line::Inst(Inst::LW(reg, Loc::Indexed(4, Reg::Sp))),
        Line::Inst(Inst::ADDU(Reg::Sp, Reg::Sp, 4)),
    ]
}

// ----------------------------------------------------------------------------
// Declarations
// ----------------------------------------------------------------------------

impl<'a> CodeGen<'a> {
    fn next_label(&mut self) -> String {
        let label = format!(".L{}", self.labels);
        self.labels += 1;
        label
    }

    fn fn_sym(&self, id: &Ident) -> &FnSym {
        match id.sym.map(|sym| &self.syms.sym(sym).kind) {
            Some(SymKind::Fn(f)) => f,
            _ => unreachable!("function identifier without a function symbol"),
        }
    }

    fn program(&mut self, program: &Program) {
        for decl in &program.0 {
            match decl {
                Decl::Var(v) => {
                    self.lines.push(Line::Data);
                    self.lines.push(Line::Word(format!("_{}", v.name.name)));
                }
                Decl::Fn(f) => self.function(f),
                Decl::Struct(_) => {}
            }
        }
    }

    fn function(&mut self, f: &FnDecl) {
        let name = f.name.name.as_str();
        let is_main = name == "main";
        let end_label = if is_main {
            "_main_Exit".to_string()
        } else {
            self.next_label()
        };
        let size_locals = self.fn_sym(&f.name).size_locals;

        self.lines.push(Line::Text);
        if is_main {
            self.lines.push(Line::Globl("main".to_string()));
            self.lines.push(Line::Label("main".to_string()));
            self.lines.push(Line::Label("_start".to_string()));
        } else {
            self.lines.push(Line::Label(format!("_{name}")));
        }

        // prologue: save $ra and the control link, set $fp, room for locals
        let prologue = chain!(
            push(Reg::Ra),
            push(Reg::Fp),
            [Line::Inst(Inst::ADDU(Reg::Fp, Reg::Sp, 8))],
        )
        .collect::<Vec<_>>();
        self.lines.extend(prologue);
        if size_locals > 0 {
            self.lines
                .push(Line::Inst(Inst::SUBU(Reg::Sp, Reg::Sp, size_locals)));
        }

        for stmt in &f.body.stmts {
            let lines = self.stmt(stmt, &end_label);
            self.lines.extend(lines);
        }

        // epilogue
        self.lines.push(Line::Label(end_label));
        self.lines
            .push(Line::Inst(Inst::LW(Reg::Ra, Loc::Indexed(0, Reg::Fp))));
        self.lines.push(Line::Inst(Inst::MOVE(Reg::T0, Reg::Fp)));
        self.lines
            .push(Line::Inst(Inst::LW(Reg::Fp, Loc::Indexed(-4, Reg::Fp))));
        self.lines.push(Line::Inst(Inst::MOVE(Reg::Sp, Reg::T0)));
        if is_main {
            self.lines.push(Line::Inst(Inst::LI(Reg::V0, 10)));
            self.lines.push(Line::Inst(Inst::SYSCALL));
        } else {
            self.lines.push(Line::Inst(Inst::JR(Reg::Ra)));
        }
    }
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

impl<'a> CodeGen<'a> {
    fn body(&mut self, block: &Block, end_label: &str) -> Vec<Line> {
        let mut lines = Vec::new();
        for stmt in &block.stmts {
            lines.extend(self.stmt(stmt, end_label));
        }
        lines
    }

    fn stmt(&mut self, stmt: &Stmt, end_label: &str) -> Vec<Line> {
        match stmt {
            Stmt::Assign(assign) => {
                chain!([Line::Comment("ASSIGN".into())], self.assign(assign)).collect()
            }

            Stmt::PostInc(target) => self.step(target, true),
            Stmt::PostDec(target) => self.step(target, false),

            Stmt::Read(target) => self.read(target),

            Stmt::Write(e) => {
                let code = match type_of(e, self.syms) {
                    SemType::Str => 4,
                    _ => 1,
                };
                chain!(
                    [Line::Comment("WRITE".into())],
                    self.expr_push(e),
                    pop(Reg::A0),
                    [Line::Inst(Inst::LI(Reg::V0, code)), Line::Inst(Inst::SYSCALL)],
                )
                .collect()
            }

            Stmt::If(cond, body) => {
                let true_label = self.next_label();
                let done_label = self.next_label();
                chain!(
                    self.jump(cond, &true_label, &done_label),
                    [Line::Label(true_label)],
                    self.body(body, end_label),
                    [Line::Label(done_label)],
                )
                .collect()
            }

            Stmt::IfElse(cond, then_body, else_body) => {
                let true_label = self.next_label();
                let false_label = self.next_label();
                let done_label = self.next_label();
                chain!(
                    self.jump(cond, &true_label, &false_label),
                    [Line::Label(true_label)],
                    self.body(then_body, end_label),
                    [Line::Inst(Inst::B(done_label.clone()))],
                    [Line::Label(false_label)],
                    self.body(else_body, end_label),
                    [Line::Label(done_label)],
                )
                .collect()
            }

            Stmt::While(cond, body) => {
                let cond_label = self.next_label();
                let body_label = self.next_label();
                let done_label = self.next_label();
                chain!(
                    [Line::Label(cond_label.clone())],
                    self.jump(cond, &body_label, &done_label),
                    [Line::Label(body_label)],
                    self.body(body, end_label),
                    [Line::Inst(Inst::B(cond_label))],
                    [Line::Label(done_label)],
                )
                .collect()
            }

            // not code-generated
            Stmt::Repeat(..) => Vec::new(),

            Stmt::Call(call) => {
                let ret = self.fn_sym(&call.callee).ret.clone();
                let cleanup = if ret.is_void() { Vec::new() } else { pop(Reg::V0) };
                chain!(self.call(call), cleanup).collect()
            }

            Stmt::Return(_, Some(e)) => chain!(
                self.expr_push(e),
                pop(Reg::V0),
                [Line::Inst(Inst::B(end_label.to_string()))],
            )
            .collect(),

            Stmt::Return(_, None) => vec![Line::Inst(Inst::B(end_label.to_string()))],
        }
    }

    /// loc++ / loc-- : address below the value on the stack, store back the
    /// adjusted value.
    fn step(&mut self, target: &Expr, up: bool) -> Vec<Line> {
        let Expr::Ident(id) = target else {
            // field targets carry no offsets
            return Vec::new();
        };
        let comment = if up { "POST INC" } else { "POST DEC" };
        let delta = if up {
            Inst::ADDI(Reg::T0, Reg::T0, 1)
        } else {
            Inst::SUBI(Reg::T0, Reg::T0, 1)
        };
        chain!(
            [Line::Comment(comment.into())],
            self.addr_push(id),
            self.expr_push(target),
            pop(Reg::T0),
            pop(Reg::T1),
            [
                Line::Inst(delta),
                Line::Inst(Inst::SW(Reg::T0, Loc::Indexed(0, Reg::T1))),
            ],
        )
        .collect()
    }

    /// cin >> loc : syscall 5, store $v0 at the target address; bools store
    /// the sne mask instead.
    fn read(&mut self, target: &Expr) -> Vec<Line> {
        let Expr::Ident(id) = target else {
            // field targets carry no offsets
            return Vec::new();
        };
        let store = if type_of(target, self.syms).is_bool() {
            vec![
                Line::Inst(Inst::SNE(Reg::T1, Reg::V0, Reg::Zero)),
                Line::Inst(Inst::SW(Reg::T1, Loc::Indexed(0, Reg::T0))),
            ]
        } else {
            vec![Line::Inst(Inst::SW(Reg::V0, Loc::Indexed(0, Reg::T0)))]
        };
        chain!(
            [
                Line::Comment("READ".into()),
                Line::Inst(Inst::LI(Reg::V0, 5)),
                Line::Inst(Inst::SYSCALL),
            ],
            self.addr_push(id),
            pop(Reg::T0),
            store,
        )
        .collect()
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl<'a> CodeGen<'a> {
    /// Value of `expr` ends in $t0.
    fn expr(&mut self, expr: &Expr) -> Vec<Line> {
        match expr {
            Expr::IntLit(_, val) => vec![Line::Inst(Inst::LI(Reg::T0, *val))],
            Expr::True(_) => vec![Line::Inst(Inst::LI(Reg::T0, TRUE))],
            Expr::False(_) => vec![Line::Inst(Inst::LI(Reg::T0, FALSE))],
            Expr::StrLit(_, lexeme) => self.string(lexeme),

            Expr::Ident(id) => vec![Line::Inst(self.load(id, false))],

            // field offsets are never assigned; struct reads are rejected
            // upstream
            Expr::Dot(_) => Vec::new(),

            Expr::Assign(assign) => self.assign(assign),

            Expr::Call(call) => chain!(self.call(call), pop(Reg::T0)).collect(),

            Expr::Unary(UnaryOp::Neg, operand) => chain!(
                self.expr_push(operand),
                pop(Reg::T0),
                [
                    Line::Inst(Inst::LI(Reg::T1, -1)),
                    Line::Inst(Inst::MULT(Reg::T0, Reg::T1)),
                    Line::Inst(Inst::MFLO(Reg::T0)),
                ],
            )
            .collect(),

            Expr::Unary(UnaryOp::Not, operand) => chain!(
                self.expr_push(operand),
                pop(Reg::T0),
                [Line::Inst(Inst::SEQI(Reg::T0, Reg::T0, FALSE))],
            )
            .collect(),

            Expr::Binary(BinaryOp::And, lhs, rhs) => {
                let right_label = self.next_label();
                let end_label = self.next_label();
                chain!(
                    self.jump(lhs, &right_label, &end_label),
                    [Line::Label(right_label)],
                    self.expr(rhs),
                    [Line::Label(end_label)],
                )
                .collect()
            }

            Expr::Binary(BinaryOp::Or, lhs, rhs) => {
                let right_label = self.next_label();
                let end_label = self.next_label();
                chain!(
                    self.jump(lhs, &end_label, &right_label),
                    [Line::Label(right_label)],
                    self.expr(rhs),
                    [Line::Label(end_label)],
                )
                .collect()
            }

            Expr::Binary(op, lhs, rhs) => {
                let op_lines = match op {
                    BinaryOp::Plus => vec![Line::Inst(Inst::ADD(Reg::T0, Reg::T0, Reg::T1))],
                    BinaryOp::Minus => vec![Line::Inst(Inst::SUB(Reg::T0, Reg::T0, Reg::T1))],
                    BinaryOp::Times => vec![
                        Line::Inst(Inst::MULT(Reg::T0, Reg::T1)),
                        Line::Inst(Inst::MFLO(Reg::T0)),
                    ],
                    BinaryOp::Divide => vec![
                        Line::Inst(Inst::DIV(Reg::T0, Reg::T1)),
                        Line::Inst(Inst::MFLO(Reg::T0)),
                    ],
                    BinaryOp::Eq => vec![Line::Inst(Inst::SEQ(Reg::T0, Reg::T0, Reg::T1))],
                    BinaryOp::Ne => vec![Line::Inst(Inst::SNE(Reg::T0, Reg::T0, Reg::T1))],
                    BinaryOp::Lt => vec![Line::Inst(Inst::SLT(Reg::T0, Reg::T0, Reg::T1))],
                    BinaryOp::Gt => vec![Line::Inst(Inst::SGT(Reg::T0, Reg::T0, Reg::T1))],
                    BinaryOp::Le => vec![Line::Inst(Inst::SLE(Reg::T0, Reg::T0, Reg::T1))],
                    BinaryOp::Ge => vec![Line::Inst(Inst::SGE(Reg::T0, Reg::T0, Reg::T1))],
                    BinaryOp::And | BinaryOp::Or => unreachable!(),
                };
                // right operand pushed last, popped first
                chain!(
                    self.expr_push(lhs),
                    self.expr_push(rhs),
                    pop(Reg::T1),
                    pop(Reg::T0),
                    op_lines,
                )
                .collect()
            }
        }
    }

    /// Value of `expr` pushed onto the stack. Calls push their own result.
    fn expr_push(&mut self, expr: &Expr) -> Vec<Line> {
        match expr {
            Expr::Call(call) => self.call(call),
            _ => chain!(self.expr(expr), push(Reg::T0)).collect(),
        }
    }

    fn load(&self, id: &Ident, addr: bool) -> Inst {
        let loc = match id.sym.map(|sym| self.syms.offset_of(sym)) {
            Some(Offset::Frame(off)) => Loc::Indexed(off, Reg::Fp),
            _ => Loc::Symbol(format!("_{}", id.name)),
        };
        if addr {
            Inst::LA(Reg::T0, loc)
        } else {
            Inst::LW(Reg::T0, loc)
        }
    }

    /// l-value address of an identifier in $t0, pushed.
    fn addr_push(&mut self, id: &Ident) -> Vec<Line> {
        chain!([Line::Inst(self.load(id, true))], push(Reg::T0)).collect()
    }

    /// `lhs = rhs` as a value: the stored value ends in $t0.
    fn assign(&mut self, assign: &Assign) -> Vec<Line> {
        let rhs = self.expr_push(&assign.rhs);
        let Expr::Ident(id) = &assign.lhs else {
            // field targets carry no offsets; keep the stack balanced
            return chain!(rhs, pop(Reg::T0)).collect();
        };
        chain!(
            rhs,
            self.addr_push(id),
            pop(Reg::T1),
            pop(Reg::T0),
            [Line::Inst(Inst::SW(Reg::T0, Loc::Indexed(0, Reg::T1)))],
        )
        .collect()
    }

    /// Intern by verbatim lexeme; the first use emits the .data record
    /// inline and later uses reuse its label.
    fn string(&mut self, lexeme: &str) -> Vec<Line> {
        if let Some(label) = self.strings.get(lexeme) {
            return vec![Line::Inst(Inst::LA(Reg::T0, Loc::Symbol(label.clone())))];
        }
        let label = self.next_label();
        self.strings.insert(lexeme.to_string(), label.clone());
        vec![
            Line::Data,
            Line::Asciiz(label.clone(), lexeme.to_string()),
            Line::Text,
            Line::Inst(Inst::LA(Reg::T0, Loc::Symbol(label))),
        ]
    }

    /// Evaluate actuals in source order, call, drop the argument area, and
    /// push the result for non-void callees.
    fn call(&mut self, call: &Call) -> Vec<Line> {
        let mut lines = Vec::new();
        for actual in &call.actuals {
            lines.extend(self.expr_push(actual));
        }

        let fn_sym = self.fn_sym(&call.callee);
        let size_params = fn_sym.size_params;
        let is_void = fn_sym.ret.is_void();

        let target = if call.callee.name == "main" {
            "main".to_string()
        } else {
            format!("_{}", call.callee.name)
        };
        lines.push(Line::Inst(Inst::JAL(target)));
        lines.push(Line::Inst(Inst::ADDI(Reg::Sp, Reg::Sp, size_params)));
        if !is_void {
            lines.extend(push(Reg::V0));
        }
        lines
    }

    /// Jump form: branch to one of the two labels instead of producing a
    /// value. Short-circuit operators recurse; everything else computes $t0
    /// and branches on $t0 == FALSE.
    fn jump(&mut self, expr: &Expr, true_label: &str, false_label: &str) -> Vec<Line> {
        match expr {
            Expr::True(_) => vec![
                Line::Inst(Inst::LI(Reg::T0, TRUE)),
                Line::Inst(Inst::B(true_label.to_string())),
            ],

            Expr::False(_) => vec![
                Line::Inst(Inst::LI(Reg::T0, FALSE)),
                Line::Inst(Inst::B(false_label.to_string())),
            ],

            Expr::Binary(BinaryOp::And, lhs, rhs) => {
                let right_label = self.next_label();
                chain!(
                    self.jump(lhs, &right_label, false_label),
                    [Line::Label(right_label)],
                    self.jump(rhs, true_label, false_label),
                )
                .collect()
            }

            Expr::Binary(BinaryOp::Or, lhs, rhs) => {
                let right_label = self.next_label();
                chain!(
                    self.jump(lhs, true_label, &right_label),
                    [Line::Label(right_label)],
                    self.jump(rhs, true_label, false_label),
                )
                .collect()
            }

            _ => chain!(
                self.expr(expr),
                [
                    Line::Inst(Inst::BEQ(Reg::T0, FALSE, false_label.to_string())),
                    Line::Inst(Inst::B(true_label.to_string())),
                ],
            )
            .collect(),
        }
    }
}
