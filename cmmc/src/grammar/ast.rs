use super::token::Pos;
use crate::sema::symbol::SymId;

#[derive(Debug, Clone)]
pub struct Program(pub Vec<Decl>); // program = { decl }

#[derive(Debug, Clone)]
pub enum Decl {
    Var(VarDecl),       // type ident ";"
    Fn(FnDecl),         // type ident "(" [ formals ] ")" "{" body "}"
    Struct(StructDecl), // "struct" ident "{" { var-decl } "}" ";"
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub ty: TypeSpec,
    pub name: Ident,
}

#[derive(Debug, Clone)]
pub struct FnDecl {
    pub ret: TypeSpec,
    pub name: Ident,
    pub formals: Vec<VarDecl>,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: Ident,
    pub fields: Vec<VarDecl>,
}

#[derive(Debug, Clone)]
pub enum TypeSpec {
    Int,
    Bool,
    Void,
    Struct(Ident), // "struct" ident
}

/// Function and control-flow bodies: all locals precede the statements.
#[derive(Debug, Clone)]
pub struct Block {
    pub decls: Vec<VarDecl>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Assign(Assign),               // loc "=" expr ";"
    PostInc(Expr),                // loc "++" ";"
    PostDec(Expr),                // loc "--" ";"
    Read(Expr),                   // "cin" ">>" loc ";"
    Write(Expr),                  // "cout" "<<" expr ";"
    If(Expr, Block),              // "if" "(" expr ")" "{" body "}"
    IfElse(Expr, Block, Block),   // ... "else" "{" body "}"
    While(Expr, Block),           // "while" "(" expr ")" "{" body "}"
    Repeat(Expr, Block),          // "repeat" "(" expr ")" "{" body "}"
    Call(Call),                   // call ";"
    Return(Pos, Option<Expr>),    // "return" [ expr ] ";"
}

#[derive(Debug, Clone)]
pub struct Assign {
    pub lhs: Expr,
    pub rhs: Expr,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub callee: Ident,
    pub actuals: Vec<Expr>,
}

/// A name use or declaration site. The symbol link is filled in by name
/// analysis; a link that stays `None` marks an unresolved use.
#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
    pub sym: Option<SymId>,
}

impl Ident {
    pub fn new(name: String, pos: Pos) -> Self {
        Ident { name, pos, sym: None }
    }
}

/// Dot access `loc . field`. When the field is itself a struct instance,
/// `def` records its struct definition so a chained access can resolve
/// against it. `bad` suppresses cascading errors.
#[derive(Debug, Clone)]
pub struct Dot {
    pub loc: Expr,
    pub field: Ident,
    pub def: Option<SymId>,
    pub bad: bool,
}

#[derive(Debug, Clone)]
pub enum Expr {
    IntLit(Pos, i32),
    StrLit(Pos, String), // verbatim lexeme with quotes
    True(Pos),
    False(Pos),
    Ident(Ident),
    Dot(Box<Dot>),
    Assign(Box<Assign>),
    Call(Call),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Reporting position: the left operand for binary and assignment forms,
    /// the operand for unary forms, the right-hand side for dot accesses.
    pub fn pos(&self) -> Pos {
        match self {
            Expr::IntLit(pos, _)
            | Expr::StrLit(pos, _)
            | Expr::True(pos)
            | Expr::False(pos) => *pos,
            Expr::Ident(id) => id.pos,
            Expr::Dot(dot) => dot.field.pos,
            Expr::Assign(assign) => assign.lhs.pos(),
            Expr::Call(call) => call.callee.pos,
            Expr::Unary(_, operand) => operand.pos(),
            Expr::Binary(_, lhs, _) => lhs.pos(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // "-"
    Not, // "!"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,   // "+"
    Minus,  // "-"
    Times,  // "*"
    Divide, // "/"
    And,    // "&&"
    Or,     // "||"
    Eq,     // "=="
    Ne,     // "!="
    Lt,     // "<"
    Gt,     // ">"
    Le,     // "<="
    Ge,     // ">="
}
