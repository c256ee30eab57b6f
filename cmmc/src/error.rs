use crate::grammar::token::{Token, TokenKind};
use crate::report::Msg;

use std::fmt;
use thiserror::Error;

/// Token position snapshot for error display.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}:{}", self.kind, self.line, self.col)
    }
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        TokenInfo {
            kind: token.kind.clone(),
            line: token.pos.line,
            col: token.pos.col,
        }
    }
}

/// Top-level compiler error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParseError>),

    #[error("{} semantic error(s)", .0.len())]
    Semantic(Vec<Msg>),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse errors
#[derive(Debug, Error, Clone)]
pub enum ParseError {
    #[error("Unexpected end of file")]
    UnexpectedEof,

    #[error("Unexpected token: {0}")]
    UnexpectedToken(TokenInfo),
}

/// Scope-table misuse. These mark compiler invariant violations, not source
/// errors; the driver reports them and aborts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("No scope to operate on")]
    EmptyScope,

    #[error("Name already bound in the current scope: {0}")]
    DuplicateLocal(String),

    #[error("Empty name for symbol table entry")]
    BadArgument,
}
