use super::token::{Token, TokenKind};
use crate::error::ParseError;

use std::iter::Peekable;

// Comment and error tokens never reach the grammar: comments carry no
// structure, and the scanner has already reported the bad characters.
fn significant(kind: &TokenKind) -> bool {
    !matches!(kind, TokenKind::Comment(_) | TokenKind::Error(_))
}

/// Token cursor shared by every production. Errors are collected instead of
/// failing fast, so one broken declaration does not hide the rest of the
/// file.
pub struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    errors: Vec<ParseError>,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        Parser {
            tokens: tokens.peekable(),
            errors: Vec::new(),
        }
    }

    pub fn error(&mut self, e: ParseError) {
        self.errors.push(e);
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Next significant token, unconsumed.
    pub fn peek(&mut self) -> Option<&Token> {
        while let Some(token) = self.tokens.peek() {
            if significant(&token.kind) {
                break;
            }
            self.tokens.next();
        }
        self.tokens.peek()
    }

    /// Consume and return the next significant token.
    pub fn bump(&mut self) -> Option<Token> {
        self.peek()?;
        self.tokens.next()
    }

    /// Whether the next significant token satisfies `want`.
    pub fn at(&mut self, want: impl Fn(&TokenKind) -> bool) -> bool {
        self.peek().is_some_and(|token| want(&token.kind))
    }

    /// Consume the next token, which must satisfy `want`.
    pub fn demand(&mut self, want: impl Fn(&TokenKind) -> bool) -> Result<Token, ParseError> {
        let Some(token) = self.peek().cloned() else {
            return Err(ParseError::UnexpectedEof);
        };
        if !want(&token.kind) {
            return Err(ParseError::UnexpectedToken((&token).into()));
        }
        self.tokens.next();
        Ok(token)
    }

    /// { elem } terminated by a token satisfying `stop` (left unconsumed).
    /// Statement lists and struct bodies have this shape.
    pub fn seq_until<T>(
        &mut self,
        stop: impl Fn(&TokenKind) -> bool,
        mut elem: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();
        while !self.at(&stop) {
            items.push(elem(self)?);
        }
        Ok(items)
    }

    /// [ elem { "," elem } ] terminated by a token satisfying `stop` (left
    /// unconsumed). Formals and actuals both have this shape.
    pub fn comma_list<T>(
        &mut self,
        stop: impl Fn(&TokenKind) -> bool,
        mut elem: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();
        if self.at(&stop) {
            return Ok(items);
        }
        items.push(elem(self)?);
        while self.at(|kind| matches!(kind, TokenKind::Comma)) {
            self.bump();
            items.push(elem(self)?);
        }
        Ok(items)
    }

    /// Resynchronize after a bad declaration: skip ahead to the next token
    /// that can open a top-level declaration. Every C-- declaration starts
    /// with a type keyword or `struct`, and neither occurs in statement
    /// position, so stopping there loses at most the broken declaration.
    pub fn recover_to_decl(&mut self) {
        while let Some(token) = self.peek() {
            if matches!(
                token.kind,
                TokenKind::KwInt | TokenKind::KwBool | TokenKind::KwVoid | TokenKind::KwStruct
            ) {
                return;
            }
            self.tokens.next();
        }
    }
}

/// Kind-pattern sugar over [`Parser::at`].
#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.at(|kind| matches!(kind, $kind))
    };
}

/// Kind-pattern sugar over [`Parser::demand`].
#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat) => {
        $parser.demand(|kind| matches!(kind, $kind))
    };
}
