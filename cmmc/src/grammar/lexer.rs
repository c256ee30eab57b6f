use super::token::{Pos, Token, TokenKind};
use crate::report::Reporter;

use std::iter::Peekable;
use std::str::CharIndices;

pub struct Lexer<'a> {
    code: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self { code }
    }

    pub fn tokens(self, rep: &mut Reporter) -> Vec<Token> {
        let mut tokens = Vec::new();
        for (idx, line) in self.code.lines().enumerate() {
            let lexer = LineLexer::new(line, idx + 1);
            tokens.extend(lexer.parse(rep));
        }
        tokens
    }
}

pub struct LineLexer<'a> {
    line: &'a str,
    iter: Peekable<CharIndices<'a>>,
    lineno: usize,
}

impl<'a> LineLexer<'a> {
    pub fn new(line: &'a str, lineno: usize) -> Self {
        Self {
            line,
            iter: line.char_indices().peekable(),
            lineno,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<(usize, char)> {
        self.iter.clone().nth(n)
    }

    fn consume(&mut self) -> Option<(usize, char)> {
        self.iter.next()
    }
}

// ----------------------------------------------------------------------------
// Scanner
// ----------------------------------------------------------------------------

impl<'a> LineLexer<'a> {
    pub fn parse(mut self, rep: &mut Reporter) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some((idx, ch0)) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            let pos = Pos {
                line: self.lineno,
                col: idx + 1,
            };

            // 1. Double character token
            if let Some((_, ch1)) = self.peek_nth(1) {
                // Comment
                if ch0 == '/' && ch1 == '/' {
                    self.consume();
                    self.consume();
                    let comment = self.iter.map(|(_, ch)| ch).collect::<String>();
                    tokens.push(Token::new(TokenKind::Comment(comment), pos));
                    break;
                }

                if let Some(kind) = double_char_token(ch0, ch1) {
                    self.consume();
                    self.consume();
                    tokens.push(Token::new(kind, pos));
                    continue;
                }
            }

            // 2. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                tokens.push(Token::new(kind, pos));
                continue;
            }

            // 3. Integer literal
            if ch0.is_ascii_digit() {
                tokens.push(Token::new(self.parse_number(pos, rep), pos));
                continue;
            }

            // 4. String literal
            if ch0 == '"' {
                tokens.push(Token::new(self.parse_text(pos, rep), pos));
                continue;
            }

            // 5. Identifier or keyword
            if ch0.is_ascii_alphabetic() || ch0 == '_' {
                tokens.push(Token::new(self.parse_word(), pos));
                continue;
            }

            // Error
            self.consume();
            rep.error(pos.line, pos.col, &format!("Illegal character ignored: {ch0}"));
            tokens.push(Token::new(TokenKind::Error(format!("{ch0}")), pos));
        }
        tokens
    }

    fn parse_word(&mut self) -> TokenKind {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self
            .iter
            .next_if(|(_, ch)| matches!(ch, '_' | '0'..='9' | 'a'..='z' | 'A'..='Z'))
        {
            lexeme.push(ch);
        }
        match keyword(&lexeme) {
            Some(kind) => kind,
            None => TokenKind::Ident(lexeme),
        }
    }

    fn parse_number(&mut self, pos: Pos, rep: &mut Reporter) -> TokenKind {
        let mut lexeme = String::new();
        while let Some((_, ch)) = self.iter.next_if(|(_, ch)| ch.is_ascii_digit()) {
            lexeme.push(ch);
        }
        match lexeme.parse::<i32>() {
            Ok(num) => TokenKind::IntLit(lexeme, num),
            Err(_) => {
                rep.warn(pos.line, pos.col, "Integer literal too large; using max value");
                TokenKind::IntLit(lexeme, i32::MAX)
            }
        }
    }

    // The lexeme is kept verbatim, quotes and escapes included; the emitter
    // reuses it as the .asciiz payload.
    fn parse_text(&mut self, pos: Pos, rep: &mut Reporter) -> TokenKind {
        let (start, _) = self.consume().unwrap();
        let mut bad_escape = false;
        loop {
            match self.consume() {
                None => {
                    rep.error(pos.line, pos.col, "Unterminated string literal ignored");
                    return TokenKind::Error(self.line[start..].to_string());
                }
                Some((end, '"')) => {
                    let lexeme = self.line[start..=end].to_string();
                    if bad_escape {
                        rep.error(
                            pos.line,
                            pos.col,
                            "String literal with bad escaped character ignored",
                        );
                        return TokenKind::Error(lexeme);
                    }
                    return TokenKind::StrLit(lexeme);
                }
                Some((_, '\\')) => match self.consume() {
                    Some((_, 'n' | 't' | '\'' | '"' | '\\' | '?')) => {}
                    _ => bad_escape = true,
                },
                Some(_) => {}
            }
        }
    }
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('=', '=') => Some(TokenKind::EqualEqual),
        ('!', '=') => Some(TokenKind::ExclEqual),
        ('<', '=') => Some(TokenKind::LAngleEqual),
        ('>', '=') => Some(TokenKind::RAngleEqual),
        ('<', '<') => Some(TokenKind::LAngleLAngle),
        ('>', '>') => Some(TokenKind::RAngleRAngle),
        ('+', '+') => Some(TokenKind::PlusPlus),
        ('-', '-') => Some(TokenKind::MinusMinus),
        ('&', '&') => Some(TokenKind::AmpAmp),
        ('|', '|') => Some(TokenKind::PipePipe),
        _ => None,
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equal),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '!' => Some(TokenKind::Excl),
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        '.' => Some(TokenKind::Period),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '{' => Some(TokenKind::LCurly),
        '}' => Some(TokenKind::RCurly),
        '<' => Some(TokenKind::LAngle),
        '>' => Some(TokenKind::RAngle),
        _ => None,
    }
}

fn keyword(s: &str) -> Option<TokenKind> {
    match s {
        "int" => Some(TokenKind::KwInt),
        "bool" => Some(TokenKind::KwBool),
        "void" => Some(TokenKind::KwVoid),
        "true" => Some(TokenKind::KwTrue),
        "false" => Some(TokenKind::KwFalse),
        "struct" => Some(TokenKind::KwStruct),
        "cin" => Some(TokenKind::KwCin),
        "cout" => Some(TokenKind::KwCout),
        "if" => Some(TokenKind::KwIf),
        "else" => Some(TokenKind::KwElse),
        "while" => Some(TokenKind::KwWhile),
        "repeat" => Some(TokenKind::KwRepeat),
        "return" => Some(TokenKind::KwReturn),
        _ => None,
    }
}
