#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Double character tokens
    EqualEqual,   // '=='
    ExclEqual,    // '!='
    LAngleEqual,  // '<='
    RAngleEqual,  // '>='
    LAngleLAngle, // '<<'
    RAngleRAngle, // '>>'
    PlusPlus,     // '++'
    MinusMinus,   // '--'
    AmpAmp,       // '&&'
    PipePipe,     // '||'

    // Single character tokens
    Equal,     // '='
    Plus,      // '+'
    Minus,     // '-'
    Star,      // '*'
    Slash,     // '/'
    Excl,      // '!'
    Semicolon, // ';'
    Comma,     // ','
    Period,    // '.'
    LParen,    // '('
    RParen,    // ')'
    LCurly,    // '{'
    RCurly,    // '}'
    LAngle,    // '<'
    RAngle,    // '>'

    // Keywords
    KwInt,    // "int"
    KwBool,   // "bool"
    KwVoid,   // "void"
    KwTrue,   // "true"
    KwFalse,  // "false"
    KwStruct, // "struct"
    KwCin,    // "cin"
    KwCout,   // "cout"
    KwIf,     // "if"
    KwElse,   // "else"
    KwWhile,  // "while"
    KwRepeat, // "repeat"
    KwReturn, // "return"

    // Identifier
    Ident(String),

    // Literals
    IntLit(String, i32), // lexeme, decoded value
    StrLit(String),      // verbatim lexeme with surrounding quotes

    // Special
    Comment(String),
    Error(String),
}

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}
