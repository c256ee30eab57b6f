use cmmc::grammar::lexer::{Lexer, LineLexer};
use cmmc::grammar::token::{Pos, TokenKind};
use cmmc::report::Reporter;

fn case(code: &str, expects: Vec<TokenKind>) {
    let mut rep = Reporter::new("test.cmm");
    let tokens = LineLexer::new(code, 1).parse(&mut rep);

    println!(" {code}");
    for (idx, token) in tokens.iter().enumerate() {
        println!("{:>2}: {:?}", idx, token.kind);
    }

    assert_eq!(tokens.len(), expects.len());
    for (idx, expect) in expects.iter().enumerate() {
        assert_eq!(tokens[idx].kind, *expect);
    }
}

#[test]
fn tests() {
    use TokenKind::*;
    case(
        "int main() { cout << \"hi\"; return 0; } // done",
        vec![
            KwInt,
            Ident(format!("main")),
            LParen,
            RParen,
            LCurly,
            KwCout,
            LAngleLAngle,
            StrLit(format!("\"hi\"")),
            Semicolon,
            KwReturn,
            IntLit(format!("0"), 0),
            Semicolon,
            RCurly,
            Comment(format!(" done")),
        ],
    );
    case(
        "a <= b >= c == d != e && f || !g",
        vec![
            Ident(format!("a")),
            LAngleEqual,
            Ident(format!("b")),
            RAngleEqual,
            Ident(format!("c")),
            EqualEqual,
            Ident(format!("d")),
            ExclEqual,
            Ident(format!("e")),
            AmpAmp,
            Ident(format!("f")),
            PipePipe,
            Excl,
            Ident(format!("g")),
        ],
    );
    case(
        "cin >> x; x++; y--;",
        vec![
            KwCin,
            RAngleRAngle,
            Ident(format!("x")),
            Semicolon,
            Ident(format!("x")),
            PlusPlus,
            Semicolon,
            Ident(format!("y")),
            MinusMinus,
            Semicolon,
        ],
    );
    case(
        "struct P { bool ok; }; repeat (10) { p.ok = true; }",
        vec![
            KwStruct,
            Ident(format!("P")),
            LCurly,
            KwBool,
            Ident(format!("ok")),
            Semicolon,
            RCurly,
            Semicolon,
            KwRepeat,
            LParen,
            IntLit(format!("10"), 10),
            RParen,
            LCurly,
            Ident(format!("p")),
            Period,
            Ident(format!("ok")),
            Equal,
            KwTrue,
            Semicolon,
            RCurly,
        ],
    );
}

#[test]
fn test_positions() {
    let mut rep = Reporter::new("test.cmm");
    let tokens = Lexer::new("int x;\n  x = 10;").tokens(&mut rep);

    assert_eq!(tokens[0].pos, Pos { line: 1, col: 1 }); // int
    assert_eq!(tokens[1].pos, Pos { line: 1, col: 5 }); // x
    assert_eq!(tokens[2].pos, Pos { line: 1, col: 6 }); // ;
    assert_eq!(tokens[3].pos, Pos { line: 2, col: 3 }); // x
    assert_eq!(tokens[5].pos, Pos { line: 2, col: 7 }); // 10
}

#[test]
fn test_int_overflow_clamps() {
    let mut rep = Reporter::new("test.cmm");
    let tokens = LineLexer::new("9999999999", 1).parse(&mut rep);

    assert_eq!(
        tokens[0].kind,
        TokenKind::IntLit(format!("9999999999"), i32::MAX)
    );
    // a warning, not an error: compilation continues
    assert!(!rep.has_error());
    assert_eq!(rep.msgs().len(), 1);
}

#[test]
fn test_illegal_character() {
    let mut rep = Reporter::new("test.cmm");
    let tokens = LineLexer::new("x $ y", 1).parse(&mut rep);

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].kind, TokenKind::Error(format!("$")));
    assert!(rep.has_error());
}

#[test]
fn test_unterminated_string() {
    let mut rep = Reporter::new("test.cmm");
    let tokens = LineLexer::new("\"no end", 1).parse(&mut rep);

    assert!(matches!(tokens[0].kind, TokenKind::Error(_)));
    assert!(rep.has_error());
}

#[test]
fn test_string_keeps_escapes_verbatim() {
    let mut rep = Reporter::new("test.cmm");
    let tokens = LineLexer::new("\"a\\nb\"", 1).parse(&mut rep);

    assert_eq!(tokens[0].kind, TokenKind::StrLit(format!("\"a\\nb\"")));
    assert!(!rep.has_error());
}
