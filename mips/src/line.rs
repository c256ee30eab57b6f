use crate::inst::Inst;

use std::fmt::{self, Display};

/// One line of the emitted assembly file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text,
    Data,
    Globl(String),
    Label(String),
    Word(String),            // "_g: .word 0"
    Asciiz(String, String),  // label, verbatim quoted lexeme
    Inst(Inst),
    Comment(String),
}

impl Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Text => write!(f, "\t.text"),
            Line::Data => write!(f, "\t.data"),
            Line::Globl(name) => write!(f, "\t.globl {}", name),
            Line::Label(label) => write!(f, "{}:", label),
            Line::Word(label) => write!(f, "{}:\t.word 0", label),
            Line::Asciiz(label, lexeme) => write!(f, "{}:\t.asciiz {}", label, lexeme),
            Line::Inst(inst) => write!(f, "\t{}", inst),
            Line::Comment(text) => write!(f, "\t\t# {}", text),
        }
    }
}

/// Render a line sequence as the final assembly text.
pub fn render(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inst::Loc;
    use crate::reg::Reg;

    #[test]
    fn test_lines() {
        assert_eq!(Line::Text.to_string(), "\t.text");
        assert_eq!(Line::Globl("main".into()).to_string(), "\t.globl main");
        assert_eq!(Line::Label("_main_Exit".into()).to_string(), "_main_Exit:");
        assert_eq!(Line::Word("_g".into()).to_string(), "_g:\t.word 0");
        assert_eq!(
            Line::Asciiz(".L0".into(), "\"hi\"".into()).to_string(),
            ".L0:\t.asciiz \"hi\""
        );
        assert_eq!(
            Line::Inst(Inst::LW(Reg::Ra, Loc::Indexed(0, Reg::Fp))).to_string(),
            "\tlw $ra, 0($fp)"
        );
    }

    #[test]
    fn test_render() {
        let lines = vec![Line::Data, Line::Word("_x".into()), Line::Text];
        assert_eq!(render(&lines), "\t.data\n_x:\t.word 0\n\t.text\n");
    }
}
