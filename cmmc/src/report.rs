use color_print::cprintln;

/// One diagnostic record. Position is 1-based; (0,0) marks program-level
/// diagnostics with no source anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Msg {
    pub kind: MsgKind,
    pub line: usize,
    pub col: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgKind {
    Error,
    Warn,
}

impl Msg {
    fn print(&self, file: &str) {
        match self.kind {
            MsgKind::Error => {
                cprintln!("<red,bold>error</>: {}:{}:{}: {}", file, self.line, self.col, self.text)
            }
            MsgKind::Warn => {
                cprintln!("<yellow,bold>warn</>: {}:{}:{}: {}", file, self.line, self.col, self.text)
            }
        }
    }
}

/// Ordered diagnostic sink shared by all passes. Messages are kept in
/// traversal order and never coalesced; the source file name qualifies every
/// rendered message.
#[derive(Debug)]
pub struct Reporter {
    file: String,
    msgs: Vec<Msg>,
}

impl Reporter {
    pub fn new(file: &str) -> Self {
        Reporter {
            file: file.to_string(),
            msgs: Vec::new(),
        }
    }

    pub fn error(&mut self, line: usize, col: usize, text: &str) {
        self.msgs.push(Msg {
            kind: MsgKind::Error,
            line,
            col,
            text: text.to_string(),
        });
    }

    pub fn warn(&mut self, line: usize, col: usize, text: &str) {
        self.msgs.push(Msg {
            kind: MsgKind::Warn,
            line,
            col,
            text: text.to_string(),
        });
    }

    pub fn has_error(&self) -> bool {
        self.msgs.iter().any(|msg| msg.kind == MsgKind::Error)
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn msgs(&self) -> &[Msg] {
        &self.msgs
    }

    pub fn into_msgs(self) -> Vec<Msg> {
        self.msgs
    }

    pub fn dump(&self) {
        for msg in &self.msgs {
            msg.print(&self.file);
        }
    }
}
