use crate::reg::Reg;

use std::fmt::{self, Display};

/// Address operand: a frame-relative slot or a named symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loc {
    Indexed(i32, Reg), // "-8($fp)"
    Symbol(String),    // "_g", ".L0"
}

impl Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loc::Indexed(off, base) => write!(f, "{}({})", off, base),
            Loc::Symbol(name) => write!(f, "{}", name),
        }
    }
}

/// The instruction subset emitted by the compiler. Pseudo-ops are kept as-is;
/// the assembler (SPIM/MARS) expands them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    LI(Reg, i32),
    LA(Reg, Loc),
    LW(Reg, Loc),
    SW(Reg, Loc),
    MOVE(Reg, Reg),

    ADD(Reg, Reg, Reg),
    ADDI(Reg, Reg, i32), // "add rd, rs, imm"
    ADDU(Reg, Reg, i32),
    SUB(Reg, Reg, Reg),
    SUBI(Reg, Reg, i32), // "sub rd, rs, imm"
    SUBU(Reg, Reg, i32),
    MULT(Reg, Reg),
    DIV(Reg, Reg),
    MFLO(Reg),

    SEQ(Reg, Reg, Reg),
    SEQI(Reg, Reg, i32),
    SNE(Reg, Reg, Reg),
    SLT(Reg, Reg, Reg),
    SGT(Reg, Reg, Reg),
    SLE(Reg, Reg, Reg),
    SGE(Reg, Reg, Reg),

    BEQ(Reg, i32, String),
    B(String),
    JAL(String),
    JR(Reg),
    SYSCALL,
}

impl Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! rrr {
            ($name:expr, $a:expr, $b:expr, $c:expr) => {
                write!(f, "{} {}, {}, {}", $name, $a, $b, $c)
            };
        }

        match self {
            Inst::LI(rd, imm) => write!(f, "li {}, {}", rd, imm),
            Inst::LA(rd, loc) => write!(f, "la {}, {}", rd, loc),
            Inst::LW(rd, loc) => write!(f, "lw {}, {}", rd, loc),
            Inst::SW(rs, loc) => write!(f, "sw {}, {}", rs, loc),
            Inst::MOVE(rd, rs) => write!(f, "move {}, {}", rd, rs),

            Inst::ADD(rd, rs1, rs2) => rrr!("add", rd, rs1, rs2),
            Inst::ADDI(rd, rs, imm) => rrr!("add", rd, rs, imm),
            Inst::ADDU(rd, rs, imm) => rrr!("addu", rd, rs, imm),
            Inst::SUB(rd, rs1, rs2) => rrr!("sub", rd, rs1, rs2),
            Inst::SUBI(rd, rs, imm) => rrr!("sub", rd, rs, imm),
            Inst::SUBU(rd, rs, imm) => rrr!("subu", rd, rs, imm),
            Inst::MULT(rs1, rs2) => write!(f, "mult {}, {}", rs1, rs2),
            Inst::DIV(rs1, rs2) => write!(f, "div {}, {}", rs1, rs2),
            Inst::MFLO(rd) => write!(f, "mflo {}", rd),

            Inst::SEQ(rd, rs1, rs2) => rrr!("seq", rd, rs1, rs2),
            Inst::SEQI(rd, rs, imm) => rrr!("seq", rd, rs, imm),
            Inst::SNE(rd, rs1, rs2) => rrr!("sne", rd, rs1, rs2),
            Inst::SLT(rd, rs1, rs2) => rrr!("slt", rd, rs1, rs2),
            Inst::SGT(rd, rs1, rs2) => rrr!("sgt", rd, rs1, rs2),
            Inst::SLE(rd, rs1, rs2) => rrr!("sle", rd, rs1, rs2),
            Inst::SGE(rd, rs1, rs2) => rrr!("sge", rd, rs1, rs2),

            Inst::BEQ(rs, imm, label) => write!(f, "beq {}, {}, {}", rs, imm, label),
            Inst::B(label) => write!(f, "b {}", label),
            Inst::JAL(label) => write!(f, "jal {}", label),
            Inst::JR(rs) => write!(f, "jr {}", rs),
            Inst::SYSCALL => write!(f, "syscall"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_display {
        ($($name:ident: $inst:expr => $text:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!($inst.to_string(), $text);
                }
            )*
        }
    }

    test_display! {
        test_li: Inst::LI(Reg::T0, 7) => "li $t0, 7",
        test_li_neg: Inst::LI(Reg::T1, -1) => "li $t1, -1",
        test_la_label: Inst::LA(Reg::T0, Loc::Symbol(".L0".into())) => "la $t0, .L0",
        test_la_frame: Inst::LA(Reg::T0, Loc::Indexed(-8, Reg::Fp)) => "la $t0, -8($fp)",
        test_lw_frame: Inst::LW(Reg::T0, Loc::Indexed(4, Reg::Fp)) => "lw $t0, 4($fp)",
        test_lw_global: Inst::LW(Reg::T0, Loc::Symbol("_g".into())) => "lw $t0, _g",
        test_sw: Inst::SW(Reg::T0, Loc::Indexed(0, Reg::Sp)) => "sw $t0, 0($sp)",
        test_move: Inst::MOVE(Reg::Sp, Reg::T0) => "move $sp, $t0",
        test_add: Inst::ADD(Reg::T0, Reg::T0, Reg::T1) => "add $t0, $t0, $t1",
        test_addi: Inst::ADDI(Reg::Sp, Reg::Sp, 8) => "add $sp, $sp, 8",
        test_addu: Inst::ADDU(Reg::Fp, Reg::Sp, 8) => "addu $fp, $sp, 8",
        test_subu: Inst::SUBU(Reg::Sp, Reg::Sp, 4) => "subu $sp, $sp, 4",
        test_mult: Inst::MULT(Reg::T0, Reg::T1) => "mult $t0, $t1",
        test_mflo: Inst::MFLO(Reg::T0) => "mflo $t0",
        test_seq: Inst::SEQ(Reg::T0, Reg::T0, Reg::T1) => "seq $t0, $t0, $t1",
        test_seqi: Inst::SEQI(Reg::T0, Reg::T0, 0) => "seq $t0, $t0, 0",
        test_sne: Inst::SNE(Reg::T1, Reg::V0, Reg::Zero) => "sne $t1, $v0, $zero",
        test_beq: Inst::BEQ(Reg::T0, 0, ".L1".into()) => "beq $t0, 0, .L1",
        test_b: Inst::B(".L2".into()) => "b .L2",
        test_jal: Inst::JAL("_f".into()) => "jal _f",
        test_jr: Inst::JR(Reg::Ra) => "jr $ra",
        test_syscall: Inst::SYSCALL => "syscall",
    }
}
