use strum::Display;

/// Registers used by the stack-machine code model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Reg {
    #[strum(serialize = "$zero")]
    Zero,
    #[strum(serialize = "$v0")]
    V0,
    #[strum(serialize = "$a0")]
    A0,
    #[strum(serialize = "$t0")]
    T0,
    #[strum(serialize = "$t1")]
    T1,
    #[strum(serialize = "$fp")]
    Fp,
    #[strum(serialize = "$sp")]
    Sp,
    #[strum(serialize = "$ra")]
    Ra,
}

#[test]
fn test() {
    assert_eq!(Reg::T0.to_string(), "$t0");
    assert_eq!(Reg::Fp.to_string(), "$fp");
    assert_eq!(Reg::Zero.to_string(), "$zero");
}
