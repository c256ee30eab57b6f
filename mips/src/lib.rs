pub mod inst;
pub mod line;
pub mod reg;

pub use inst::{Inst, Loc};
pub use line::{render, Line};
pub use reg::Reg;
