mod data;
mod instr;

pub use data::*;
pub use instr::*;
