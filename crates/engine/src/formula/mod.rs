pub mod eval;
pub mod parser;
pub mod refs;

pub use eval::{evaluate, CellLookup, EvalResult};
pub use parser::{parse, Expr};
