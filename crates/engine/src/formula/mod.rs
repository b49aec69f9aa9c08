pub mod eval;
pub mod parser;

pub use eval::{evaluate, CellLookup};
pub use parser::{parse, Expr, Op};

/// Sentinel stored as a cell's text value when its formula fails to parse
/// or evaluate. A malformed formula must never abort recompute of the rest
/// of the grid.
pub const ERROR_SENTINEL: &str = "#ERROR";
