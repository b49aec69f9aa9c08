//! Error types for the labgrid engine.
//!
//! Validation failures (`CellError`) are attached to the offending cell and
//! surfaced inline; they never abort an edit. `GridError` is a contract
//! violation by the caller and is fatal to the operation that raised it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-cell validation or formula failure, stored on the cell itself so the
/// UI can highlight the attempted value.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellError {
    #[error("column is locked")]
    Locked,

    #[error("value is required")]
    Required,

    #[error("not a number: {input}")]
    InvalidNumber { input: String },

    #[error("value {value} is below minimum {min}")]
    BelowMinimum { value: f64, min: f64 },

    #[error("value {value} is above maximum {max}")]
    AboveMaximum { value: f64, max: f64 },

    #[error("formula error: {0}")]
    Formula(String),
}

/// Grid access outside the configured bounds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({row}, {col}) out of bounds for {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// Formula tokenizer/parser/evaluator failure. Rendered as the `#ERROR`
/// sentinel by the grid, never propagated out of recompute.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("formula must start with =")]
    MissingEquals,

    #[error("empty formula")]
    Empty,

    #[error("unexpected character: {0}")]
    UnexpectedChar(char),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("expected {expected}")]
    Expected { expected: &'static str },

    #[error("unknown function: {0}")]
    UnknownFunction(String),
}
