// Formula evaluator - walks the AST against a cell lookup.
//
// Aggregate semantics (deliberate, matches the entry-grid contract):
// - SUM counts every non-empty cell, coercing non-numeric text to 0.
// - AVERAGE/MIN/MAX skip non-numeric cells; empty input yields 0.
// - Arithmetic cell refs substitute the current numeric value, with
//   missing/non-numeric cells defaulting to 0.
// - Division by zero yields 0, never an error.

use crate::cell::CellValue;
use crate::error::FormulaError;

use super::parser::{Expr, Op};

/// Read access the evaluator needs into the grid.
pub trait CellLookup {
    /// Resolved value at (row, col); out-of-bounds reads are Empty.
    fn cell_value(&self, row: usize, col: usize) -> CellValue;
}

/// Evaluate an expression to a single number.
pub fn evaluate<L: CellLookup>(expr: &Expr, lookup: &L) -> Result<f64, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::CellRef { row, col } => {
            Ok(lookup.cell_value(*row, *col).as_number().unwrap_or(0.0))
        }
        // A bare range only makes sense inside a function argument.
        Expr::Range { .. } => Err(FormulaError::Expected { expected: "range inside a function" }),
        Expr::Function { name, args } => evaluate_function(name, args, lookup),
        Expr::BinaryOp { op, left, right } => {
            let l = evaluate(left, lookup)?;
            let r = evaluate(right, lookup)?;
            Ok(match op {
                Op::Add => l + r,
                Op::Sub => l - r,
                Op::Mul => l * r,
                Op::Div => {
                    if r == 0.0 {
                        0.0
                    } else {
                        l / r
                    }
                }
            })
        }
    }
}

fn evaluate_function<L: CellLookup>(
    name: &str,
    args: &[Expr],
    lookup: &L,
) -> Result<f64, FormulaError> {
    let values = collect_values(args, lookup)?;
    match name {
        "SUM" => Ok(values
            .iter()
            .map(|v| v.as_number().unwrap_or(0.0))
            .sum()),
        "AVERAGE" | "AVG" => {
            let nums: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();
            if nums.is_empty() {
                Ok(0.0)
            } else {
                Ok(nums.iter().sum::<f64>() / nums.len() as f64)
            }
        }
        "MIN" => {
            let nums: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();
            if nums.is_empty() {
                Ok(0.0)
            } else {
                Ok(nums.iter().cloned().fold(f64::INFINITY, f64::min))
            }
        }
        "MAX" => {
            let nums: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();
            if nums.is_empty() {
                Ok(0.0)
            } else {
                Ok(nums.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
            }
        }
        other => Err(FormulaError::UnknownFunction(other.to_string())),
    }
}

/// Gather all non-empty cell values referenced by the argument list.
/// Computed sub-expressions contribute their numeric result.
fn collect_values<L: CellLookup>(
    args: &[Expr],
    lookup: &L,
) -> Result<Vec<CellValue>, FormulaError> {
    let mut values = Vec::new();
    for arg in args {
        match arg {
            Expr::Range { start_row, start_col, end_row, end_col } => {
                let (r0, r1) = (*start_row.min(end_row), *start_row.max(end_row));
                let (c0, c1) = (*start_col.min(end_col), *start_col.max(end_col));
                for row in r0..=r1 {
                    for col in c0..=c1 {
                        let value = lookup.cell_value(row, col);
                        if !value.is_empty() {
                            values.push(value);
                        }
                    }
                }
            }
            Expr::CellRef { row, col } => {
                let value = lookup.cell_value(*row, *col);
                if !value.is_empty() {
                    values.push(value);
                }
            }
            other => values.push(CellValue::Number(evaluate(other, lookup)?)),
        }
    }
    Ok(values)
}
