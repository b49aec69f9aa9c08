//! Cell entry validation.
//!
//! Checks a candidate raw value against its column schema entry and either
//! coerces it to a typed `CellValue` or produces the `CellError` to attach
//! to the cell. Rule order is fixed: locked precedes everything, then
//! required, then numeric parse, then bounds.

use crate::cell::{CellType, CellValue};
use crate::error::CellError;
use crate::schema::Column;

/// Validate raw user input against one column's constraints.
///
/// On success the value is already coerced (numbers parsed, text trimmed).
/// On failure the caller attaches the error and the attempted value to the
/// cell; the edit is never propagated as a hard failure.
pub fn validate(raw: &str, column: &Column) -> Result<CellValue, CellError> {
    if column.locked {
        return Err(CellError::Locked);
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        if column.required {
            return Err(CellError::Required);
        }
        return Ok(CellValue::Empty);
    }

    if column.cell_type == CellType::Number {
        let value: f64 = trimmed.parse().map_err(|_| CellError::InvalidNumber {
            input: trimmed.to_string(),
        })?;
        if let Some(min) = column.min {
            if value < min {
                return Err(CellError::BelowMinimum { value, min });
            }
        }
        if let Some(max) = column.max {
            if value > max {
                return Err(CellError::AboveMaximum { value, max });
            }
        }
        return Ok(CellValue::Number(value));
    }

    // Text, select and date columns store the entered text as-is.
    Ok(CellValue::Text(trimmed.to_string()))
}
