use serde::{Deserialize, Serialize};

use crate::error::CellError;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Value domain of a column, declared by the column schema.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Text,
    Number,
    Select,
    Date,
}

/// Presentation metadata carried through to the export collaborator.
/// Every field is defaultable; imports with no style get `CellStyle::default()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub alignment: Alignment,
    /// Named background color (e.g. "yellow"); None = no fill.
    pub background: Option<String>,
}

/// Resolved cell content. When the cell has a formula this is the latest
/// evaluation result (or the `#ERROR` marker); otherwise it is
/// user-authored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Interpret raw user input: trims, detects empty and numbers,
    /// everything else is text. Formula detection happens above this
    /// level ("=..." never reaches here as a value).
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(num) = trimmed.parse::<f64>() {
            return CellValue::Number(num);
        }
        CellValue::Text(trimmed.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view of the value. Numeric text coerces; anything else is None.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Empty => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    /// Original formula source ("=SUM(A1:A3)") when this cell is computed.
    pub formula: Option<String>,
    pub cell_type: CellType,
    /// Validation or formula failure attached inline; the attempted value
    /// stays in `value` so the UI can show it highlighted.
    pub error: Option<CellError>,
    pub style: CellStyle,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn typed(cell_type: CellType) -> Self {
        Self {
            cell_type,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.formula.is_none()
    }

    pub fn has_formula(&self) -> bool {
        self.formula.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_detects_numbers() {
        assert_eq!(CellValue::from_input("42"), CellValue::Number(42.0));
        assert_eq!(CellValue::from_input(" 3.5 "), CellValue::Number(3.5));
        assert_eq!(CellValue::from_input("-0.25"), CellValue::Number(-0.25));
    }

    #[test]
    fn test_from_input_detects_empty_and_text() {
        assert_eq!(CellValue::from_input(""), CellValue::Empty);
        assert_eq!(CellValue::from_input("   "), CellValue::Empty);
        assert_eq!(
            CellValue::from_input("silty clay"),
            CellValue::Text("silty clay".to_string())
        );
    }

    #[test]
    fn test_as_number_coerces_numeric_text() {
        assert_eq!(CellValue::Text("12.5".into()).as_number(), Some(12.5));
        assert_eq!(CellValue::Text("n/a".into()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
        assert_eq!(CellValue::Number(7.0).as_number(), Some(7.0));
    }

    #[test]
    fn test_display_trims_integral_floats() {
        assert_eq!(CellValue::Number(95.0).display(), "95");
        assert_eq!(CellValue::Number(95.5).display(), "95.5");
        assert_eq!(CellValue::Empty.display(), "");
    }

    #[test]
    fn test_cell_is_empty_considers_formula() {
        let mut cell = Cell::new();
        assert!(cell.is_empty());
        cell.formula = Some("=SUM(A1:A3)".to_string());
        assert!(!cell.is_empty());
    }
}
