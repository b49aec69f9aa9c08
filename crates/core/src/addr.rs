//! Cell addressing.
//!
//! A `CellAddr` identifies one grid location by 0-based row and column.
//! It renders and parses the spreadsheet-style label (`A1`, `AB12`) used
//! by formulas and the file-export collaborator.

use serde::{Deserialize, Serialize};

/// 0-based (row, column) coordinate of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddr {
    pub row: usize,
    pub col: usize,
}

impl CellAddr {
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse an `A1`-style label. Returns `None` for anything that is not
    /// column letters followed by a 1-based row number.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim().to_uppercase();
        let split = label.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = label.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
            return None;
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let row: usize = digits.parse().ok()?;
        if row == 0 {
            return None;
        }
        Some(Self {
            row: row - 1,
            col: letters_to_col(letters)?,
        })
    }
}

impl std::fmt::Display for CellAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", col_to_letters(self.col), self.row + 1)
    }
}

/// Convert a 0-based column index to letter(s): 0=A, 25=Z, 26=AA, etc.
pub fn col_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Convert column letter(s) to a 0-based index. `None` if empty, not A-Z,
/// or too long to fit a `usize` (absurd references come in through user
/// formulas and must degrade, not overflow).
pub fn letters_to_col(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        acc = acc
            .checked_mul(26)?
            .checked_add(c as usize - 'A' as usize + 1)?;
    }
    Some(acc - 1)
}
