//! Clipboard copy/paste with relative remapping.
//!
//! Copy captures the selection by offset from its normalized top-left
//! anchor; paste re-anchors those offsets at the target cell. Cells that
//! land out of bounds or on a locked column are skipped one by one, never
//! aborting the rest of the paste.

use rustc_hash::FxHashMap;

use labgrid_core::{CellAddr, Selection};

use crate::cell::{CellStyle, CellValue};
use crate::grid::Grid;

/// Content captured for one copied cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipCell {
    pub value: CellValue,
    pub formula: Option<String>,
    pub style: CellStyle,
}

/// Session-scoped clipboard; each copy overwrites the previous one.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    cells: FxHashMap<(usize, usize), ClipCell>,
}

impl Clipboard {
    /// Capture a selection's cells keyed by (Δrow, Δcol) from its top-left
    /// corner. Cells outside the grid contribute nothing.
    pub fn copy(grid: &Grid, selection: &Selection) -> Self {
        let (top_left, _) = selection.normalized();
        let mut cells = FxHashMap::default();
        for addr in selection.iter() {
            let Ok(cell) = grid.get(addr.row, addr.col) else { continue };
            cells.insert(
                (addr.row - top_left.row, addr.col - top_left.col),
                ClipCell {
                    value: cell.value.clone(),
                    formula: cell.formula.clone(),
                    style: cell.style.clone(),
                },
            );
        }
        Self { cells }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Apply the clipboard at `target`, skipping out-of-bounds cells and
    /// locked columns. Returns how many cells were written. The caller is
    /// responsible for the single history commit afterwards.
    pub fn paste_into(&self, grid: &mut Grid, target: CellAddr) -> usize {
        let mut applied = 0;
        for (&(dr, dc), clip) in &self.cells {
            let row = target.row + dr;
            let col = target.col + dc;
            if !grid.in_bounds(row, col) {
                continue;
            }
            if grid.schema().is_locked(col) {
                continue;
            }
            // get_mut cannot fail after the bounds check above.
            if let Ok(cell) = grid.get_mut(row, col) {
                cell.value = clip.value.clone();
                cell.formula = clip.formula.clone();
                cell.style = clip.style.clone();
                cell.error = None;
                applied += 1;
            }
        }
        applied
    }
}
