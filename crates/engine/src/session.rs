//! The editing session.
//!
//! One `Session` exclusively owns a grid, its history, and its clipboard
//! for the lifetime of a form being edited. Every operation is synchronous
//! and runs to completion; the hosting UI debounces keystrokes before
//! calling in. Data flow per edit: validate against the column schema,
//! mutate the grid, recompute all formulas, snapshot into history.

use serde_json::{Map, Value};

use labgrid_core::{CellAddr, Selection};

use crate::cell::CellValue;
use crate::clipboard::Clipboard;
use crate::error::{CellError, GridError};
use crate::grid::{Grid, ImportedCell};
use crate::history::History;
use crate::schema::Schema;
use crate::validation::validate;

/// What happened to a single edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Value accepted and stored (possibly as a formula).
    Applied,
    /// Validation failed; the error and attempted value sit on the cell.
    Rejected(CellError),
}

pub struct Session {
    grid: Grid,
    history: History,
    clipboard: Option<Clipboard>,
}

impl Session {
    /// Open a session over previously saved records, padding the grid to
    /// `min_rows` display rows. History starts fresh at the loaded state.
    pub fn open(records: &[Map<String, Value>], schema: Schema, min_rows: usize) -> Self {
        let mut grid = Grid::from_records(records, schema, min_rows);
        grid.recompute();
        Self {
            history: History::new(grid.clone()),
            grid,
            clipboard: None,
        }
    }

    /// Open a blank session from schema defaults.
    pub fn open_blank(schema: Schema, rows: usize) -> Self {
        Self::open(&[], schema, rows)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Replace the whole grid from newly imported/saved data. Resets
    /// history; the previous session state is gone by contract.
    pub fn load(&mut self, records: &[Map<String, Value>], schema: Schema, min_rows: usize) {
        self.grid = Grid::from_records(records, schema, min_rows);
        self.grid.recompute();
        self.history.reset(self.grid.clone());
        self.clipboard = None;
    }

    /// Enter a raw value into one cell. Out-of-bounds coordinates are a
    /// caller bug and fail hard; everything else resolves to an outcome.
    pub fn edit(&mut self, row: usize, col: usize, raw: &str) -> Result<EditOutcome, GridError> {
        // Make sure the coordinates are valid before touching anything.
        self.grid.get(row, col)?;

        let column = match self.grid.schema().column(col) {
            Some(c) => c.clone(),
            None => {
                return Err(GridError::OutOfBounds {
                    row,
                    col,
                    rows: self.grid.rows(),
                    cols: self.grid.cols(),
                })
            }
        };

        let trimmed = raw.trim();
        if trimmed.starts_with('=') && !column.locked {
            let cell = self.grid.get_mut(row, col)?;
            cell.formula = Some(trimmed.to_string());
            cell.error = None;
        } else {
            match validate(raw, &column) {
                Ok(value) => {
                    let cell = self.grid.get_mut(row, col)?;
                    cell.value = value;
                    cell.formula = None;
                    cell.error = None;
                }
                Err(err) => {
                    // Locked cells are left untouched entirely; other
                    // failures keep the attempted text visible with the
                    // error attached.
                    if err != CellError::Locked {
                        let cell = self.grid.get_mut(row, col)?;
                        cell.value = CellValue::from_input(raw);
                        cell.formula = None;
                        cell.error = Some(err.clone());
                    }
                    self.grid.recompute();
                    self.history.record(&self.grid);
                    return Ok(EditOutcome::Rejected(err));
                }
            }
        }

        self.grid.recompute();
        self.history.record(&self.grid);
        Ok(EditOutcome::Applied)
    }

    /// Capture a selection into the session clipboard.
    pub fn copy(&mut self, selection: &Selection) {
        self.clipboard = Some(Clipboard::copy(&self.grid, selection));
    }

    /// Paste the clipboard anchored at `target`. All surviving cells are
    /// applied, formulas recomputed, and exactly one history entry is
    /// committed for the whole paste. Returns cells written.
    pub fn paste(&mut self, target: CellAddr) -> usize {
        let Some(clipboard) = self.clipboard.clone() else {
            return 0;
        };
        let applied = clipboard.paste_into(&mut self.grid, target);
        if applied > 0 {
            self.grid.recompute();
            self.history.record(&self.grid);
        }
        applied
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step the grid back one snapshot. Returns false at the oldest state.
    pub fn undo(&mut self) -> bool {
        if let Some(snapshot) = self.history.undo() {
            self.grid = snapshot.clone();
            true
        } else {
            false
        }
    }

    /// Step the grid forward one snapshot. Returns false at the newest.
    pub fn redo(&mut self) -> bool {
        if let Some(snapshot) = self.history.redo() {
            self.grid = snapshot.clone();
            true
        } else {
            false
        }
    }

    /// Apply a file import and commit it as one history entry.
    pub fn import(&mut self, cells: &[ImportedCell]) {
        self.grid.apply_import(cells);
        self.grid.recompute();
        self.history.record(&self.grid);
    }

    /// Occupied rows for the persistence collaborator.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.grid.to_records()
    }
}
