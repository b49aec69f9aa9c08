//! The grid store.
//!
//! A `Grid` is the fixed-size rectangular cell matrix behind one editing
//! session. Row/column counts never change for the life of the session;
//! anything that grows the grid (an import with more columns, say)
//! replaces it wholesale.
//!
//! Recompute policy: there is no dependency graph. On any edit every
//! formula cell is re-evaluated from scratch in row-major order against
//! the just-mutated grid. That is correct for the shallow, non-cyclic
//! formulas test forms use, and it is the contract to preserve.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use labgrid_core::addr::CellAddr;

use crate::cell::{Cell, CellStyle, CellType, CellValue};
use crate::error::{CellError, GridError};
use crate::formula::{self, CellLookup, ERROR_SENTINEL};
use crate::schema::Schema;

/// One populated cell from the file-import collaborator. Partial metadata
/// is the norm: no type means infer from the raw value, no style means
/// default style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedCell {
    pub row: usize,
    pub col: usize,
    pub value: String,
    pub cell_type: Option<CellType>,
    pub formula: Option<String>,
    pub style: Option<CellStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    schema: Schema,
}

impl CellLookup for Grid {
    fn cell_value(&self, row: usize, col: usize) -> CellValue {
        if row >= self.rows || col >= self.cols {
            return CellValue::Empty;
        }
        self.cells[row * self.cols + col].value.clone()
    }
}

impl Grid {
    /// Blank grid sized to the schema, one cell per (row, column).
    pub fn new(schema: Schema, rows: usize) -> Self {
        let cols = schema.len();
        let mut cells = Vec::with_capacity(rows * cols);
        for _ in 0..rows {
            for col in 0..cols {
                let cell_type = schema.column(col).map(|c| c.cell_type).unwrap_or_default();
                cells.push(Cell::typed(cell_type));
            }
        }
        Self { rows, cols, cells, schema }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&Cell, GridError> {
        let idx = self.index(row, col)?;
        Ok(&self.cells[idx])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell, GridError> {
        let idx = self.index(row, col)?;
        Ok(&mut self.cells[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), GridError> {
        let idx = self.index(row, col)?;
        self.cells[idx] = cell;
        Ok(())
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    // =========================================================================
    // Persistence collaborator interface
    // =========================================================================

    /// Materialize saved row-objects into a grid, padding with empty rows
    /// up to `min_rows` for display.
    pub fn from_records(records: &[Map<String, Value>], schema: Schema, min_rows: usize) -> Self {
        let rows = records.len().max(min_rows);
        let mut grid = Self::new(schema, rows);
        for (row, record) in records.iter().enumerate() {
            for col in 0..grid.cols {
                let Some(column) = grid.schema.column(col) else { continue };
                let Some(value) = record.get(&column.id) else { continue };
                let cell_value = json_to_cell_value(value);
                if !cell_value.is_empty() {
                    let idx = row * grid.cols + col;
                    grid.cells[idx].value = cell_value;
                }
            }
        }
        grid
    }

    /// Rows with at least one non-empty cell, each cell keyed by column id,
    /// values already coerced to their validated type.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        let mut records = Vec::new();
        for row in 0..self.rows {
            let mut record = Map::new();
            for col in 0..self.cols {
                let cell = &self.cells[row * self.cols + col];
                let Some(column) = self.schema.column(col) else { continue };
                match &cell.value {
                    CellValue::Empty => {}
                    CellValue::Number(n) => {
                        record.insert(column.id.clone(), serde_json::json!(n));
                    }
                    CellValue::Text(s) => {
                        record.insert(column.id.clone(), Value::String(s.clone()));
                    }
                }
            }
            if !record.is_empty() {
                records.push(record);
            }
        }
        records
    }

    // =========================================================================
    // File collaborator interface
    // =========================================================================

    /// Apply parsed file-import cells. Addresses beyond the grid bounds are
    /// clipped (skipped), missing metadata falls back to defaults. Import
    /// may write locked columns; only direct user input is barred there.
    pub fn apply_import(&mut self, cells: &[ImportedCell]) {
        for imported in cells {
            if !self.in_bounds(imported.row, imported.col) {
                continue;
            }
            let declared_type = imported.cell_type;
            let schema_type = self
                .schema
                .column(imported.col)
                .map(|c| c.cell_type)
                .unwrap_or_default();
            let idx = imported.row * self.cols + imported.col;
            let cell = &mut self.cells[idx];
            cell.value = CellValue::from_input(&imported.value);
            cell.formula = imported.formula.clone();
            cell.cell_type = declared_type.unwrap_or(schema_type);
            cell.style = imported.style.clone().unwrap_or_default();
            cell.error = None;
        }
    }

    /// (A1 label, display value) pairs for the occupied rectangular region,
    /// row-major. Consumed by the delimited-text/spreadsheet exporters.
    pub fn export_cells(&self) -> Vec<(String, String)> {
        let mut max_row = None;
        let mut max_col = None;
        for row in 0..self.rows {
            for col in 0..self.cols {
                if !self.cells[row * self.cols + col].is_empty() {
                    max_row = Some(max_row.map_or(row, |r: usize| r.max(row)));
                    max_col = Some(max_col.map_or(col, |c: usize| c.max(col)));
                }
            }
        }
        let (Some(max_row), Some(max_col)) = (max_row, max_col) else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity((max_row + 1) * (max_col + 1));
        for row in 0..=max_row {
            for col in 0..=max_col {
                let cell = &self.cells[row * self.cols + col];
                out.push((CellAddr::new(row, col).to_string(), cell.value.display()));
            }
        }
        out
    }

    // =========================================================================
    // Formula recompute
    // =========================================================================

    /// Re-evaluate every formula cell from scratch, row-major. A malformed
    /// formula marks its own cell with the `#ERROR` sentinel and never
    /// aborts the rest of the pass.
    pub fn recompute(&mut self) {
        for idx in 0..self.cells.len() {
            let Some(source) = self.cells[idx].formula.clone() else {
                continue;
            };
            let result =
                formula::parse(&source).and_then(|expr| formula::evaluate(&expr, &*self));
            let cell = &mut self.cells[idx];
            match result {
                Ok(n) => {
                    cell.value = CellValue::Number(n);
                    cell.error = None;
                }
                Err(e) => {
                    cell.value = CellValue::Text(ERROR_SENTINEL.to_string());
                    cell.error = Some(CellError::Formula(e.to_string()));
                }
            }
        }
    }
}

fn json_to_cell_value(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => CellValue::from_input(s),
        Value::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}
