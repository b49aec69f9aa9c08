//! Column schema for test-record grids.
//!
//! Each grid column maps 1:1 by position to a `Column` entry describing its
//! value domain and entry constraints. The schema is authored by the form
//! designer and consumed by validation and by the UI collaborator.

use serde::{Deserialize, Serialize};

use crate::cell::CellType;

/// One column's contract: identity, value type, and entry constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Stable identifier used as the record key ("dry_density").
    pub id: String,
    /// Human-readable header ("Dry Density (pcf)").
    pub label: String,
    pub cell_type: CellType,
    /// Empty values are rejected.
    #[serde(default)]
    pub required: bool,
    /// Never mutated by user input or paste; only import and formula
    /// recomputation may write here.
    #[serde(default)]
    pub locked: bool,
    /// Lower bound for numeric columns.
    #[serde(default)]
    pub min: Option<f64>,
    /// Upper bound for numeric columns.
    #[serde(default)]
    pub max: Option<f64>,
}

impl Column {
    pub fn new(id: impl Into<String>, label: impl Into<String>, cell_type: CellType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            cell_type,
            required: false,
            locked: false,
            min: None,
            max: None,
        }
    }

    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, CellType::Text)
    }

    pub fn number(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, CellType::Number)
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// Ordered column set; position i describes grid column i.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn by_id(&self, id: &str) -> Option<(usize, &Column)> {
        self.columns.iter().enumerate().find(|(_, c)| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn is_locked(&self, index: usize) -> bool {
        self.column(index).map(|c| c.locked).unwrap_or(false)
    }
}
