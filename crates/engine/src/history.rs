//! Undo/Redo history for the grid.
//!
//! Full-snapshot model: each entry is a deep copy of the grid. Storage is
//! O(grid size) per entry, which is fine for session-scoped forms; cell
//! deltas are not worth the bookkeeping at these sizes. The cursor always
//! points at the snapshot matching the live grid, and any new edit
//! discards the redo tail (no branching history).

use crate::grid::Grid;

pub struct History {
    snapshots: Vec<Grid>,
    cursor: usize,
    max_entries: usize,
}

impl History {
    /// Start history with the freshly loaded grid as entry 0.
    pub fn new(initial: Grid) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            max_entries: 100,
        }
    }

    /// Commit a snapshot. A grid identical to the cursor entry is a no-op,
    /// so re-typing the same value never pollutes history.
    pub fn record(&mut self, grid: &Grid) {
        if self.snapshots[self.cursor] == *grid {
            return;
        }

        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(grid.clone());
        self.cursor += 1;

        // Limit history size
        if self.snapshots.len() > self.max_entries {
            self.snapshots.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step back one snapshot. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Grid> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one snapshot. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Grid> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Drop everything and restart from a newly loaded grid.
    pub fn reset(&mut self, initial: Grid) {
        self.snapshots = vec![initial];
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::schema::{Column, Schema};

    fn grid_with(value: f64) -> Grid {
        let mut grid = blank();
        grid.get_mut(0, 0).unwrap().value = CellValue::Number(value);
        grid
    }

    fn blank() -> Grid {
        Grid::new(Schema::new(vec![Column::number("v", "Value")]), 3)
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let mut history = History::new(blank());
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_record_then_undo_redo() {
        let mut history = History::new(blank());
        history.record(&grid_with(1.0));
        history.record(&grid_with(2.0));

        assert_eq!(history.undo(), Some(&grid_with(1.0)));
        assert_eq!(history.undo(), Some(&blank()));
        assert!(history.undo().is_none());

        assert_eq!(history.redo(), Some(&grid_with(1.0)));
        assert_eq!(history.redo(), Some(&grid_with(2.0)));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_noop_record_does_not_add_entry() {
        let mut history = History::new(blank());
        history.record(&grid_with(1.0));
        // Same state again: must not create a second entry.
        history.record(&grid_with(1.0));
        assert!(history.undo().is_some());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_new_edit_discards_redo_tail() {
        let mut history = History::new(blank());
        history.record(&grid_with(1.0));
        history.record(&grid_with(2.0));
        history.undo();
        history.record(&grid_with(9.0));

        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some(&grid_with(1.0)));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut history = History::new(blank());
        history.record(&grid_with(1.0));
        history.reset(grid_with(5.0));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut history = History::new(blank());
        for i in 0..150 {
            history.record(&grid_with(i as f64));
        }
        let mut undos = 0;
        while history.undo().is_some() {
            undos += 1;
        }
        assert_eq!(undos, 99);
    }
}
