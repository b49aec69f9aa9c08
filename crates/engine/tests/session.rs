//! End-to-end session behavior: round trips, undo/redo chains, paste
//! interactions with locked columns and grid edges.

use labgrid_core::{CellAddr, Selection};
use labgrid_engine::{CellValue, Column, EditOutcome, Grid, Schema, Session};

fn proctor_schema() -> Schema {
    Schema::new(vec![
        Column::text("sample_id", "Sample").with_required(true),
        Column::number("wet_density", "Wet Density (pcf)"),
        Column::number("moisture", "Moisture (%)").with_bounds(Some(0.0), Some(100.0)),
        Column::number("dry_density", "Dry Density (pcf)").with_locked(true),
    ])
}

#[test]
fn records_round_trip_restricted_to_occupied_rows() {
    let mut session = Session::open_blank(proctor_schema(), 15);
    session.edit(0, 0, "S-101").unwrap();
    session.edit(0, 1, "128.6").unwrap();
    session.edit(0, 2, "11.2").unwrap();
    session.edit(7, 0, "S-102").unwrap();

    let records = session.records();
    assert_eq!(records.len(), 2);

    let reloaded = Grid::from_records(&records, proctor_schema(), 15);
    assert_eq!(reloaded.to_records(), records);
    assert_eq!(reloaded.rows(), 15);
}

#[test]
fn recompute_after_any_edit_is_idempotent() {
    let mut session = Session::open_blank(proctor_schema(), 10);
    session.edit(0, 1, "120").unwrap();
    session.edit(1, 1, "124").unwrap();
    session.edit(9, 1, "=AVERAGE(B1:B2)").unwrap();

    let before = session.grid().clone();
    let mut again = before.clone();
    again.recompute();
    assert_eq!(again, before);
}

#[test]
fn undo_n_then_redo_n_restores_exact_state() {
    let mut session = Session::open_blank(proctor_schema(), 10);
    let edits = [
        (0usize, 0usize, "S-1"),
        (0, 1, "120.5"),
        (0, 2, "9.8"),
        (1, 0, "S-2"),
        (1, 1, "119.1"),
    ];
    for (row, col, value) in edits {
        session.edit(row, col, value).unwrap();
    }
    let final_state = session.grid().clone();

    for _ in 0..edits.len() {
        assert!(session.undo());
    }
    // Back at the pristine blank grid; one more undo is a no-op.
    assert!(session.records().is_empty());
    assert!(!session.undo());

    for _ in 0..edits.len() {
        assert!(session.redo());
    }
    assert_eq!(*session.grid(), final_state);
    assert!(!session.redo());
}

#[test]
fn paste_over_locked_column_updates_only_unlocked_cells() {
    let mut session = Session::open_blank(proctor_schema(), 10);
    session.edit(0, 1, "120").unwrap();
    session.edit(0, 2, "10").unwrap();
    // Column D (dry_density) is locked; put a value there via the grid's
    // import path, which is allowed to write locked columns.
    session.import(&[labgrid_engine::ImportedCell {
        row: 0,
        col: 3,
        value: "109.1".into(),
        cell_type: None,
        formula: None,
        style: None,
    }]);

    // Copy B1:D1 and paste onto row 3.
    session.copy(&Selection::new(CellAddr::new(0, 1), CellAddr::new(0, 3)));
    let applied = session.paste(CellAddr::new(2, 1));

    assert_eq!(applied, 2);
    assert_eq!(session.grid().get(2, 1).unwrap().value, CellValue::Number(120.0));
    assert_eq!(session.grid().get(2, 2).unwrap().value, CellValue::Number(10.0));
    // Locked destination stays empty.
    assert_eq!(session.grid().get(2, 3).unwrap().value, CellValue::Empty);
}

#[test]
fn paste_commits_exactly_one_history_entry() {
    let mut session = Session::open_blank(proctor_schema(), 10);
    session.edit(0, 1, "120").unwrap();
    session.edit(1, 1, "124").unwrap();

    session.copy(&Selection::new(CellAddr::new(0, 1), CellAddr::new(1, 1)));
    session.paste(CellAddr::new(4, 1));

    // One undo removes the whole paste, not one cell of it.
    assert!(session.undo());
    assert_eq!(session.grid().get(4, 1).unwrap().value, CellValue::Empty);
    assert_eq!(session.grid().get(5, 1).unwrap().value, CellValue::Empty);
    // And the pre-paste edits are still there.
    assert_eq!(session.grid().get(0, 1).unwrap().value, CellValue::Number(120.0));
}

#[test]
fn paste_clipped_at_bottom_edge_applies_in_bounds_cells_only() {
    let mut session = Session::open_blank(proctor_schema(), 10);
    session.edit(0, 1, "1").unwrap();
    session.edit(0, 2, "2").unwrap();
    session.edit(1, 1, "3").unwrap();
    session.edit(1, 2, "4").unwrap();

    // 2x2 block pasted anchored at the last row: bottom half falls off.
    session.copy(&Selection::new(CellAddr::new(0, 1), CellAddr::new(1, 2)));
    let applied = session.paste(CellAddr::new(9, 1));

    assert_eq!(applied, 2);
    assert_eq!(session.grid().get(9, 1).unwrap().value, CellValue::Number(1.0));
    assert_eq!(session.grid().get(9, 2).unwrap().value, CellValue::Number(2.0));
}

#[test]
fn empty_clipboard_paste_is_a_noop() {
    let mut session = Session::open_blank(proctor_schema(), 10);
    assert_eq!(session.paste(CellAddr::new(0, 0)), 0);
    assert!(!session.can_undo());
}

#[test]
fn absurdly_long_cell_reference_degrades_to_error_marker() {
    let mut session = Session::open_blank(proctor_schema(), 10);
    session.edit(0, 1, "120").unwrap();
    // A reference with more letters than any column index can hold must
    // end up as the error sentinel on that cell, not abort recompute.
    session.edit(1, 1, "=ZZZZZZZZZZZZZZZZ1 + 1").unwrap();

    let cell = session.grid().get(1, 1).unwrap();
    assert_eq!(cell.value, CellValue::Text("#ERROR".into()));
    assert!(cell.error.is_some());
    // The rest of the grid is untouched and still editable.
    assert_eq!(session.grid().get(0, 1).unwrap().value, CellValue::Number(120.0));
    session.edit(2, 1, "=B1 * 2").unwrap();
    assert_eq!(session.grid().get(2, 1).unwrap().value, CellValue::Number(240.0));
}

#[test]
fn rejected_edits_do_not_block_subsequent_valid_ones() {
    let mut session = Session::open_blank(proctor_schema(), 10);
    let outcome = session.edit(0, 2, "140").unwrap();
    assert!(matches!(outcome, EditOutcome::Rejected(_)));

    // The bad value is visible with its error, and editing again fixes it.
    assert!(session.grid().get(0, 2).unwrap().error.is_some());
    session.edit(0, 2, "14.5").unwrap();
    let cell = session.grid().get(0, 2).unwrap();
    assert_eq!(cell.value, CellValue::Number(14.5));
    assert!(cell.error.is_none());
}
