pub mod cell;
pub mod clipboard;
pub mod error;
pub mod formula;
pub mod grid;
pub mod history;
pub mod schema;
pub mod session;
pub mod validation;

pub use cell::{Cell, CellStyle, CellType, CellValue};
pub use clipboard::Clipboard;
pub use error::{CellError, FormulaError, GridError};
pub use grid::{Grid, ImportedCell};
pub use history::History;
pub use schema::{Column, Schema};
pub use session::{EditOutcome, Session};
