pub mod addr;
pub mod selection;

pub use addr::CellAddr;
pub use selection::Selection;
