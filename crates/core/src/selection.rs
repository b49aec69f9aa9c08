//! Rectangular selections.
//!
//! A selection is any two corner addresses; consumers normalize before
//! iterating so drag direction never matters.

use serde::{Deserialize, Serialize};

use crate::addr::CellAddr;

/// A rectangular block of cells, stored as the two corners the user
/// anchored and extended from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: CellAddr,
    pub extent: CellAddr,
}

impl Selection {
    pub fn new(anchor: CellAddr, extent: CellAddr) -> Self {
        Self { anchor, extent }
    }

    /// A single-cell selection.
    pub fn cell(addr: CellAddr) -> Self {
        Self { anchor: addr, extent: addr }
    }

    /// Top-left and bottom-right corners regardless of drag direction.
    pub fn normalized(&self) -> (CellAddr, CellAddr) {
        let top = self.anchor.row.min(self.extent.row);
        let bottom = self.anchor.row.max(self.extent.row);
        let left = self.anchor.col.min(self.extent.col);
        let right = self.anchor.col.max(self.extent.col);
        (CellAddr::new(top, left), CellAddr::new(bottom, right))
    }

    pub fn rows(&self) -> usize {
        let (top, bottom) = self.normalized();
        bottom.row - top.row + 1
    }

    pub fn cols(&self) -> usize {
        let (top, bottom) = self.normalized();
        bottom.col - top.col + 1
    }

    pub fn contains(&self, addr: CellAddr) -> bool {
        let (top, bottom) = self.normalized();
        addr.row >= top.row && addr.row <= bottom.row && addr.col >= top.col && addr.col <= bottom.col
    }

    /// Iterate all addresses in the rectangle, row-major.
    pub fn iter(&self) -> impl Iterator<Item = CellAddr> {
        let (top, bottom) = self.normalized();
        (top.row..=bottom.row)
            .flat_map(move |row| (top.col..=bottom.col).map(move |col| CellAddr::new(row, col)))
    }
}
