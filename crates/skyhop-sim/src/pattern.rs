//! Rendering data the simulation only references: bitmaps and tiled patterns

use serde::{Deserialize, Serialize};
use skyhop_core::BitmapId;

/// An image asset known by path; loading it is the renderer's job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bitmap {
    pub path: String,
}

/// How a pattern is laid over its entity's rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Cells repeat at their natural size
    #[default]
    Tiled,
    /// The cell grid is stretched over the whole rectangle
    Stretched,
}

/// A `columns` × `rows` grid of cells. A cell value of 0 is empty, any other
/// value `n` draws `bitmaps[n - 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderingPattern {
    pub columns: u32,
    pub rows: u32,
    pub cells: Vec<u32>,
    pub bitmaps: Vec<BitmapId>,
    pub kind: PatternKind,
}

impl RenderingPattern {
    /// Bitmap drawn in a cell, if any
    pub fn cell_bitmap(&self, column: u32, row: u32) -> Option<BitmapId> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let cell = *self.cells.get((row * self.columns + column) as usize)?;
        if cell == 0 {
            return None;
        }
        self.bitmaps.get(cell as usize - 1).copied()
    }

    /// A pattern that draws exactly one bitmap in one cell
    pub fn single_bitmap(&self) -> Option<BitmapId> {
        if self.columns == 1 && self.rows == 1 && self.bitmaps.len() == 1 {
            self.cell_bitmap(0, 0)
        } else {
            None
        }
    }
}
