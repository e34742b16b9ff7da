//! Dense tile storage shared by terrain generation, physics and navigation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BlockId;

/// Location of a single tile expressed as local column and row indices.
///
/// Indices are signed so neighbor arithmetic may step outside the grid; lookups
/// through [`TileGridView`] treat such coordinates as out of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: i32,
    row: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the tile. Row zero is the top of the world.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the coordinate displaced by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(
            self.column.saturating_add(columns),
            self.row.saturating_add(rows),
        )
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Failures raised when splicing grids of incompatible shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grids being joined do not share the same number of rows.
    #[error("cannot join grids with {left} and {right} rows")]
    RowMismatch {
        /// Rows in the receiving grid.
        left: u32,
        /// Rows in the grid being attached.
        right: u32,
    },
}

/// Owned, row-major grid of block identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    cells: Vec<BlockId>,
}

impl TileGrid {
    /// Creates a grid of the provided dimensions filled with [`BlockId::Empty`].
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            cells: vec![BlockId::Empty; cell_count(columns, rows)],
        }
    }

    /// Builds a grid from top-to-bottom column vectors.
    ///
    /// Columns shorter than `rows` are padded with [`BlockId::Empty`]; longer
    /// columns are truncated.
    #[must_use]
    pub fn from_columns(rows: u32, columns: &[Vec<BlockId>]) -> Self {
        let width = u32::try_from(columns.len()).unwrap_or(u32::MAX);
        let mut grid = Self::new(width, rows);
        for (column_index, column) in columns.iter().enumerate() {
            for (row_index, block) in column.iter().take(rows as usize).enumerate() {
                grid.cells[row_index * columns.len() + column_index] = *block;
            }
        }
        grid
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Block stored at the provided coordinate, if it lies inside the grid.
    #[must_use]
    pub fn get(&self, coord: TileCoord) -> Option<BlockId> {
        self.view().block(coord)
    }

    /// Overwrites the block at the provided coordinate.
    ///
    /// Returns `false` without mutating anything when the coordinate lies
    /// outside the grid.
    pub fn set(&mut self, coord: TileCoord, block: BlockId) -> bool {
        match index(self.columns, self.rows, coord) {
            Some(offset) => {
                self.cells[offset] = block;
                true
            }
            None => false,
        }
    }

    /// Copies a single column from top to bottom.
    #[must_use]
    pub fn column(&self, column: u32) -> Vec<BlockId> {
        if column >= self.columns {
            return Vec::new();
        }
        (0..self.rows)
            .map(|row| self.cells[(row * self.columns + column) as usize])
            .collect()
    }

    /// Captures a read-only view of the grid.
    #[must_use]
    pub fn view(&self) -> TileGridView<'_> {
        TileGridView::new(&self.cells, self.columns, self.rows)
    }

    /// Appends the columns of `other` to the right edge of the grid.
    pub fn append_right(&mut self, other: &TileGrid) -> Result<(), GridError> {
        self.splice(other, false)
    }

    /// Prepends the columns of `other` to the left edge of the grid.
    pub fn prepend_left(&mut self, other: &TileGrid) -> Result<(), GridError> {
        self.splice(other, true)
    }

    fn splice(&mut self, other: &TileGrid, other_first: bool) -> Result<(), GridError> {
        if self.rows != other.rows {
            return Err(GridError::RowMismatch {
                left: self.rows,
                right: other.rows,
            });
        }

        let width = self.columns.saturating_add(other.columns);
        let mut cells = Vec::with_capacity(cell_count(width, self.rows));
        for row in 0..self.rows as usize {
            let own = &self.cells[row * self.columns as usize..(row + 1) * self.columns as usize];
            let theirs =
                &other.cells[row * other.columns as usize..(row + 1) * other.columns as usize];
            if other_first {
                cells.extend_from_slice(theirs);
                cells.extend_from_slice(own);
            } else {
                cells.extend_from_slice(own);
                cells.extend_from_slice(theirs);
            }
        }

        self.columns = width;
        self.cells = cells;
        Ok(())
    }
}

/// Read-only view into a dense tile grid.
#[derive(Clone, Copy, Debug)]
pub struct TileGridView<'a> {
    cells: &'a [BlockId],
    columns: u32,
    rows: u32,
}

impl<'a> TileGridView<'a> {
    /// Captures a new view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [BlockId], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, coord: TileCoord) -> bool {
        index(self.columns, self.rows, coord).is_some()
    }

    /// Block stored at the provided coordinate, if it lies inside the grid.
    #[must_use]
    pub fn block(&self, coord: TileCoord) -> Option<BlockId> {
        index(self.columns, self.rows, coord).and_then(|offset| self.cells.get(offset).copied())
    }

    /// Reports whether the tile blocks movement. Out-of-bounds tiles are not solid.
    #[must_use]
    pub fn is_solid(&self, coord: TileCoord) -> bool {
        self.block(coord).is_some_and(BlockId::is_solid)
    }

    /// Reports whether the tile holds air.
    #[must_use]
    pub fn is_empty(&self, coord: TileCoord) -> bool {
        self.block(coord) == Some(BlockId::Empty)
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = BlockId> + 'a {
        self.cells.iter().copied()
    }
}

fn cell_count(columns: u32, rows: u32) -> usize {
    let count = u64::from(columns) * u64::from(rows);
    usize::try_from(count).unwrap_or(0)
}

fn index(columns: u32, rows: u32, coord: TileCoord) -> Option<usize> {
    let column = u32::try_from(coord.column()).ok()?;
    let row = u32::try_from(coord.row()).ok()?;
    if column >= columns || row >= rows {
        return None;
    }
    let width = usize::try_from(columns).ok()?;
    usize::try_from(row)
        .ok()?
        .checked_mul(width)?
        .checked_add(usize::try_from(column).ok()?)
}
