//! Grid of passable and impassable cells surrounded by a wall.

use std::collections::BTreeSet;

use cop_and_robber_core::{reachable_cells, BoardLayout, CellCoord, Point};
use thiserror::Error;
use tracing::{debug, warn};

const MINIMUM_SIDE: u32 = 3;

/// State stored for every cell of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellData {
    /// Whether players may stand on the cell.
    pub passable: bool,
}

/// Failures raised while allocating a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The requested board has no interior.
    #[error("board must be at least 3x3, got {columns}x{rows}")]
    TooSmall {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

/// Dense row-major grid with an impassable outer wall.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    columns: u32,
    rows: u32,
    tile_length: f32,
    cells: Vec<CellData>,
    obstacles: BTreeSet<CellCoord>,
}

impl Board {
    /// Allocates a board from the layout and applies its obstacles.
    pub fn initialize(layout: &BoardLayout) -> Result<Self, BoardError> {
        let mut board = Self::initialize_without_obstacles(
            layout.columns(),
            layout.rows(),
            layout.tile_length(),
        )?;
        board.apply_obstacles(layout.obstacles().iter().copied());
        Ok(board)
    }

    /// Allocates a board whose interior is entirely passable.
    pub fn initialize_without_obstacles(
        columns: u32,
        rows: u32,
        tile_length: f32,
    ) -> Result<Self, BoardError> {
        if columns < MINIMUM_SIDE || rows < MINIMUM_SIDE {
            return Err(BoardError::TooSmall { columns, rows });
        }

        let capacity = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| BoardError::TooSmall { columns, rows })?;
        let mut cells = Vec::with_capacity(capacity);
        for row in 0..rows {
            for column in 0..columns {
                cells.push(CellData {
                    passable: CellCoord::new(column, row).is_interior_of(columns, rows),
                });
            }
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            cells,
            obstacles: BTreeSet::new(),
        })
    }

    /// Number of columns including the wall.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows including the wall.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a cell in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Retrieves the data stored for a cell, or `None` outside the grid.
    #[must_use]
    pub fn get_cell(&self, cell: CellCoord) -> Option<CellData> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether a player may stand on the cell.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.get_cell(cell).is_some_and(|data| data.passable)
    }

    /// Reports whether the cell belongs to the outer wall.
    #[must_use]
    pub fn is_border(&self, cell: CellCoord) -> bool {
        self.contains(cell) && !cell.is_interior_of(self.columns, self.rows)
    }

    /// Interior cells obstructed by obstacles.
    #[must_use]
    pub fn obstacles(&self) -> &BTreeSet<CellCoord> {
        &self.obstacles
    }

    /// Every cell inside the wall, regardless of obstacles, in row-major order.
    #[must_use]
    pub fn interior_cells(&self) -> Vec<CellCoord> {
        (1..self.rows.saturating_sub(1))
            .flat_map(|row| {
                (1..self.columns.saturating_sub(1)).map(move |column| CellCoord::new(column, row))
            })
            .collect()
    }

    /// Every passable cell in row-major order.
    #[must_use]
    pub fn passable_cells(&self) -> Vec<CellCoord> {
        self.interior_cells()
            .into_iter()
            .filter(|cell| self.is_passable(*cell))
            .collect()
    }

    /// Replaces the obstacle set.
    ///
    /// Listed interior cells become impassable and previously obstructed cells
    /// that are no longer listed become passable again. Border and
    /// out-of-range entries are ignored.
    pub fn apply_obstacles<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = CellCoord>,
    {
        for previous in std::mem::take(&mut self.obstacles) {
            self.set_passable(previous, true);
        }

        for cell in cells {
            if !cell.is_interior_of(self.columns, self.rows) {
                warn!(
                    column = cell.column(),
                    row = cell.row(),
                    "ignoring obstacle outside the board interior"
                );
                continue;
            }

            self.set_passable(cell, false);
            let _ = self.obstacles.insert(cell);
        }

        debug!(obstacles = self.obstacles.len(), "obstacles applied");
    }

    /// Centre of the cell in world units, or `None` outside the grid.
    #[must_use]
    pub fn cell_to_continuous_position(&self, cell: CellCoord) -> Option<Point> {
        if !self.contains(cell) {
            return None;
        }

        Some(Point {
            x: (cell.column() as f32 + 0.5) * self.tile_length,
            y: (cell.row() as f32 + 0.5) * self.tile_length,
        })
    }

    /// Every passable cell reachable from `seed`.
    #[must_use]
    pub fn reachable_from(&self, seed: CellCoord) -> Vec<CellCoord> {
        reachable_cells(self.columns, self.rows, seed, |cell| self.is_passable(cell))
    }

    /// Reports whether every passable cell can reach every other one.
    ///
    /// A board without passable cells counts as connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let passable = self.passable_cells();
        let Some(seed) = passable.first().copied() else {
            return true;
        };
        self.reachable_from(seed).len() == passable.len()
    }

    /// Reports whether two cells share a row or column with only passable
    /// cells strictly between them.
    #[must_use]
    pub fn has_clear_line_of_sight(&self, from: CellCoord, to: CellCoord) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }

        if from.row() == to.row() {
            let (low, high) = ordered(from.column(), to.column());
            ((low + 1)..high).all(|column| self.is_passable(CellCoord::new(column, from.row())))
        } else if from.column() == to.column() {
            let (low, high) = ordered(from.row(), to.row());
            ((low + 1)..high).all(|row| self.is_passable(CellCoord::new(from.column(), row)))
        } else {
            false
        }
    }

    fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn set_passable(&mut self, cell: CellCoord, passable: bool) {
        if let Some(index) = self.index(cell) {
            if let Some(data) = self.cells.get_mut(index) {
                data.passable = passable;
            }
        }
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_is_impassable_and_interior_open() {
        let board = Board::initialize_without_obstacles(5, 4, 1.0).expect("board");
        for row in 0..4 {
            for column in 0..5 {
                let cell = CellCoord::new(column, row);
                let interior = column > 0 && column < 4 && row > 0 && row < 3;
                assert_eq!(board.is_passable(cell), interior, "cell {cell:?}");
                assert_eq!(board.is_border(cell), !interior, "cell {cell:?}");
            }
        }
        assert_eq!(board.interior_cells().len(), 6);
    }

    #[test]
    fn reapplying_obstacles_restores_previous_cells() {
        let mut board = Board::initialize_without_obstacles(6, 6, 1.0).expect("board");
        board.apply_obstacles([CellCoord::new(2, 2), CellCoord::new(3, 2)]);
        assert!(!board.is_passable(CellCoord::new(2, 2)));

        board.apply_obstacles([CellCoord::new(3, 2)]);
        assert!(board.is_passable(CellCoord::new(2, 2)));
        assert!(!board.is_passable(CellCoord::new(3, 2)));
        assert_eq!(board.obstacles().len(), 1);
    }

    #[test]
    fn line_of_sight_requires_shared_axis() {
        let mut board = Board::initialize_without_obstacles(7, 7, 1.0).expect("board");
        assert!(board.has_clear_line_of_sight(CellCoord::new(1, 3), CellCoord::new(5, 3)));
        assert!(!board.has_clear_line_of_sight(CellCoord::new(1, 3), CellCoord::new(5, 4)));

        board.apply_obstacles([CellCoord::new(3, 3)]);
        assert!(!board.has_clear_line_of_sight(CellCoord::new(1, 3), CellCoord::new(5, 3)));
        assert!(board.has_clear_line_of_sight(CellCoord::new(3, 1), CellCoord::new(3, 2)));
    }
}
