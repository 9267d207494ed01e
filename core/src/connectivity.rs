//! Flood fill shared by board queries and obstacle placement.

use std::collections::VecDeque;

use crate::{CellCoord, Direction};

/// Collects every cell reachable from `seed` through orthogonal neighbours for
/// which `is_open` holds, in breadth-first order.
///
/// The seed itself must be inside the grid and open, otherwise the result is
/// empty.
pub fn reachable_cells<F>(
    columns: u32,
    rows: u32,
    seed: CellCoord,
    mut is_open: F,
) -> Vec<CellCoord>
where
    F: FnMut(CellCoord) -> bool,
{
    let width = usize::try_from(columns).unwrap_or(0);
    let height = usize::try_from(rows).unwrap_or(0);
    let cell_count = width.checked_mul(height).unwrap_or(0);

    if cell_count == 0 || seed.column() >= columns || seed.row() >= rows || !is_open(seed) {
        return Vec::new();
    }

    let mut visited = vec![false; cell_count];
    let mut queue = VecDeque::new();
    let mut reached = Vec::new();

    if let Some(seed_index) = index(width, seed) {
        visited[seed_index] = true;
    }
    queue.push_back(seed);

    while let Some(cell) = queue.pop_front() {
        reached.push(cell);

        for direction in Direction::ALL {
            let Some(neighbor) = cell.step(direction) else {
                continue;
            };
            if neighbor.column() >= columns || neighbor.row() >= rows {
                continue;
            }
            let Some(neighbor_index) = index(width, neighbor) else {
                continue;
            };
            if visited[neighbor_index] || !is_open(neighbor) {
                continue;
            }

            visited[neighbor_index] = true;
            queue.push_back(neighbor);
        }
    }

    reached
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_grid_is_fully_reachable() {
        let reached = reachable_cells(4, 3, CellCoord::new(0, 0), |_| true);
        assert_eq!(reached.len(), 12);
        assert_eq!(reached[0], CellCoord::new(0, 0));
    }

    #[test]
    fn walls_split_the_grid() {
        let reached = reachable_cells(5, 3, CellCoord::new(0, 1), |cell| cell.column() != 2);
        assert_eq!(reached.len(), 6);
        assert!(reached.iter().all(|cell| cell.column() < 2));
    }

    #[test]
    fn closed_seed_reaches_nothing() {
        let reached = reachable_cells(3, 3, CellCoord::new(1, 1), |cell| {
            cell != CellCoord::new(1, 1)
        });
        assert!(reached.is_empty());
    }

    #[test]
    fn seed_outside_grid_reaches_nothing() {
        assert!(reachable_cells(3, 3, CellCoord::new(3, 0), |_| true).is_empty());
    }
}
