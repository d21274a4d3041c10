//! Breadth-first reachability used by the wall placement rules.

use std::collections::VecDeque;

use wallbound_core::CellCoord;

/// Reports whether a token at `start` can still reach any cell of
/// `goal_row` through cells the provided predicate leaves unblocked.
///
/// The search walks cardinal neighbors only; the start cell itself is
/// never treated as blocked because a token already occupies it.
pub(crate) fn reaches_row<F>(
    columns: u32,
    rows: u32,
    start: CellCoord,
    goal_row: u32,
    mut is_blocked: F,
) -> bool
where
    F: FnMut(CellCoord) -> bool,
{
    if start.column() >= columns || start.row() >= rows || goal_row >= rows {
        return false;
    }

    if start.row() == goal_row {
        return true;
    }

    let width = usize::try_from(columns).unwrap_or(0);
    let height = usize::try_from(rows).unwrap_or(0);
    let Some(cell_count) = width.checked_mul(height) else {
        return false;
    };

    let mut visited = vec![false; cell_count];
    let mut queue = VecDeque::new();

    if let Some(start_index) = index(width, start) {
        visited[start_index] = true;
        queue.push_back(start);
    }

    while let Some(cell) = queue.pop_front() {
        for neighbor in neighbors(cell, columns, rows) {
            let Some(neighbor_index) = index(width, neighbor) else {
                continue;
            };
            if visited[neighbor_index] || is_blocked(neighbor) {
                continue;
            }
            if neighbor.row() == goal_row {
                return true;
            }
            visited[neighbor_index] = true;
            queue.push_back(neighbor);
        }
    }

    false
}

fn neighbors(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < columns {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < rows {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
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
    fn open_board_always_reaches_the_goal_row() {
        assert!(reaches_row(5, 5, CellCoord::new(2, 4), 0, |_| false));
    }

    #[test]
    fn a_full_row_of_walls_cuts_the_board_in_half() {
        let blocked_row = 2;
        let reachable = reaches_row(5, 5, CellCoord::new(2, 4), 0, |cell| {
            cell.row() == blocked_row
        });
        assert!(!reachable, "no gap remains in the blocking row");
    }

    #[test]
    fn a_gap_in_the_blocking_row_keeps_the_goal_reachable() {
        let reachable = reaches_row(5, 5, CellCoord::new(2, 4), 0, |cell| {
            cell.row() == 2 && cell.column() != 4
        });
        assert!(reachable, "the search must route through the gap");
    }

    #[test]
    fn standing_on_the_goal_row_counts_as_reaching_it() {
        assert!(reaches_row(3, 3, CellCoord::new(1, 0), 0, |_| true));
    }

    #[test]
    fn out_of_bounds_start_is_never_connected() {
        assert!(!reaches_row(3, 3, CellCoord::new(9, 9), 0, |_| false));
    }
}
