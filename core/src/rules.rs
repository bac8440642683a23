// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slide/merge rules and end-of-game checks

use crate::{board::Board, MAX_TILE, WIN_TILE};

/// Outcome of sliding a single row or column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineShift {
    /// Resulting line, same length as the input
    pub tiles: Vec<u32>,
    /// Sum of the tiles produced by merges
    pub gained: u64,
    /// Number of merges performed
    pub merges: u32,
}

/// Value produced by merging two `value` tiles, `None` past `MAX_TILE`
fn merged_value(value: u32) -> Option<u32> {
    value.checked_mul(2).filter(|m| *m <= MAX_TILE)
}

/// Slide one line towards index 0 (`toward_start`) or towards its end.
///
/// Equal neighbours are combined while scanning in the direction of travel.
/// A tile produced by a merge never merges again in the same pass, and
/// `MAX_TILE` pairs stay apart.
pub fn slide_line(line: &[u32], toward_start: bool) -> LineShift {
    let mut packed: Vec<u32> = line.iter().copied().filter(|v| *v != 0).collect();
    if !toward_start {
        packed.reverse();
    }

    let mut tiles = Vec::with_capacity(line.len());
    let mut gained = 0u64;
    let mut merges = 0u32;
    let mut i = 0;
    while i < packed.len() {
        let value = packed[i];
        let merged = merged_value(value).filter(|_| packed.get(i + 1) == Some(&value));
        if let Some(merged) = merged {
            tiles.push(merged);
            gained += u64::from(merged);
            merges += 1;
            i += 2;
        } else {
            tiles.push(value);
            i += 1;
        }
    }
    tiles.resize(line.len(), 0);

    if !toward_start {
        tiles.reverse();
    }

    LineShift {
        tiles,
        gained,
        merges,
    }
}

/// True when the board is full and no two orthogonal neighbours can merge
pub fn is_terminal(board: &Board) -> bool {
    let size = board.size();
    let cells = board.cells();

    if cells.contains(&0) {
        return false;
    }

    for row in 0..size {
        for col in 0..size {
            let value = cells[row * size + col];
            if merged_value(value).is_none() {
                continue;
            }
            if col + 1 < size && cells[row * size + col + 1] == value {
                return false;
            }
            if row + 1 < size && cells[(row + 1) * size + col] == value {
                return false;
            }
        }
    }

    true
}

/// True when a 2048 tile is anywhere on the board
pub fn has_won(board: &Board) -> bool {
    board.contains(WIN_TILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_pair_then_keeps_rest() {
        let shift = slide_line(&[2, 2, 4, 0], true);
        assert_eq!(shift.tiles, vec![4, 4, 0, 0]);
        assert_eq!(shift.gained, 4);
        assert_eq!(shift.merges, 1);
    }

    #[test]
    fn no_chain_merge_in_one_pass() {
        let shift = slide_line(&[0, 2, 2, 2], true);
        assert_eq!(shift.tiles, vec![4, 2, 0, 0]);
        assert_eq!(shift.gained, 4);

        let shift = slide_line(&[4, 4, 8, 0], true);
        assert_eq!(shift.tiles, vec![8, 8, 0, 0]);
    }

    #[test]
    fn toward_end_scans_from_the_far_side() {
        let shift = slide_line(&[2, 2, 2, 0], false);
        assert_eq!(shift.tiles, vec![0, 0, 2, 4]);
        assert_eq!(shift.gained, 4);

        let shift = slide_line(&[2, 2, 2, 2], false);
        assert_eq!(shift.tiles, vec![0, 0, 4, 4]);
        assert_eq!(shift.merges, 2);
    }

    #[test]
    fn packed_line_is_unchanged() {
        let shift = slide_line(&[2, 4, 8, 16], true);
        assert_eq!(shift.tiles, vec![2, 4, 8, 16]);
        assert_eq!(shift.gained, 0);
        assert_eq!(shift.merges, 0);
    }

    #[test]
    fn max_tiles_do_not_merge() {
        let shift = slide_line(&[MAX_TILE, MAX_TILE, 0, 0], true);
        assert_eq!(shift.tiles, vec![MAX_TILE, MAX_TILE, 0, 0]);
        assert_eq!(shift.merges, 0);

        let half = MAX_TILE / 2;
        let shift = slide_line(&[0, half, 0, half], false);
        assert_eq!(shift.tiles, vec![0, 0, 0, MAX_TILE]);
        assert_eq!(shift.gained, u64::from(MAX_TILE));

        let stuck = Board::from_rows(&[&[MAX_TILE, MAX_TILE], &[2, 4]]).unwrap();
        assert!(is_terminal(&stuck));
    }

    #[test]
    fn terminal_detection() {
        let stuck = Board::from_rows(&[&[2, 4], &[8, 16]]).unwrap();
        assert!(is_terminal(&stuck));

        let with_gap = Board::from_rows(&[&[2, 4], &[8, 0]]).unwrap();
        assert!(!is_terminal(&with_gap));

        let vertical_pair = Board::from_rows(&[&[2, 4], &[2, 16]]).unwrap();
        assert!(!is_terminal(&vertical_pair));

        let horizontal_pair = Board::from_rows(&[&[2, 4], &[16, 16]]).unwrap();
        assert!(!is_terminal(&horizontal_pair));
    }

    #[test]
    fn win_needs_exact_tile() {
        let board = Board::from_rows(&[&[1024, 0], &[0, 4096]]).unwrap();
        assert!(!has_won(&board));
        let board = Board::from_rows(&[&[2048, 0], &[0, 0]]).unwrap();
        assert!(has_won(&board));
    }
}
