// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board representation and manipulation

use crate::{Coord, Direction, GameError, MAX_BOARD_SIZE, MAX_TILE, MIN_BOARD_SIZE};

/// Square grid of tile values, 0 meaning empty
///
/// Cloning copies the cell storage, so a cloned board never aliases its source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Edge length
    size: usize,
    /// Row-major cells
    cells: Vec<u32>,
}

impl Board {
    /// Create a new empty board with the specified size
    pub fn new(size: usize) -> Result<Self, GameError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(GameError::InvalidBoardSize(size));
        }
        Ok(Self {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Build a board from explicit rows, validating shape and tile values
    pub fn from_rows(rows: &[&[u32]]) -> Result<Self, GameError> {
        let mut board = Self::new(rows.len())?;
        for (r, row) in rows.iter().enumerate() {
            if row.len() != board.size {
                return Err(GameError::MalformedGrid(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    board.size
                )));
            }
            for (c, &value) in row.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(GameError::InvalidTile { value });
                }
                board.cells[r * board.size + c] = value;
            }
        }
        Ok(board)
    }

    /// Build a board from a flat row-major cell list
    pub fn from_cells(size: usize, cells: Vec<u32>) -> Result<Self, GameError> {
        Self::new(size)?;
        if cells.len() != size * size {
            return Err(GameError::MalformedGrid(format!(
                "{} cells for a {}x{} board",
                cells.len(),
                size,
                size
            )));
        }
        if let Some(&value) = cells.iter().find(|v| !is_valid_tile(**v)) {
            return Err(GameError::InvalidTile { value });
        }
        Ok(Self { size, cells })
    }

    /// Get the size of the board
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the tile at the specified coordinate, `None` when off the board
    pub fn get(&self, coord: Coord) -> Option<u32> {
        if !coord.is_valid(self.size) {
            return None;
        }
        Some(self.cells[coord.index(self.size)])
    }

    /// Overwrite a cell. Returns false if the coordinate is off the board.
    pub fn set(&mut self, coord: Coord, value: u32) -> bool {
        if !coord.is_valid(self.size) {
            return false;
        }
        let idx = coord.index(self.size);
        self.cells[idx] = value;
        true
    }

    /// Row-major view of all cells
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Copy of the grid as nested rows
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.size).map(<[u32]>::to_vec).collect()
    }

    /// Read row `index` (horizontal moves) or column `index` (vertical moves), in board order
    pub fn line(&self, direction: Direction, index: usize) -> Vec<u32> {
        (0..self.size)
            .map(|i| self.cells[self.line_offset(direction, index, i)])
            .collect()
    }

    /// Write back a line previously read with [`Board::line`]
    pub fn write_line(&mut self, direction: Direction, index: usize, values: &[u32]) {
        debug_assert_eq!(values.len(), self.size);
        for (i, &value) in values.iter().enumerate() {
            let offset = self.line_offset(direction, index, i);
            self.cells[offset] = value;
        }
    }

    fn line_offset(&self, direction: Direction, line: usize, pos: usize) -> usize {
        if direction.is_horizontal() {
            line * self.size + pos
        } else {
            pos * self.size + line
        }
    }

    /// Coordinates of all empty cells, row-major
    pub fn empty_cells(&self) -> Vec<Coord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 0)
            .map(|(i, _)| Coord::new(i / self.size, i % self.size))
            .collect()
    }

    /// Count the non-empty tiles
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|v| **v != 0).count()
    }

    /// Sum of all tile values
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|v| u64::from(*v)).sum()
    }

    /// Highest tile on the board, 0 when empty
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Check whether any cell holds `value`
    pub fn contains(&self, value: u32) -> bool {
        self.cells.contains(&value)
    }

    /// Clear every cell
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|v| *v = 0);
    }
}

/// 0 or a power of two between 2 and `MAX_TILE`
fn is_valid_tile(value: u32) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_empty() {
        let board = Board::new(4).unwrap();
        assert_eq!(board.size(), 4);
        assert_eq!(board.empty_cells().len(), 16);
        assert_eq!(board.max_tile(), 0);
    }

    #[test]
    fn size_bounds_are_enforced() {
        assert_eq!(Board::new(1), Err(GameError::InvalidBoardSize(1)));
        assert_eq!(Board::new(9), Err(GameError::InvalidBoardSize(9)));
        assert!(Board::new(2).is_ok());
    }

    #[test]
    fn from_rows_rejects_bad_input() {
        assert!(matches!(
            Board::from_rows(&[&[2, 4], &[8]]),
            Err(GameError::MalformedGrid(_))
        ));
        assert_eq!(
            Board::from_rows(&[&[2, 3], &[0, 0]]),
            Err(GameError::InvalidTile { value: 3 })
        );
        assert_eq!(
            Board::from_rows(&[&[1, 0], &[0, 0]]),
            Err(GameError::InvalidTile { value: 1 })
        );
        assert_eq!(
            Board::from_cells(2, vec![1 << 31, 0, 0, 0]),
            Err(GameError::InvalidTile { value: 1 << 31 })
        );
        assert!(Board::from_rows(&[&[MAX_TILE, 0], &[0, 0]]).is_ok());
    }

    #[test]
    fn lines_follow_direction_axis() {
        let board = Board::from_rows(&[&[2, 4, 8], &[16, 32, 64], &[128, 256, 512]]).unwrap();
        assert_eq!(board.line(Direction::Left, 1), vec![16, 32, 64]);
        assert_eq!(board.line(Direction::Up, 2), vec![8, 64, 512]);

        let mut copy = board.clone();
        copy.write_line(Direction::Down, 0, &[0, 0, 4]);
        assert_eq!(copy.rows()[2][0], 4);
        assert_eq!(copy.rows()[0][0], 0);
        // The source board keeps its own storage
        assert_eq!(board.rows()[0][0], 2);
    }

    #[test]
    fn get_and_set_respect_bounds() {
        let mut board = Board::new(3).unwrap();
        assert!(board.set(Coord::new(2, 1), 8));
        assert_eq!(board.get(Coord::new(2, 1)), Some(8));
        assert!(!board.set(Coord::new(3, 0), 2));
        assert_eq!(board.get(Coord::new(0, 3)), None);
        assert!(board.contains(8));
        assert_eq!(board.tile_sum(), 8);
    }
}
