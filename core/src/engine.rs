// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board engine: moves, tile spawning and snapshots

use crate::{board::Board, rules, Coord, Direction, GameError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Probability that a spawned tile is a 2 rather than a 4
const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Owned snapshot of a game, used for undo and persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Board edge
    pub size: usize,
    /// Row-major tile values
    pub tiles: Vec<u32>,
    /// Score at capture time
    pub score: u64,
    /// Best score at capture time
    pub best_score: u64,
    /// Whether the move that produced this state merged anything
    pub merge_occurred: bool,
    /// Infinite mode flag
    #[serde(default)]
    pub infinite_mode: bool,
}

/// A single-player sliding-tile game with an injected random source.
///
/// All randomness (tile position and value on spawn) flows through `R`, so a
/// seeded or mock generator makes every game reproducible.
#[derive(Debug)]
pub struct Game<R = StdRng> {
    board: Board,
    score: u64,
    best_score: u64,
    merge_occurred: bool,
    last_gain: u64,
    last_merges: u32,
    infinite_mode: bool,
    rng: R,
}

impl Game<StdRng> {
    /// Create a game seeded from OS entropy
    pub fn new(size: usize) -> Result<Self, GameError> {
        Self::with_rng(size, StdRng::from_entropy())
    }

    /// Create a reproducible game from a fixed seed
    pub fn seeded(size: usize, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(size, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Game<R> {
    /// Create a game with the two opening tiles already placed
    pub fn with_rng(size: usize, rng: R) -> Result<Self, GameError> {
        let mut game = Self::from_board(Board::new(size)?, rng);
        game.reset();
        Ok(game)
    }

    /// Wrap an existing board without spawning anything
    pub fn from_board(board: Board, rng: R) -> Self {
        Self {
            board,
            score: 0,
            best_score: 0,
            merge_occurred: false,
            last_gain: 0,
            last_merges: 0,
            infinite_mode: false,
            rng,
        }
    }

    /// Start over on the current board size. The best score is kept.
    pub fn reset(&mut self) {
        self.board.clear();
        self.score = 0;
        self.merge_occurred = false;
        self.last_gain = 0;
        self.last_merges = 0;
        self.spawn();
        self.spawn();
        tracing::debug!(size = self.board.size(), "Board reset");
    }

    /// Start over on a board of a different size
    pub fn reset_with_size(&mut self, size: usize) -> Result<(), GameError> {
        self.board = Board::new(size)?;
        self.reset();
        Ok(())
    }

    /// Slide every line in `direction`, merging equal neighbours.
    ///
    /// Returns true if any cell changed. Only an effective move spawns a tile
    /// and can raise the best score.
    pub fn move_tiles(&mut self, direction: Direction) -> bool {
        let before = self.board.clone();
        self.merge_occurred = false;
        self.last_gain = 0;
        self.last_merges = 0;

        let toward_start = direction.toward_start();
        for index in 0..self.board.size() {
            let line = self.board.line(direction, index);
            let shift = rules::slide_line(&line, toward_start);
            self.board.write_line(direction, index, &shift.tiles);
            self.last_gain += shift.gained;
            self.last_merges += shift.merges;
        }

        self.score += self.last_gain;
        self.merge_occurred = self.last_merges > 0;

        let changed = self.board != before;
        if changed {
            self.spawn();
            if self.score > self.best_score {
                self.best_score = self.score;
            }
        }

        tracing::debug!(
            %direction,
            changed,
            gained = self.last_gain,
            merges = self.last_merges,
            score = self.score,
            "Move applied"
        );

        changed
    }

    /// Parse a direction token and play it; unknown tokens are rejected untouched
    pub fn apply_token(&mut self, token: &str) -> Result<bool, GameError> {
        let direction: Direction = token.parse()?;
        Ok(self.move_tiles(direction))
    }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell
    pub fn spawn(&mut self) -> Option<Coord> {
        let empty = self.board.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let coord = empty[self.rng.gen_range(0..empty.len())];
        let value = if self.rng.gen::<f64>() < SPAWN_TWO_PROBABILITY {
            2
        } else {
            4
        };
        self.board.set(coord, value);
        Some(coord)
    }

    /// Full board with no adjacent equal tiles
    pub fn is_terminal(&self) -> bool {
        rules::is_terminal(&self.board)
    }

    /// A 2048 tile is on the board
    pub fn check_win(&self) -> bool {
        rules::has_won(&self.board)
    }

    /// Deep copy of the current state
    pub fn snapshot(&self) -> GameState {
        GameState {
            size: self.board.size(),
            tiles: self.board.cells().to_vec(),
            score: self.score,
            best_score: self.best_score,
            merge_occurred: self.merge_occurred,
            infinite_mode: self.infinite_mode,
        }
    }

    /// Replace the board and score with a snapshot.
    ///
    /// The best score is a high-water mark and is never lowered by a restore.
    pub fn restore(&mut self, state: &GameState) -> Result<(), GameError> {
        self.board = Board::from_cells(state.size, state.tiles.clone())?;
        self.score = state.score;
        self.best_score = self.best_score.max(state.best_score);
        self.merge_occurred = state.merge_occurred;
        self.infinite_mode = state.infinite_mode;
        self.last_gain = 0;
        self.last_merges = 0;
        Ok(())
    }

    /// Current board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board edge
    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Seed the best score, e.g. from a leaderboard
    pub fn set_best_score(&mut self, best: u64) {
        self.best_score = self.best_score.max(best);
    }

    /// Whether the last move merged anything
    pub fn merge_occurred(&self) -> bool {
        self.merge_occurred
    }

    /// Points scored by the last move
    pub fn last_gain(&self) -> u64 {
        self.last_gain
    }

    /// Merges performed by the last move
    pub fn last_merges(&self) -> u32 {
        self.last_merges
    }

    pub fn is_infinite_mode(&self) -> bool {
        self.infinite_mode
    }

    pub fn set_infinite_mode(&mut self, enabled: bool) {
        self.infinite_mode = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_TILE;
    use rand::rngs::mock::StepRng;

    /// Always picks the first empty cell and spawns a 2
    fn first_cell_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    fn game_from(rows: &[&[u32]]) -> Game<StepRng> {
        Game::from_board(Board::from_rows(rows).unwrap(), first_cell_rng())
    }

    #[test]
    fn reset_places_two_small_tiles() {
        for seed in 0..32 {
            let game = Game::seeded(4, seed).unwrap();
            let tiles: Vec<u32> = game
                .board()
                .cells()
                .iter()
                .copied()
                .filter(|v| *v != 0)
                .collect();
            assert_eq!(tiles.len(), 2, "seed {}", seed);
            assert!(tiles.iter().all(|v| *v == 2 || *v == 4));
            assert_eq!(game.score(), 0);
            assert!(!game.merge_occurred());
        }
    }

    #[test]
    fn same_seed_same_game() {
        let mut a = Game::seeded(4, 7).unwrap();
        let mut b = Game::seeded(4, 7).unwrap();
        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            assert_eq!(a.move_tiles(direction), b.move_tiles(direction));
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn left_move_merges_and_spawns() {
        let mut game = game_from(&[
            &[2, 2, 4, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
        ]);
        assert!(game.move_tiles(Direction::Left));
        // Merged to [4, 4, 0, 0], then a 2 spawned in the first empty cell
        assert_eq!(game.board().rows()[0], vec![4, 4, 2, 0]);
        assert_eq!(game.score(), 4);
        assert_eq!(game.best_score(), 4);
        assert!(game.merge_occurred());
        assert_eq!(game.board().get(Coord::new(0, 2)), Some(2));
    }

    #[test]
    fn vertical_moves_use_columns() {
        let mut game = game_from(&[&[2, 0, 0], &[2, 0, 0], &[4, 0, 0]]);
        assert!(game.move_tiles(Direction::Down));
        let rows = game.board().rows();
        assert_eq!(rows[1][0], 4);
        assert_eq!(rows[2][0], 4);
        assert_eq!(game.score(), 4);
    }

    #[test]
    fn blocked_move_changes_nothing() {
        let mut game = game_from(&[&[2, 4], &[8, 16]]);
        let before = game.snapshot();
        assert!(!game.move_tiles(Direction::Left));
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.score(), 0);
        assert!(!game.merge_occurred());
    }

    #[test]
    fn unknown_token_is_an_error() {
        let mut game = game_from(&[&[2, 2], &[0, 0]]);
        let before = game.snapshot();
        assert_eq!(
            game.apply_token("sideways"),
            Err(GameError::InvalidDirection("sideways".to_string()))
        );
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.apply_token("left"), Ok(true));
    }

    #[test]
    fn max_tile_pair_is_a_blocked_move() {
        let mut game = game_from(&[&[MAX_TILE, MAX_TILE], &[0, 0]]);
        assert!(!game.move_tiles(Direction::Left));
        assert_eq!(game.board().cells(), &[MAX_TILE, MAX_TILE, 0, 0]);
        assert_eq!(game.score(), 0);

        let mut state = game.snapshot();
        state.tiles[0] = 1 << 31;
        assert_eq!(
            game.restore(&state),
            Err(GameError::InvalidTile { value: 1 << 31 })
        );
    }

    #[test]
    fn spawn_on_full_board_is_noop() {
        let mut game = game_from(&[&[2, 4], &[8, 16]]);
        assert_eq!(game.spawn(), None);
        assert_eq!(game.board().tile_count(), 4);
    }

    #[test]
    fn snapshot_is_independent() {
        let mut game = game_from(&[&[2, 2], &[0, 0]]);
        let snap = game.snapshot();
        game.move_tiles(Direction::Left);
        assert_eq!(snap.tiles, vec![2, 2, 0, 0]);
        assert_ne!(game.board().cells(), snap.tiles.as_slice());
    }

    #[test]
    fn restore_keeps_best_score() {
        let mut game = game_from(&[&[2, 2], &[4, 4]]);
        let snap = game.snapshot();
        game.move_tiles(Direction::Left);
        assert_eq!(game.score(), 12);

        game.restore(&snap).unwrap();
        assert_eq!(game.score(), 0);
        assert_eq!(game.best_score(), 12);
        assert_eq!(game.board().cells(), &[2, 2, 4, 4]);
    }

    #[test]
    fn reset_keeps_best_score() {
        let mut game = game_from(&[&[2, 2], &[0, 0]]);
        game.move_tiles(Direction::Right);
        assert_eq!(game.best_score(), 4);
        game.reset_with_size(3).unwrap();
        assert_eq!(game.size(), 3);
        assert_eq!(game.score(), 0);
        assert_eq!(game.best_score(), 4);
        assert_eq!(game.board().tile_count(), 2);
        assert!(game.reset_with_size(12).is_err());
    }
}
