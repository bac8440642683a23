// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiles Core - Board Engine and Game Bookkeeping
//!
//! This crate provides the core game functionality including:
//! - N×N sliding-tile board representation
//! - Slide/merge rules and terminal detection
//! - Bounded undo history with a per-session quota
//! - Best-effort JSON leaderboard persistence
//! - A headless session controller that turns input into game events

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod board;
pub mod engine;
pub mod gesture;
pub mod history;
pub mod leaderboard;
pub mod rules;
pub mod session;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tile value that wins the game
pub const WIN_TILE: u32 = 2048;

/// Largest tile a board may hold; two of these never merge
pub const MAX_TILE: u32 = 1 << 30;

/// Smallest supported board edge
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest supported board edge
pub const MAX_BOARD_SIZE: usize = 8;

/// Board edge used when nothing else is configured
pub const DEFAULT_BOARD_SIZE: usize = 4;

/// Direction in which all tiles slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards row 0
    Up,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
    /// Towards the last column
    Right,
}

impl Direction {
    /// All four directions
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// True for moves that walk rows rather than columns
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when tiles pack against index 0 of each line
    pub fn toward_start(&self) -> bool {
        matches!(self, Direction::Left | Direction::Up)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(GameError::InvalidDirection(token.to_string())),
        }
    }
}

/// Board coordinate, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row index, 0 at the top
    pub row: usize,
    /// Column index, 0 at the left
    pub col: usize,
}

impl Coord {
    /// Create a new coordinate
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if coordinate is inside a board of given size
    pub fn is_valid(&self, board_size: usize) -> bool {
        self.row < board_size && self.col < board_size
    }

    /// Flat index into a row-major grid
    pub fn index(&self, board_size: usize) -> usize {
        self.row * board_size + self.col
    }
}

/// Game events emitted by a session in response to input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Tiles slid and a new tile spawned
    Moved {
        /// The direction played
        direction: Direction,
        /// Points scored by merges in this move
        gained: u64,
    },
    /// The move changed nothing
    Blocked {
        /// The direction played
        direction: Direction,
    },
    /// At least one merge happened (sound cue)
    Merged {
        /// Number of merges in the move
        count: u32,
    },
    /// A 2048 tile appeared for the first time this game
    Won {
        /// Score at the time of the win
        score: u64,
    },
    /// No moves remain
    GameOver {
        /// Final score
        score: u64,
        /// Best score of the session
        best_score: u64,
    },
    /// A previous state was restored
    Undone {
        /// Undos left in the session quota, if capped
        remaining: Option<u32>,
    },
    /// The board was reset
    Restarted {
        /// New board edge
        size: usize,
    },
}

/// Errors that can occur when building or driving a game
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The direction token is not one of up/down/left/right
    #[error("Invalid direction: {0:?}")]
    InvalidDirection(String),

    /// Board edge outside the supported range
    #[error("Invalid board size {0}")]
    InvalidBoardSize(usize),

    /// Tile value that is neither 0 nor a power of two >= 2
    #[error("Invalid tile value {value}")]
    InvalidTile {
        /// Offending value
        value: u32,
    },

    /// Grid rows are not square
    #[error("Malformed grid: {0}")]
    MalformedGrid(String),
}

pub use board::Board;
pub use engine::{Game, GameState};
pub use history::{History, UndoError};
pub use leaderboard::{LeaderboardEntry, LeaderboardStore, Leaderboards, Scope};
pub use session::Session;
