// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded undo history

use crate::{engine::GameState, GameError};
use std::collections::VecDeque;
use thiserror::Error;

/// Default number of snapshots kept
pub const DEFAULT_HISTORY_DEPTH: usize = 10;

/// Default number of undos allowed per game
pub const DEFAULT_UNDO_LIMIT: u32 = 3;

/// Why an undo request could not be honoured
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UndoError {
    /// No snapshot is available
    #[error("Nothing to undo")]
    NothingToUndo,

    /// The per-game undo quota is spent
    #[error("Undo limit of {limit} reached")]
    QuotaExceeded {
        /// Configured quota
        limit: u32,
    },

    /// The popped snapshot does not describe a valid board
    #[error("Snapshot could not be restored: {0}")]
    InvalidSnapshot(#[from] GameError),
}

/// LIFO stack of game snapshots.
///
/// The stack holds at most `depth` entries; pushing beyond that evicts the
/// oldest. Independently, `undo_limit` caps how many undos a single game may
/// use until [`History::clear`] is called.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<GameState>,
    depth: usize,
    undo_limit: Option<u32>,
    undos_used: u32,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH, Some(DEFAULT_UNDO_LIMIT))
    }
}

impl History {
    /// Create a history holding `depth` snapshots (at least one)
    pub fn new(depth: usize, undo_limit: Option<u32>) -> Self {
        let depth = depth.max(1);
        Self {
            snapshots: VecDeque::with_capacity(depth),
            depth,
            undo_limit,
            undos_used: 0,
        }
    }

    /// Record a snapshot, evicting the oldest if full
    pub fn push(&mut self, snapshot: GameState) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.depth {
            self.snapshots.pop_front();
        }
    }

    /// Remove and return the most recent snapshot, ignoring the quota
    pub fn pop(&mut self) -> Option<GameState> {
        self.snapshots.pop_back()
    }

    /// Pop the most recent snapshot and charge it against the undo quota
    pub fn undo(&mut self) -> Result<GameState, UndoError> {
        if self.snapshots.is_empty() {
            return Err(UndoError::NothingToUndo);
        }
        if let Some(limit) = self.undo_limit {
            if self.undos_used >= limit {
                return Err(UndoError::QuotaExceeded { limit });
            }
        }
        let snapshot = self.pop().ok_or(UndoError::NothingToUndo)?;
        self.undos_used += 1;
        Ok(snapshot)
    }

    /// Undos still available, `None` when unlimited
    pub fn remaining_undos(&self) -> Option<u32> {
        self.undo_limit
            .map(|limit| limit.saturating_sub(self.undos_used))
    }

    /// Drop all snapshots and reset the quota
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.undos_used = 0;
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(score: u64) -> GameState {
        GameState {
            size: 2,
            tiles: vec![2, 0, 0, 0],
            score,
            best_score: score,
            merge_occurred: false,
            infinite_mode: false,
        }
    }

    #[test]
    fn pop_is_lifo() {
        let mut history = History::new(10, None);
        history.push(state(1));
        history.push(state(2));
        assert_eq!(history.pop().map(|s| s.score), Some(2));
        assert_eq!(history.pop().map(|s| s.score), Some(1));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn depth_evicts_oldest() {
        let mut history = History::new(10, None);
        for score in 0..11 {
            history.push(state(score));
        }
        assert_eq!(history.len(), 10);
        let mut scores = Vec::new();
        while let Some(s) = history.pop() {
            scores.push(s.score);
        }
        assert_eq!(scores, (1..11).rev().collect::<Vec<_>>());
    }

    #[test]
    fn empty_undo_is_reported() {
        let mut history = History::default();
        assert_eq!(history.undo(), Err(UndoError::NothingToUndo));
        assert_eq!(history.remaining_undos(), Some(DEFAULT_UNDO_LIMIT));
    }

    #[test]
    fn quota_is_distinct_from_empty() {
        let mut history = History::new(10, Some(2));
        for score in 0..5 {
            history.push(state(score));
        }
        assert!(history.undo().is_ok());
        assert!(history.undo().is_ok());
        assert_eq!(history.remaining_undos(), Some(0));
        assert_eq!(history.undo(), Err(UndoError::QuotaExceeded { limit: 2 }));
        // The refused undo did not consume a snapshot
        assert_eq!(history.len(), 3);

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.remaining_undos(), Some(2));
    }
}
