// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game session: the glue between player input and the board engine
//!
//! A session owns one game, its undo history and a handle on the leaderboard
//! file. Front ends feed it directions or swipes and render the events it
//! returns; nothing here touches the terminal or the screen.

use crate::engine::Game;
use crate::gesture::{self, Swipe, DEFAULT_SWIPE_THRESHOLD};
use crate::history::{History, UndoError, DEFAULT_HISTORY_DEPTH, DEFAULT_UNDO_LIMIT};
use crate::leaderboard::{LeaderboardEntry, LeaderboardStore, Scope};
use crate::{Direction, GameError, GameEvent};
use rand::rngs::StdRng;
use rand::Rng;
use uuid::Uuid;

/// Tunables for a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Snapshots kept for undo
    pub history_depth: usize,
    /// Undos allowed per game, `None` for unlimited
    pub undo_limit: Option<u32>,
    /// Minimum swipe length
    pub swipe_threshold: f32,
    /// Keep playing past 2048 without announcing a win
    pub infinite_mode: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            undo_limit: Some(DEFAULT_UNDO_LIMIT),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            infinite_mode: false,
        }
    }
}

/// One player's game plus undo and leaderboard bookkeeping
#[derive(Debug)]
pub struct Session<R = StdRng> {
    id: Uuid,
    game: Game<R>,
    history: History,
    store: LeaderboardStore,
    options: SessionOptions,
    win_announced: bool,
    span: tracing::Span,
}

impl Session<StdRng> {
    /// Start a session on a freshly dealt, entropy-seeded board
    pub fn new(
        size: usize,
        store: LeaderboardStore,
        options: SessionOptions,
    ) -> Result<Self, GameError> {
        Ok(Self::with_game(Game::new(size)?, store, options))
    }
}

impl<R: Rng> Session<R> {
    /// Start a session around an existing game
    pub fn with_game(mut game: Game<R>, store: LeaderboardStore, options: SessionOptions) -> Self {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("session", id = %id);
        game.set_infinite_mode(options.infinite_mode);
        let history = History::new(options.history_depth, options.undo_limit);

        span.in_scope(|| {
            tracing::info!(
                size = game.size(),
                infinite = options.infinite_mode,
                "Session started"
            );
        });

        Self {
            id,
            game,
            history,
            store,
            options,
            win_announced: false,
            span,
        }
    }

    /// Play one move.
    ///
    /// The pre-move state is pushed onto the history before every attempt, so
    /// an undo always returns to the state just before the latest attempt.
    pub fn play(&mut self, direction: Direction) -> Vec<GameEvent> {
        let _guard = self.span.enter();
        let mut events = Vec::new();

        self.history.push(self.game.snapshot());

        if self.game.move_tiles(direction) {
            events.push(GameEvent::Moved {
                direction,
                gained: self.game.last_gain(),
            });
            if self.game.merge_occurred() {
                events.push(GameEvent::Merged {
                    count: self.game.last_merges(),
                });
            }
            if !self.options.infinite_mode && !self.win_announced && self.game.check_win() {
                self.win_announced = true;
                tracing::info!(score = self.game.score(), "Reached the winning tile");
                events.push(GameEvent::Won {
                    score: self.game.score(),
                });
            }
        } else {
            events.push(GameEvent::Blocked { direction });
        }

        if self.game.is_terminal() {
            tracing::info!(
                score = self.game.score(),
                best = self.game.best_score(),
                "Game over"
            );
            events.push(GameEvent::GameOver {
                score: self.game.score(),
                best_score: self.game.best_score(),
            });
        }

        events
    }

    /// Parse and play a direction token
    pub fn play_token(&mut self, token: &str) -> Result<Vec<GameEvent>, GameError> {
        let direction: Direction = token.parse()?;
        Ok(self.play(direction))
    }

    /// Play a swipe; swipes below the threshold produce no events and no snapshot
    pub fn swipe(&mut self, swipe: Swipe) -> Vec<GameEvent> {
        match gesture::swipe_direction(swipe, self.options.swipe_threshold) {
            Some(direction) => self.play(direction),
            None => {
                tracing::debug!(dx = swipe.dx, dy = swipe.dy, "Swipe ignored");
                Vec::new()
            }
        }
    }

    /// Restore the state before the most recent move attempt
    pub fn undo(&mut self) -> Result<GameEvent, UndoError> {
        let _guard = self.span.enter();
        let snapshot = match self.history.undo() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!("Undo refused: {}", e);
                return Err(e);
            }
        };
        self.game.restore(&snapshot)?;
        let remaining = self.history.remaining_undos();
        tracing::debug!(score = self.game.score(), ?remaining, "Undo applied");
        Ok(GameEvent::Undone { remaining })
    }

    /// Deal a new board, optionally changing size; history and undo quota reset
    pub fn restart(&mut self, size: Option<usize>) -> Result<GameEvent, GameError> {
        let _guard = self.span.enter();
        match size {
            Some(size) => self.game.reset_with_size(size)?,
            None => self.game.reset(),
        }
        self.history.clear();
        self.win_announced = false;
        tracing::info!(size = self.game.size(), "Game restarted");
        Ok(GameEvent::Restarted {
            size: self.game.size(),
        })
    }

    /// Save the current score for this board size (and the all-sizes ranking).
    /// Returns the updated ranking for this board size.
    pub fn record_score(&self, name: &str) -> Vec<LeaderboardEntry> {
        let _guard = self.span.enter();
        let score = self.game.score();
        self.store.add(name, score, Scope::Global);
        self.store.add(name, score, Scope::Size(self.game.size()))
    }

    /// Ranking for this board size
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.store.entries(Scope::Size(self.game.size()))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn store(&self) -> &LeaderboardStore {
        &self.store
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }
}
