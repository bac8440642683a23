// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.

use rand::Rng;
use tiles_core::{Board, Game, GameEvent, UndoError};

/// Narrowest cell, wide enough for 4-digit tiles
const MIN_CELL_WIDTH: usize = 4;

/// Render the score line and the grid
pub fn render_game<R: Rng>(game: &Game<R>) -> String {
    let mode = if game.is_infinite_mode() { "  (infinite)" } else { "" };
    format!(
        "Mode: {0}x{0}{1}\nScore: {2}   Best: {3}\n{4}",
        game.size(),
        mode,
        game.score(),
        game.best_score(),
        render_board(game.board())
    )
}

/// Render the board as a boxed grid
pub fn render_board(board: &Board) -> String {
    let width = board.max_tile().to_string().len().max(MIN_CELL_WIDTH);
    let separator = format!(
        "+{}\n",
        format!("{}+", "-".repeat(width + 2)).repeat(board.size())
    );

    let mut output = separator.clone();
    for row in board.rows() {
        output.push('|');
        for value in row {
            let cell = if value == 0 {
                String::new()
            } else {
                value.to_string()
            };
            output.push_str(&format!(" {:>width$} |", cell, width = width));
        }
        output.push('\n');
        output.push_str(&separator);
    }
    output
}

/// One line of feedback per event; `None` for events that need no text
pub fn describe_event(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::Moved { gained, .. } if *gained > 0 => Some(format!("+{}", gained)),
        GameEvent::Moved { .. } | GameEvent::Merged { .. } => None,
        GameEvent::Blocked { direction } => Some(format!("Nothing moves {}.", direction)),
        GameEvent::Won { score } => Some(format!("You reached 2048 with {} points!", score)),
        GameEvent::GameOver { score, best_score } => Some(format!(
            "Game over! Final score {} (best {}).",
            score, best_score
        )),
        GameEvent::Undone { remaining: Some(n) } => {
            Some(format!("Undone. {} undo(s) left this game.", n))
        }
        GameEvent::Undone { remaining: None } => Some("Undone.".to_string()),
        GameEvent::Restarted { size } => Some(format!("New {0}x{0} game.", size)),
    }
}

/// User-facing text for a refused undo
pub fn describe_undo_error(error: &UndoError) -> String {
    match error {
        UndoError::NothingToUndo => "No moves to undo.".to_string(),
        UndoError::QuotaExceeded { limit } => {
            format!("You can only undo {} step(s) per game.", limit)
        }
        UndoError::InvalidSnapshot(e) => format!("Undo failed: {}", e),
    }
}
