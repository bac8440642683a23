// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of interactive commands

use anyhow::{anyhow, Result};
use tiles_core::gesture::Swipe;
use tiles_core::Direction;

pub const HELP: &str = "\
Commands:
  w/a/s/d, up/down/left/right   slide tiles
  swipe <dx> <dy>               slide by a swipe vector (screen coordinates)
  undo                          restore the previous state
  restart [size]                start a new game, optionally on a 3, 4 or 5 board
  board                         show the board again
  top                           show the leaderboard for this size
  help                          show this text
  quit                          leave the game";

/// A single line of player input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move(Direction),
    Swipe(Swipe),
    Undo,
    Restart(Option<usize>),
    Board,
    Top,
    Help,
    Quit,
}

/// Parse a command line. Single-letter moves are WASD; other moves are spelled out.
/// Unknown input is an error, never a move.
pub fn parse_command(input: &str) -> Result<Command> {
    let input = input.trim().to_lowercase();
    let mut parts = input.split_whitespace();
    let head = parts
        .next()
        .ok_or_else(|| anyhow!("Empty command. Type 'help' for a list."))?;
    let args: Vec<&str> = parts.collect();

    let command = match head {
        "w" => Command::Move(Direction::Up),
        "a" => Command::Move(Direction::Left),
        "s" => Command::Move(Direction::Down),
        "d" => Command::Move(Direction::Right),
        "swipe" => {
            let [dx, dy] = args.as_slice() else {
                return Err(anyhow!("Usage: swipe <dx> <dy>"));
            };
            let dx: f32 = dx.parse().map_err(|_| anyhow!("Invalid dx: {}", dx))?;
            let dy: f32 = dy.parse().map_err(|_| anyhow!("Invalid dy: {}", dy))?;
            return Ok(Command::Swipe(Swipe::new(dx, dy)));
        }
        "undo" | "z" => Command::Undo,
        "restart" | "new" => match args.first() {
            Some(size) => Command::Restart(Some(
                size.parse()
                    .map_err(|_| anyhow!("Invalid board size: {}", size))?,
            )),
            None => Command::Restart(None),
        },
        "board" => Command::Board,
        "top" | "leaderboard" => Command::Top,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Move(
            other
                .parse::<Direction>()
                .map_err(|e| anyhow!("{}. Type 'help' for a list.", e))?,
        ),
    };

    if !args.is_empty() && !matches!(command, Command::Restart(_)) {
        return Err(anyhow!("'{}' takes no arguments", head));
    }
    Ok(command)
}
