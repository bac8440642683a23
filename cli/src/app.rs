// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive play loop over line-based input

use crate::commands::{parse_command, Command, HELP};
use crate::config::SUPPORTED_SIZES;
use crate::render;
use anyhow::Result;
use rand::Rng;
use std::io::{BufRead, Write};
use tiles_core::leaderboard::{format_entries, Scope};
use tiles_core::{GameEvent, Session};

/// Terminal bell, used as the merge sound cue
const BELL: &str = "\x07";

/// Name entered to skip saving a score
const SKIP_NAME: &str = "-";

/// Drives a session from text commands and writes feedback to `out`
pub struct App<R, O> {
    session: Session<R>,
    out: O,
    bell: bool,
}

impl<R: Rng, O: Write> App<R, O> {
    pub fn new(session: Session<R>, out: O, bell: bool) -> Self {
        Self { session, out, bell }
    }

    /// Run until `quit` or end of input
    pub fn run<I: BufRead>(&mut self, input: I) -> Result<()> {
        let mut lines = input.lines();

        writeln!(self.out, "{}", render::render_game(self.session.game()))?;
        writeln!(self.out, "Type 'help' for commands.")?;

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.out, "{}", e)?;
                    continue;
                }
            };

            let events = match command {
                Command::Quit => break,
                Command::Help => {
                    writeln!(self.out, "{}", HELP)?;
                    continue;
                }
                Command::Board => {
                    writeln!(self.out, "{}", render::render_game(self.session.game()))?;
                    continue;
                }
                Command::Top => {
                    let scope = Scope::Size(self.session.game().size());
                    write!(self.out, "{}", format_entries(scope, &self.session.leaderboard()))?;
                    continue;
                }
                Command::Undo => match self.session.undo() {
                    Ok(event) => vec![event],
                    Err(e) => {
                        writeln!(self.out, "{}", render::describe_undo_error(&e))?;
                        continue;
                    }
                },
                Command::Restart(size) => {
                    if let Some(size) = size.filter(|s| !SUPPORTED_SIZES.contains(s)) {
                        writeln!(self.out, "Invalid board size {}. Must be 3, 4, or 5.", size)?;
                        continue;
                    }
                    vec![self.session.restart(size)?]
                }
                Command::Move(direction) => self.session.play(direction),
                Command::Swipe(swipe) => {
                    let events = self.session.swipe(swipe);
                    if events.is_empty() {
                        writeln!(self.out, "Swipe too short.")?;
                        continue;
                    }
                    events
                }
            };

            if !self.handle_events(&events, &mut lines)? {
                break;
            }
        }

        writeln!(self.out, "Bye! Final score {}.", self.session.game().score())?;
        Ok(())
    }

    /// Print feedback and run the win / game-over flows.
    /// Returns false when input ran out inside a prompt.
    fn handle_events<L>(&mut self, events: &[GameEvent], lines: &mut L) -> Result<bool>
    where
        L: Iterator<Item = std::io::Result<String>>,
    {
        for event in events {
            if self.bell && matches!(event, GameEvent::Merged { .. }) {
                write!(self.out, "{}", BELL)?;
            }
            if let Some(text) = render::describe_event(event) {
                writeln!(self.out, "{}", text)?;
            }
        }
        writeln!(self.out, "{}", render::render_game(self.session.game()))?;

        if events.iter().any(|e| matches!(e, GameEvent::Won { .. })) {
            if !self.offer_leaderboard(lines)? {
                return Ok(false);
            }
            writeln!(self.out, "Keep going, or type 'restart' for a new game.")?;
        }

        if events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })) {
            if !self.offer_leaderboard(lines)? {
                return Ok(false);
            }
            let event = self.session.restart(None)?;
            if let Some(text) = render::describe_event(&event) {
                writeln!(self.out, "{}", text)?;
            }
            writeln!(self.out, "{}", render::render_game(self.session.game()))?;
        }

        Ok(true)
    }

    /// Ask for a name and record the current score unless skipped
    fn offer_leaderboard<L>(&mut self, lines: &mut L) -> Result<bool>
    where
        L: Iterator<Item = std::io::Result<String>>,
    {
        write!(
            self.out,
            "Name for the leaderboard (blank = Player, '{}' to skip): ",
            SKIP_NAME
        )?;
        self.out.flush()?;

        let name = match lines.next() {
            Some(line) => line?,
            None => return Ok(false),
        };
        if name.trim() == SKIP_NAME {
            return Ok(true);
        }

        let ranking = self.session.record_score(&name);
        let scope = Scope::Size(self.session.game().size());
        write!(self.out, "{}", format_entries(scope, &ranking))?;
        Ok(true)
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    /// Recover the output sink, e.g. to inspect it in tests
    pub fn into_output(self) -> O {
        self.out
    }
}
