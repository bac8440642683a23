// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leaderboard persistence
//!
//! Scores live in a single JSON file. Every read goes back to disk and every
//! write replaces the whole file through a temporary file and a rename. Any
//! failure to read or write is logged and treated as "no data" so a broken
//! file never interrupts a game.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Entries kept per scope
pub const MAX_ENTRIES: usize = 10;

/// Name used when the player leaves the name blank
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// File name used inside a data directory
pub const LEADERBOARD_FILE: &str = "leaderboards.json";

/// A single recorded score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player name
    pub name: String,
    /// Final score
    pub score: u64,
    /// When the score was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl LeaderboardEntry {
    /// Create an entry stamped with the current time
    pub fn new(name: &str, score: u64) -> Self {
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            trimmed
        };
        Self {
            name: name.to_string(),
            score,
            recorded_at: Some(Utc::now()),
        }
    }
}

/// Partition of the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Scores from every board size
    Global,
    /// Scores for one board edge
    Size(usize),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("all sizes"),
            Scope::Size(size) => write!(f, "{}x{}", size, size),
        }
    }
}

/// Every scope's entries, as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboards {
    /// Unscoped entries
    #[serde(default)]
    pub global: Vec<LeaderboardEntry>,
    /// Entries keyed by board edge
    #[serde(default)]
    pub by_size: BTreeMap<usize, Vec<LeaderboardEntry>>,
}

impl Leaderboards {
    /// Entries of one scope, best first
    pub fn entries(&self, scope: Scope) -> &[LeaderboardEntry] {
        match scope {
            Scope::Global => &self.global,
            Scope::Size(size) => self.by_size.get(&size).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Insert an entry, keeping the scope sorted and capped
    pub fn insert(&mut self, scope: Scope, entry: LeaderboardEntry) -> &[LeaderboardEntry] {
        let list = match scope {
            Scope::Global => &mut self.global,
            Scope::Size(size) => self.by_size.entry(size).or_default(),
        };
        list.push(entry);
        rank(list);
        list
    }

    /// True when no scope holds an entry
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.by_size.values().all(Vec::is_empty)
    }

    /// Re-establish ordering and caps on data read from disk
    fn normalize(&mut self) {
        rank(&mut self.global);
        self.by_size.values_mut().for_each(rank);
    }
}

/// Stable sort by score descending, then cap
fn rank(list: &mut Vec<LeaderboardEntry>) {
    list.sort_by(|a, b| b.score.cmp(&a.score));
    list.truncate(MAX_ENTRIES);
}

/// File-backed leaderboard with best-effort persistence
#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by [`LEADERBOARD_FILE`] inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(LEADERBOARD_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all scopes. Missing or unreadable files yield an empty leaderboard.
    pub fn load(&self) -> Leaderboards {
        match self.try_load() {
            Ok(boards) => boards,
            Err(e) => {
                tracing::warn!("Error loading leaderboard, starting empty: {:#}", e);
                Leaderboards::default()
            }
        }
    }

    /// Load all scopes, reporting failures
    pub fn try_load(&self) -> Result<Leaderboards> {
        if !self.path.exists() {
            tracing::debug!("No leaderboard at {:?}", self.path);
            return Ok(Leaderboards::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read leaderboard file: {}", self.path.display()))?;
        let mut boards: Leaderboards = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse leaderboard file: {}", self.path.display()))?;
        boards.normalize();
        Ok(boards)
    }

    /// Persist all scopes, overwriting the file. Returns false if the write failed.
    pub fn save(&self, boards: &Leaderboards) -> bool {
        match self.try_save(boards) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Error saving leaderboard: {:#}", e);
                false
            }
        }
    }

    /// Persist all scopes, reporting failures
    pub fn try_save(&self, boards: &Leaderboards) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(boards)
            .context("Failed to serialize leaderboard")?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| LEADERBOARD_FILE.to_string());
        let tmp_path = self.path.with_file_name(format!(".tmp_{}", file_name));
        let written = write_and_rename(&tmp_path, &self.path, json.as_bytes());
        if written.is_err() && tmp_path.exists() {
            if let Err(e) = std::fs::remove_file(&tmp_path) {
                tracing::warn!("Failed to remove {:?}: {}", tmp_path, e);
            }
        }
        written?;

        tracing::info!("Leaderboard saved to {:?} ({} bytes)", self.path, json.len());
        Ok(())
    }

    /// Record a score and return the scope's updated top entries.
    ///
    /// The entry is returned in the list even when saving fails.
    pub fn add(&self, name: &str, score: u64, scope: Scope) -> Vec<LeaderboardEntry> {
        let mut boards = self.load();
        let entry = LeaderboardEntry::new(name, score);
        tracing::info!("Recording {} for {} ({})", score, entry.name, scope);
        let updated = boards.insert(scope, entry).to_vec();
        self.save(&boards);
        updated
    }

    /// Current entries of one scope
    pub fn entries(&self, scope: Scope) -> Vec<LeaderboardEntry> {
        self.load().entries(scope).to_vec()
    }

    /// Human-readable ranking of one scope
    pub fn format_table(&self, scope: Scope) -> String {
        format_entries(scope, &self.entries(scope))
    }
}

/// Write `data` to `tmp_path`, then move it over `path`
fn write_and_rename(tmp_path: &Path, path: &Path, data: &[u8]) -> Result<()> {
    let mut file = std::fs::File::create(tmp_path).context("Failed to create temporary file")?;
    file.write_all(data).context("Failed to write leaderboard data")?;
    file.flush().context("Failed to flush file buffer")?;
    drop(file);

    std::fs::rename(tmp_path, path).context("Failed to rename temporary file")
}

/// Render entries as `"1. name - score"` lines under a title
pub fn format_entries(scope: Scope, entries: &[LeaderboardEntry]) -> String {
    let mut output = format!("=== {} Leaderboard ===\n", scope);
    if entries.is_empty() {
        output.push_str("(no scores yet)\n");
    }
    for (index, entry) in entries.iter().enumerate() {
        output.push_str(&format!("{}. {} - {}\n", index + 1, entry.name, entry.score));
    }
    output
}
