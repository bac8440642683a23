// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML configuration for the terminal front end

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tiles_core::gesture::DEFAULT_SWIPE_THRESHOLD;
use tiles_core::history::{DEFAULT_HISTORY_DEPTH, DEFAULT_UNDO_LIMIT};
use tiles_core::leaderboard::LEADERBOARD_FILE;
use tiles_core::session::SessionOptions;
use tiles_core::DEFAULT_BOARD_SIZE;

/// Board sizes offered by the terminal game
pub const SUPPORTED_SIZES: [usize; 3] = [3, 4, 5];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_board_size")]
    pub board_size: usize,
    #[serde(default)]
    pub infinite_mode: bool,
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    /// Undos per game; 0 means unlimited
    #[serde(default = "default_undo_limit")]
    pub undo_limit: u32,
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f32,
    /// Leaderboard file; the platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaderboard_path: Option<PathBuf>,
    /// Ring the terminal bell when tiles merge
    #[serde(default = "default_bell")]
    pub bell: bool,
}

fn default_board_size() -> usize {
    DEFAULT_BOARD_SIZE
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

fn default_undo_limit() -> u32 {
    DEFAULT_UNDO_LIMIT
}

fn default_swipe_threshold() -> f32 {
    DEFAULT_SWIPE_THRESHOLD
}

fn default_bell() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            infinite_mode: false,
            history_depth: default_history_depth(),
            undo_limit: default_undo_limit(),
            swipe_threshold: default_swipe_threshold(),
            leaderboard_path: None,
            bell: default_bell(),
        }
    }
}

impl GameConfig {
    /// Reject values the terminal game cannot play with
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_SIZES.contains(&self.board_size) {
            bail!("Invalid board size {}. Must be 3, 4, or 5.", self.board_size);
        }
        if self.history_depth == 0 {
            bail!("history_depth must be at least 1");
        }
        if !(self.swipe_threshold.is_finite() && self.swipe_threshold >= 0.0) {
            bail!("swipe_threshold must be a non-negative number");
        }
        Ok(())
    }

    /// Session tunables derived from this config
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            history_depth: self.history_depth,
            undo_limit: (self.undo_limit > 0).then_some(self.undo_limit),
            swipe_threshold: self.swipe_threshold,
            infinite_mode: self.infinite_mode,
        }
    }

    /// Leaderboard file, falling back to the platform data directory
    pub fn resolve_leaderboard_path(&self) -> Result<PathBuf> {
        match &self.leaderboard_path {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(LEADERBOARD_FILE)),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("io", "tiles", "tiles").context("Failed to determine home directory")
}

/// Default location of `config.toml`
pub fn get_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Directory for rotated log files
pub fn get_log_dir() -> PathBuf {
    match project_dirs() {
        Ok(dirs) => dirs.data_local_dir().join("logs"),
        Err(_) => PathBuf::from(".").join("logs"),
    }
}

/// Load the config at the default location, creating it if missing
pub fn load_config() -> Result<GameConfig> {
    let config_path = get_config_path().context("Failed to determine config path")?;
    load_config_from(&config_path)
}

/// Load the config at `config_path`, writing defaults there if it does not exist
pub fn load_config_from(config_path: &Path) -> Result<GameConfig> {
    if !config_path.exists() {
        tracing::info!("Config file not found, creating default at: {}", config_path.display());
        let default_config = GameConfig::default();
        save_config_to(config_path, &default_config)?;
        return Ok(default_config);
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    toml::from_str::<GameConfig>(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Write `config` to `config_path`, creating parent directories
pub fn save_config_to(config_path: &Path, config: &GameConfig) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let toml_content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(config_path, toml_content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    tracing::info!("Saved config to: {}", config_path.display());
    Ok(())
}
