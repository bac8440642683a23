// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal front end for the tiles puzzle: configuration, rendering,
//! command parsing and the interactive loop.

pub mod app;
pub mod commands;
pub mod config;
pub mod render;
