//! Configuration model, discovery, and validation for adcraft.
//!
//! Precedence is CLI > config file > built-in defaults. The config file is
//! `.adcraft/config.toml`, found by walking upward from the working directory.

mod config;

pub use config::*;
