//! Command-line interface for adcraft
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions and parsing structures (clap)
//! - `run`: Main entry point and command dispatch
//! - `commands`: Command implementations and helpers
//! - `tests`: Test module (cfg(test) only)

pub mod args;
pub mod commands;
mod run;

#[cfg(test)]
mod tests;

pub use args::{Cli, Commands, GenerateArgs, build_cli};

pub use run::run;
