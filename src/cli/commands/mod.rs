//! CLI command implementations (facade).
//!
//! This module re-exports the command surface used by `run.rs` and CLI tests.
//! Implementations live in `commands/*`.

mod common;
mod config;
mod generate;
mod json_emit;
mod wizard;

pub use common::{form_from_args, write_image};
pub use config::execute_config_command;
pub use generate::execute_generate_command;
pub use json_emit::{GENERATE_JSON_SCHEMA, GenerateJsonOutput, emit_generate_json};
pub use wizard::{BACK_COMMAND, execute_wizard_command, run_wizard};
