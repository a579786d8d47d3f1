//! Foundation utilities shared by every adcraft crate.
//!
//! - [`error`]: the error taxonomy and user-facing reporting
//! - [`exit_codes`]: CLI exit code table
//! - [`logging`]: `tracing` subscriber setup and structured generation events
//! - [`redaction`]: credential scrubbing for logs and error output
//! - [`types`]: small shared value types

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod redaction;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
