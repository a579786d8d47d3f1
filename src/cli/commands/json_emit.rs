//! JSON output for `adcraft generate --json`.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AdData;

pub const GENERATE_JSON_SCHEMA: &str = "adcraft-ad.v1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateJsonOutput<'a> {
    pub schema_version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub text_model: &'a str,
    pub image_model: &'a str,
    pub ad: &'a AdData,
}

/// Emit one generated ad as pretty-printed JSON.
pub fn emit_generate_json<W: Write>(output: &GenerateJsonOutput<'_>, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, output)?;
    writeln!(out)?;
    Ok(())
}
