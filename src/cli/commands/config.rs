//! Config command implementation
//!
//! Handles `adcraft config` and `adcraft config --json`.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::Config;

#[derive(Debug, Serialize)]
struct ConfigValue<'a> {
    value: &'a str,
    source: &'a str,
}

/// Print every effective setting with the layer it came from.
///
/// The API key itself is never printed; only whether its variable is set.
pub fn execute_config_command<W: Write>(config: &Config, json: bool, out: &mut W) -> Result<()> {
    let effective = config.effective_config();
    let key_present = std::env::var(config.api_key_env())
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false);

    if json {
        let values: BTreeMap<&str, ConfigValue<'_>> = effective
            .iter()
            .map(|(key, (value, source))| {
                (key.as_str(), ConfigValue { value, source })
            })
            .collect();
        let payload = serde_json::json!({
            "effectiveConfig": values,
            "apiKeyPresent": key_present,
        });
        serde_json::to_writer_pretty(&mut *out, &payload)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Effective configuration:")?;
    let width = effective.keys().map(String::len).max().unwrap_or(0);
    for (key, (value, source)) in &effective {
        writeln!(out, "  {key:<width$} = {value} ({source})")?;
    }
    writeln!(out)?;
    let state = if key_present { "set" } else { "not set" };
    writeln!(out, "API key: ${} is {state}", config.api_key_env())?;
    Ok(())
}
