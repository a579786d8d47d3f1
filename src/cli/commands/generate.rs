//! Generate command implementation
//!
//! Handles `adcraft generate`: one ad from flags, no wizard.

use std::io::Write;

use anyhow::Result;
use chrono::{Local, Utc};
use tracing::info;

use super::common::write_image;
use super::json_emit::{GENERATE_JSON_SCHEMA, GenerateJsonOutput, emit_generate_json};
use crate::cli::args::GenerateArgs;
use crate::render;
use crate::{AdFormData, AdGenerator, AdcraftError, Config};

/// Execute the generate command for an already validated form.
pub async fn execute_generate_command<G, W>(
    generator: &G,
    form: AdFormData,
    args: &GenerateArgs,
    config: &Config,
    out: &mut W,
) -> Result<()>
where
    G: AdGenerator,
    W: Write,
{
    let ad = generator
        .generate_full_ad(form)
        .await
        .map_err(AdcraftError::from)?;

    if let Some(path) = &args.image_out {
        let bytes = write_image(&ad.image_url, path)?;
        info!(path = %path.display(), bytes, "Image written");
    }

    if args.json {
        let output = GenerateJsonOutput {
            schema_version: GENERATE_JSON_SCHEMA,
            generated_at: Utc::now(),
            text_model: config.text_model(),
            image_model: config.image_model(),
            ad: &ad,
        };
        emit_generate_json(&output, out)?;
    } else {
        writeln!(out, "{}", render::review(&ad, &Local::now()))?;
        if let Some(path) = &args.image_out {
            writeln!(out, "Image saved to {}", path.display())?;
        }
    }
    Ok(())
}
