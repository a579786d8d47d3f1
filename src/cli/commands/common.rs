//! Helpers shared by the generate and wizard commands.

use std::fs;
use std::io;
use std::path::Path;

use crate::cli::args::GenerateArgs;
use crate::llm::GeneratedImage;
use crate::{AdFormData, AdcraftError, FormField};

/// Build the form from `generate` flags, rejecting blank values.
///
/// # Errors
///
/// Returns `AdcraftError::InvalidInput` naming the first blank flag.
pub fn form_from_args(args: &GenerateArgs) -> Result<AdFormData, AdcraftError> {
    let form = AdFormData::new(
        args.product_name.trim(),
        args.product_description.trim(),
        args.target_audience.trim(),
    );
    match form.first_blank() {
        Some(field) => Err(blank_field(field)),
        None => Ok(form),
    }
}

fn blank_field(field: FormField) -> AdcraftError {
    AdcraftError::InvalidInput {
        field: field.flag().to_string(),
        reason: "must not be blank".to_string(),
    }
}

/// Decode the ad's `data:` image reference and write the bytes to `path`.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns `AdcraftError::Io` if the reference is not a base64 data URI or the
/// file cannot be written.
pub fn write_image(image_url: &str, path: &Path) -> Result<usize, AdcraftError> {
    let image = GeneratedImage::from_data_uri(image_url).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "image is not a base64 data URI")
    })?;
    let bytes = image
        .decode()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, &bytes)?;
    Ok(bytes.len())
}
