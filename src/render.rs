//! Plain-text rendering for the terminal wizard and `adcraft generate`.

use std::fmt::{self, Write as _};

use chrono::{DateTime, TimeZone};

use crate::llm::GeneratedImage;
use crate::{AdData, Stage, StepProgress};

pub const TITLE: &str = "adcraft - AI Ad Generator";

/// `Step 2 of 4: Audience` followed by the full stepper.
#[must_use]
pub fn stepper(progress: &StepProgress) -> String {
    let steps: Vec<String> = progress
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let marker = match (i + 1).cmp(&progress.current) {
                std::cmp::Ordering::Less => '✓',
                std::cmp::Ordering::Equal => '●',
                std::cmp::Ordering::Greater => '○',
            };
            format!("{marker} {label}")
        })
        .collect();

    let current = progress
        .current
        .checked_sub(1)
        .and_then(|i| progress.labels.get(i))
        .copied()
        .unwrap_or_default();

    format!(
        "Step {} of {}: {current}\n  {}",
        progress.current,
        progress.total,
        steps.join(" > ")
    )
}

#[must_use]
pub fn error_banner(message: &str) -> String {
    format!("✗ {message}\n  Edit your answers or press Enter to try again.")
}

/// Shown when a stage guard rejects the answers.
#[must_use]
pub fn guard_hint(stage: Stage) -> String {
    let fields: Vec<&str> = stage.fields().iter().map(|field| field.label()).collect();
    format!("  Please fill in: {}", fields.join(", "))
}

/// Ad preview followed by the targeting suggestions and a timestamp footer.
#[must_use]
pub fn review<Tz>(ad: &AdData, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_review(&mut out, ad, generated_at);
    out
}

fn write_review<Tz>(out: &mut String, ad: &AdData, generated_at: &DateTime<Tz>) -> fmt::Result
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    writeln!(out, "Your ad is ready")?;
    writeln!(out, "  {:<14}{}", "Headline", ad.creative.headline)?;
    writeln!(out, "  {:<14}{}", "Primary text", ad.creative.primary_text)?;
    writeln!(out, "  {:<14}{}", "Image", image_summary(&ad.image_url))?;
    writeln!(out)?;
    writeln!(out, "Targeting suggestions")?;
    writeln!(out, "  {:<14}{}", "Interests", ad.targeting.interests.join(", "))?;
    writeln!(out, "  {:<14}{}", "Locations", ad.targeting.locations.join(", "))?;
    writeln!(out, "  {:<14}{}", "Age range", ad.targeting.age_range)?;
    writeln!(out)?;
    write!(out, "Generated {}", generated_at.format("%Y-%m-%d %H:%M %Z"))
}

fn image_summary(image_url: &str) -> String {
    match GeneratedImage::from_data_uri(image_url) {
        Some(image) => match image.decode() {
            Ok(bytes) => format!("{}, {} bytes", image.mime_type, bytes.len()),
            Err(_) => format!("{} (undecodable)", image.mime_type),
        },
        None => image_url.to_string(),
    }
}
