//! Rotating status lines shown while an ad is being generated.

use std::time::Duration;

/// Messages cycled through in order while the generating stage is active.
pub const GENERATION_MESSAGES: [&str; 5] = [
    "Crafting compelling ad copy...",
    "Designing eye-catching visuals...",
    "Analyzing your target audience...",
    "Unlocking marketing genius...",
    "Assembling the perfect ad...",
];

/// How long each message stays on screen.
pub const GENERATION_MESSAGE_INTERVAL: Duration = Duration::from_millis(2500);

/// Message for the given tick; wraps around after the last one.
#[must_use]
pub fn generation_message(tick: usize) -> &'static str {
    GENERATION_MESSAGES[tick % GENERATION_MESSAGES.len()]
}
