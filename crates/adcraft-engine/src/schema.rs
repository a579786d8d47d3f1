//! Response schema sent with the content request.
//!
//! Uses the OpenAPI subset the Gemini API accepts (`OBJECT`, `ARRAY`, `STRING`).

use serde_json::{Value, json};

/// Schema for [`AdContent`](crate::model::AdContent). Both sub-objects and all
/// five leaves are required.
#[must_use]
pub fn ad_content_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "creative": {
                "type": "OBJECT",
                "properties": {
                    "headline": {
                        "type": "STRING",
                        "description": "A short, catchy headline for the ad (max 40 characters)."
                    },
                    "primaryText": {
                        "type": "STRING",
                        "description": "The main body text of the ad (max 125 characters)."
                    }
                },
                "required": ["headline", "primaryText"]
            },
            "targeting": {
                "type": "OBJECT",
                "properties": {
                    "interests": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "An array of 5-10 specific interests for targeting."
                    },
                    "locations": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "An array of 3-5 relevant cities or countries for targeting."
                    },
                    "ageRange": {
                        "type": "STRING",
                        "description": "The target age range, formatted like '25-45'."
                    }
                },
                "required": ["interests", "locations", "ageRange"]
            }
        },
        "required": ["creative", "targeting"]
    })
}
