//! Data model shared by the orchestrator, the wizard and the front-ends.
//!
//! JSON field names are camelCase so `adcraft generate --json` output matches
//! the shape the model is asked to produce.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Headline length the model is asked to stay within.
pub const HEADLINE_MAX_CHARS: usize = 40;
/// Primary text length the model is asked to stay within.
pub const PRIMARY_TEXT_MAX_CHARS: usize = 125;
/// Number of interests requested.
pub const INTERESTS_RANGE: RangeInclusive<usize> = 5..=10;
/// Number of locations requested.
pub const LOCATIONS_RANGE: RangeInclusive<usize> = 3..=5;

/// One of the three user-provided form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ProductName,
    ProductDescription,
    TargetAudience,
}

impl FormField {
    pub const ALL: [FormField; 3] = [
        FormField::ProductName,
        FormField::ProductDescription,
        FormField::TargetAudience,
    ];

    /// JSON key of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProductName => "productName",
            Self::ProductDescription => "productDescription",
            Self::TargetAudience => "targetAudience",
        }
    }

    /// Human label used in prompts shown to the user.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ProductName => "Product Name",
            Self::ProductDescription => "Product Description",
            Self::TargetAudience => "Target Audience",
        }
    }

    /// Long CLI flag that carries this field (without the leading dashes).
    #[must_use]
    pub const fn flag(&self) -> &'static str {
        match self {
            Self::ProductName => "product-name",
            Self::ProductDescription => "product-description",
            Self::TargetAudience => "target-audience",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three free-text answers collected by the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdFormData {
    pub product_name: String,
    pub product_description: String,
    pub target_audience: String,
}

impl AdFormData {
    #[must_use]
    pub fn new(
        product_name: impl Into<String>,
        product_description: impl Into<String>,
        target_audience: impl Into<String>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            product_description: product_description.into(),
            target_audience: target_audience.into(),
        }
    }

    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::ProductName => &self.product_name,
            FormField::ProductDescription => &self.product_description,
            FormField::TargetAudience => &self.target_audience,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::ProductName => &mut self.product_name,
            FormField::ProductDescription => &mut self.product_description,
            FormField::TargetAudience => &mut self.target_audience,
        };
        *slot = value.into();
    }

    /// True when the field is empty or whitespace-only.
    #[must_use]
    pub fn is_blank(&self, field: FormField) -> bool {
        self.get(field).trim().is_empty()
    }

    /// First blank field, in form order.
    #[must_use]
    pub fn first_blank(&self) -> Option<FormField> {
        FormField::ALL.into_iter().find(|field| self.is_blank(*field))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCreative {
    pub headline: String,
    pub primary_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingSuggestions {
    pub interests: Vec<String>,
    pub locations: Vec<String>,
    /// Formatted like `"25-45"`.
    pub age_range: String,
}

/// Result of the content sub-task: copy plus targeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdContent {
    pub creative: AdCreative,
    pub targeting: TargetingSuggestions,
}

/// A soft deviation from what the model was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub field: &'static str,
    pub detail: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.detail)
    }
}

impl AdContent {
    /// Report length, count and format deviations. None of these fail generation.
    #[must_use]
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut advisories = Vec::new();

        let headline_chars = self.creative.headline.chars().count();
        if headline_chars > HEADLINE_MAX_CHARS {
            advisories.push(Advisory {
                field: "headline",
                detail: format!("{headline_chars} characters, limit {HEADLINE_MAX_CHARS}"),
            });
        }

        let primary_chars = self.creative.primary_text.chars().count();
        if primary_chars > PRIMARY_TEXT_MAX_CHARS {
            advisories.push(Advisory {
                field: "primaryText",
                detail: format!("{primary_chars} characters, limit {PRIMARY_TEXT_MAX_CHARS}"),
            });
        }

        let interests = self.targeting.interests.len();
        if !INTERESTS_RANGE.contains(&interests) {
            advisories.push(Advisory {
                field: "interests",
                detail: format!(
                    "{interests} items, expected {}-{}",
                    INTERESTS_RANGE.start(),
                    INTERESTS_RANGE.end()
                ),
            });
        }

        let locations = self.targeting.locations.len();
        if !LOCATIONS_RANGE.contains(&locations) {
            advisories.push(Advisory {
                field: "locations",
                detail: format!(
                    "{locations} items, expected {}-{}",
                    LOCATIONS_RANGE.start(),
                    LOCATIONS_RANGE.end()
                ),
            });
        }

        if !is_age_range(&self.targeting.age_range) {
            advisories.push(Advisory {
                field: "ageRange",
                detail: format!("'{}' is not formatted like 25-45", self.targeting.age_range),
            });
        }

        advisories
    }
}

/// `NN-NN` with the lower bound not above the upper one.
fn is_age_range(value: &str) -> bool {
    let Some((low, high)) = value.trim().split_once('-') else {
        return false;
    };
    let parse = |part: &str| {
        let part = part.trim();
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse::<u16>().ok()
    };
    matches!((parse(low), parse(high)), (Some(low), Some(high)) if low <= high)
}

/// A complete generated ad. There is no partially populated form of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdData {
    pub creative: AdCreative,
    pub targeting: TargetingSuggestions,
    /// Displayable image reference, a `data:` URI.
    pub image_url: String,
}

impl AdData {
    /// Merge both sub-task results without modifying either.
    #[must_use]
    pub fn from_parts(content: AdContent, image_url: String) -> Self {
        Self {
            creative: content.creative,
            targeting: content.targeting,
            image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(headline: &str, interests: usize, locations: usize, age: &str) -> AdContent {
        AdContent {
            creative: AdCreative {
                headline: headline.to_string(),
                primary_text: "Taste the difference of small-batch coffee.".to_string(),
            },
            targeting: TargetingSuggestions {
                interests: (0..interests).map(|i| format!("interest {i}")).collect(),
                locations: (0..locations).map(|i| format!("city {i}")).collect(),
                age_range: age.to_string(),
            },
        }
    }

    #[test]
    fn test_form_field_accessors() {
        let mut form = AdFormData::default();
        assert_eq!(form.first_blank(), Some(FormField::ProductName));

        form.set(FormField::ProductName, "Artisan Coffee");
        form.set(FormField::ProductDescription, "  ");
        assert_eq!(form.get(FormField::ProductName), "Artisan Coffee");
        assert!(form.is_blank(FormField::ProductDescription));
        assert_eq!(form.first_blank(), Some(FormField::ProductDescription));
    }

    #[test]
    fn test_form_serializes_camel_case() {
        let form = AdFormData::new("a", "b", "c");
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["productName"], "a");
        assert_eq!(value["productDescription"], "b");
        assert_eq!(value["targetAudience"], "c");
    }

    #[test]
    fn test_within_intents_has_no_advisories() {
        assert!(content("Fresh Roasted Daily", 6, 3, "25-40").advisories().is_empty());
    }

    #[test]
    fn test_advisories_flag_each_deviation() {
        let long_headline = "A headline that is far longer than forty characters";
        let advisories = content(long_headline, 2, 2, "adults").advisories();
        let fields: Vec<&str> = advisories.iter().map(|a| a.field).collect();
        assert_eq!(fields, vec!["headline", "interests", "locations", "ageRange"]);
    }

    #[test]
    fn test_age_range_format() {
        assert!(is_age_range("25-40"));
        assert!(is_age_range("18 - 65"));
        assert!(!is_age_range("40-25"));
        assert!(!is_age_range("25+"));
        assert!(!is_age_range("-"));
        assert!(!is_age_range("twenty-forty"));
    }

    #[test]
    fn test_ad_data_from_parts_keeps_values() {
        let parts = content("Fresh Roasted Daily", 2, 2, "25-40");
        let ad = AdData::from_parts(parts.clone(), "data:image/jpeg;base64,AAAA".to_string());
        assert_eq!(ad.creative, parts.creative);
        assert_eq!(ad.targeting, parts.targeting);
        assert_eq!(ad.image_url, "data:image/jpeg;base64,AAAA");

        let json = serde_json::to_value(&ad).unwrap();
        assert_eq!(json["imageUrl"], "data:image/jpeg;base64,AAAA");
        assert_eq!(json["creative"]["primaryText"], parts.creative.primary_text);
        assert_eq!(json["targeting"]["ageRange"], "25-40");
    }
}
