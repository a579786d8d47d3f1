//! Property-Based Tests for adcraft
//!
//! **WHITE-BOX TEST**: uses internal module paths (`parse`, `model`,
//! `progress`) and may break with internal refactors.
//!
//! ## Configuration
//!
//! - `PROPTEST_CASES`: Number of test cases per property (default: 64)
//!
//! ```bash
//! PROPTEST_CASES=256 cargo test --test property_based_tests
//! ```

use proptest::prelude::*;
use std::env;

use adcraft::parse::parse_ad_content;
use adcraft::model::{AdContent, AdCreative, TargetingSuggestions};
use adcraft::progress::{GENERATION_MESSAGES, generation_message};
use adcraft::{FormField, Stage, WizardController};

const DEFAULT_PROPTEST_CASES: u32 = 64;

fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_PROPTEST_CASES);
    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

fn arb_content() -> impl Strategy<Value = AdContent> {
    (
        ".{0,60}",
        ".{0,160}",
        prop::collection::vec("[a-z ]{1,20}", 0..12),
        prop::collection::vec("[A-Za-z ]{1,20}", 0..7),
        "[0-9]{1,2}-[0-9]{1,2}|[a-z]{0,8}",
    )
        .prop_map(|(headline, primary_text, interests, locations, age_range)| AdContent {
            creative: AdCreative {
                headline,
                primary_text,
            },
            targeting: TargetingSuggestions {
                interests,
                locations,
                age_range,
            },
        })
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Untrusted model output never panics the parser.
    #[test]
    fn prop_parse_never_panics(raw in ".{0,200}") {
        let _ = parse_ad_content(&raw);
    }

    /// Well-formed content parses back unmodified, advisories or not.
    #[test]
    fn prop_well_formed_content_is_accepted(content in arb_content()) {
        let raw = serde_json::to_string(&content).unwrap();
        let parsed = parse_ad_content(&raw).unwrap();
        prop_assert_eq!(&parsed, &content);
        let _ = parsed.advisories();
    }

    /// Dropping any required key is rejected.
    #[test]
    fn prop_missing_key_is_rejected(
        content in arb_content(),
        key in prop::sample::select(vec!["interests", "locations", "ageRange"]),
    ) {
        let mut value = serde_json::to_value(&content).unwrap();
        value["targeting"].as_object_mut().unwrap().remove(key);
        prop_assert!(parse_ad_content(&value.to_string()).is_err());
    }

    /// Progress messages cycle with period 5.
    #[test]
    fn prop_generation_message_cycles(tick in 0usize..10_000) {
        prop_assert_eq!(generation_message(tick), generation_message(tick + GENERATION_MESSAGES.len()));
    }

    /// Whatever is typed, the audience guard admits exactly the non-blank answers
    /// and only an admitted answer produces a generation request.
    #[test]
    fn prop_audience_guard(audience in "[ a-z\t]{0,10}") {
        let mut wizard = WizardController::new();
        wizard.set_field(FormField::ProductName, "Artisan Coffee").unwrap();
        wizard.set_field(FormField::ProductDescription, "Beans").unwrap();
        wizard.advance().unwrap();
        wizard.set_field(FormField::TargetAudience, audience.clone()).unwrap();

        let admitted = !audience.trim().is_empty();
        prop_assert_eq!(wizard.can_advance(), admitted);
        match wizard.advance() {
            Ok(Some(request)) => {
                prop_assert!(admitted);
                prop_assert_eq!(request.form().target_audience.as_str(), audience.as_str());
                prop_assert_eq!(wizard.stage(), Stage::Generating);
            }
            Ok(None) => prop_assert!(false, "audience stage never advances without a request"),
            Err(_) => {
                prop_assert!(!admitted);
                prop_assert_eq!(wizard.stage(), Stage::CollectingAudience);
            }
        }
    }
}
