//! Wizard Controller
//!
//! A pure state machine over the four wizard stages. Entering
//! [`Stage::Generating`] is the only transition with a side effect, and that
//! effect is not performed here: [`WizardController::advance`] hands back a
//! [`GenerationRequest`] carrying a ticket for this entry, and the caller feeds
//! the outcome back through [`WizardController::complete_generation`].
//! Rendering goes through [`WizardController::view`], which only reads.

use std::fmt;

use adcraft_utils::error::{GenerationError, WizardError};
use serde::Serialize;
use tracing::debug;

use crate::model::{AdData, AdFormData, FormField};

/// One step of the wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    CollectingProduct,
    CollectingAudience,
    Generating,
    Reviewing,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::CollectingProduct,
        Stage::CollectingAudience,
        Stage::Generating,
        Stage::Reviewing,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CollectingProduct => "product",
            Self::CollectingAudience => "audience",
            Self::Generating => "generating",
            Self::Reviewing => "review",
        }
    }

    /// 1-based position in the stepper.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::CollectingProduct => 1,
            Self::CollectingAudience => 2,
            Self::Generating => 3,
            Self::Reviewing => 4,
        }
    }

    /// Stepper label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CollectingProduct => "Product Info",
            Self::CollectingAudience => "Audience",
            Self::Generating => "Generate",
            Self::Reviewing => "Review",
        }
    }

    /// Fields collected on this stage.
    #[must_use]
    pub const fn fields(&self) -> &'static [FormField] {
        match self {
            Self::CollectingProduct => &[FormField::ProductName, FormField::ProductDescription],
            Self::CollectingAudience => &[FormField::TargetAudience],
            Self::Generating | Self::Reviewing => &[],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one entry into [`Stage::Generating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationTicket(u64);

impl GenerationTicket {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.0
    }
}

/// The generating stage's entry action: generate an ad for this form snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a generation request must be executed and completed"]
pub struct GenerationRequest {
    ticket: GenerationTicket,
    form: AdFormData,
}

impl GenerationRequest {
    pub fn ticket(&self) -> GenerationTicket {
        self.ticket
    }

    pub fn form(&self) -> &AdFormData {
        &self.form
    }

    pub fn into_parts(self) -> (GenerationTicket, AdFormData) {
        (self.ticket, self.form)
    }
}

/// Stepper state for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProgress {
    /// 1-based index of the active stage.
    pub current: usize,
    pub total: usize,
    pub labels: [&'static str; 4],
}

/// Read-only snapshot of the controller.
#[derive(Debug, Clone, Copy)]
pub struct WizardView<'a> {
    pub stage: Stage,
    pub form: &'a AdFormData,
    pub error: Option<&'a str>,
    pub ad: Option<&'a AdData>,
    pub can_advance: bool,
    pub progress: StepProgress,
}

#[derive(Debug, Clone, Default)]
pub struct WizardController {
    stage: Stage,
    form: AdFormData,
    error: Option<String>,
    ad: Option<AdData>,
    epoch: u64,
    pending: Option<u64>,
}

impl WizardController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn form(&self) -> &AdFormData {
        &self.form
    }

    /// Message of the last failed generation, if still shown.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn ad(&self) -> Option<&AdData> {
        self.ad.as_ref()
    }

    /// Update one form field.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::FormLocked`] while a generation is in flight.
    pub fn set_field(
        &mut self,
        field: FormField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        if self.stage == Stage::Generating {
            return Err(WizardError::FormLocked);
        }
        self.form.set(field, value);
        Ok(())
    }

    /// Whether the current stage's fields are all non-blank.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        match self.stage {
            Stage::CollectingProduct | Stage::CollectingAudience => self
                .stage
                .fields()
                .iter()
                .all(|field| !self.form.is_blank(*field)),
            Stage::Generating | Stage::Reviewing => false,
        }
    }

    /// Move forward one stage.
    ///
    /// Entering [`Stage::Generating`] returns the generation request for that
    /// entry; the caller must run it and pass the result to
    /// [`complete_generation`](Self::complete_generation).
    ///
    /// # Errors
    ///
    /// - [`WizardError::GuardRejected`] if the current stage has a blank field.
    ///   Nothing is stored and the stage does not change.
    /// - [`WizardError::InvalidTransition`] from the generating or review stage.
    pub fn advance(&mut self) -> Result<Option<GenerationRequest>, WizardError> {
        match self.stage {
            Stage::CollectingProduct | Stage::CollectingAudience if !self.can_advance() => {
                Err(WizardError::GuardRejected {
                    stage: self.stage.as_str(),
                })
            }
            Stage::CollectingProduct => {
                self.transition(Stage::CollectingAudience);
                Ok(None)
            }
            Stage::CollectingAudience => Ok(Some(self.enter_generating())),
            Stage::Generating | Stage::Reviewing => Err(WizardError::InvalidTransition {
                stage: self.stage.as_str(),
                action: "advance",
            }),
        }
    }

    /// Return from the audience stage to the product stage.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidTransition`] from any other stage.
    pub fn back(&mut self) -> Result<(), WizardError> {
        if self.stage != Stage::CollectingAudience {
            return Err(WizardError::InvalidTransition {
                stage: self.stage.as_str(),
                action: "go back",
            });
        }
        self.transition(Stage::CollectingProduct);
        Ok(())
    }

    /// Apply the outcome of the generation started by `ticket`.
    ///
    /// Success moves to review with the ad. Failure stores the error message
    /// and returns to the audience stage with the form intact.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::StaleGeneration`] if `ticket` is not the active
    /// entry; the outcome is discarded and nothing changes.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<AdData, GenerationError>,
    ) -> Result<(), WizardError> {
        if self.stage != Stage::Generating || self.pending != Some(ticket.0) {
            return Err(WizardError::StaleGeneration {
                expected: self.pending,
                got: ticket.0,
            });
        }
        self.pending = None;

        match result {
            Ok(ad) => {
                self.ad = Some(ad);
                self.transition(Stage::Reviewing);
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.transition(Stage::CollectingAudience);
            }
        }
        Ok(())
    }

    /// Ticket of the generation in flight, if any.
    #[must_use]
    pub fn pending_ticket(&self) -> Option<GenerationTicket> {
        self.pending.map(GenerationTicket)
    }

    /// Give up on the generation started by `ticket` without an outcome.
    ///
    /// Returns to the audience stage with the form intact and no banner. A
    /// late completion for the same ticket is then rejected as stale.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::StaleGeneration`] if `ticket` is not the active
    /// entry.
    pub fn abandon_generation(&mut self, ticket: GenerationTicket) -> Result<(), WizardError> {
        if self.stage != Stage::Generating || self.pending != Some(ticket.0) {
            return Err(WizardError::StaleGeneration {
                expected: self.pending,
                got: ticket.0,
            });
        }
        self.pending = None;
        self.transition(Stage::CollectingAudience);
        Ok(())
    }

    /// Start a new ad from an empty form.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidTransition`] outside the review stage.
    pub fn reset(&mut self) -> Result<(), WizardError> {
        if self.stage != Stage::Reviewing {
            return Err(WizardError::InvalidTransition {
                stage: self.stage.as_str(),
                action: "start over",
            });
        }
        self.form = AdFormData::default();
        self.ad = None;
        self.error = None;
        self.transition(Stage::CollectingProduct);
        Ok(())
    }

    #[must_use]
    pub fn progress(&self) -> StepProgress {
        StepProgress {
            current: self.stage.index(),
            total: Stage::ALL.len(),
            labels: Stage::ALL.map(|stage| stage.label()),
        }
    }

    #[must_use]
    pub fn view(&self) -> WizardView<'_> {
        WizardView {
            stage: self.stage,
            form: &self.form,
            error: self.error(),
            ad: self.ad(),
            can_advance: self.can_advance(),
            progress: self.progress(),
        }
    }

    fn enter_generating(&mut self) -> GenerationRequest {
        // A retry dismisses the previous banner.
        self.error = None;
        self.epoch += 1;
        self.pending = Some(self.epoch);
        self.transition(Stage::Generating);
        GenerationRequest {
            ticket: GenerationTicket(self.epoch),
            form: self.form.clone(),
        }
    }

    fn transition(&mut self, to: Stage) {
        debug!(from = %self.stage, to = %to, "Wizard transition");
        self.stage = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{artisan_coffee_ad, artisan_coffee_form};
    use adcraft_utils::error::ImageGenerationError;
    use proptest::prelude::*;

    fn at_audience() -> WizardController {
        let mut wizard = WizardController::new();
        let form = artisan_coffee_form();
        wizard
            .set_field(FormField::ProductName, form.product_name)
            .unwrap();
        wizard
            .set_field(FormField::ProductDescription, form.product_description)
            .unwrap();
        assert!(wizard.advance().unwrap().is_none());
        wizard
            .set_field(FormField::TargetAudience, form.target_audience)
            .unwrap();
        wizard
    }

    fn no_image() -> GenerationError {
        GenerationError::new(ImageGenerationError::NoImage)
    }

    #[test]
    fn test_starts_empty_on_product_stage() {
        let wizard = WizardController::new();
        assert_eq!(wizard.stage(), Stage::CollectingProduct);
        assert_eq!(wizard.form(), &AdFormData::default());
        assert!(wizard.error().is_none());
        assert!(wizard.ad().is_none());
        assert!(!wizard.can_advance());
    }

    #[test]
    fn test_blank_product_fields_are_rejected_without_stored_error() {
        let mut wizard = WizardController::new();
        wizard.set_field(FormField::ProductName, "Artisan Coffee").unwrap();
        wizard.set_field(FormField::ProductDescription, "   ").unwrap();

        let err = wizard.advance().unwrap_err();
        assert_eq!(err, WizardError::GuardRejected { stage: "product" });
        assert_eq!(wizard.stage(), Stage::CollectingProduct);
        assert!(wizard.error().is_none());
    }

    #[test]
    fn test_blank_audience_is_rejected() {
        let mut wizard = at_audience();
        wizard.set_field(FormField::TargetAudience, "").unwrap();
        assert_eq!(
            wizard.advance().unwrap_err(),
            WizardError::GuardRejected { stage: "audience" }
        );
        assert_eq!(wizard.stage(), Stage::CollectingAudience);
    }

    #[test]
    fn test_back_keeps_answers() {
        let mut wizard = at_audience();
        wizard.back().unwrap();
        assert_eq!(wizard.stage(), Stage::CollectingProduct);
        assert_eq!(wizard.form(), &artisan_coffee_form());
        assert!(wizard.back().is_err());
    }

    #[test]
    fn test_entering_generating_emits_one_request_with_form_snapshot() {
        let mut wizard = at_audience();
        let request = wizard.advance().unwrap().unwrap();
        assert_eq!(wizard.stage(), Stage::Generating);
        assert_eq!(request.form(), &artisan_coffee_form());

        // Re-reading state emits nothing.
        let _ = wizard.view();
        let _ = wizard.view();
        assert_eq!(
            wizard.advance().unwrap_err(),
            WizardError::InvalidTransition {
                stage: "generating",
                action: "advance"
            }
        );
    }

    #[test]
    fn test_form_is_locked_while_generating() {
        let mut wizard = at_audience();
        let _request = wizard.advance().unwrap();
        assert_eq!(
            wizard.set_field(FormField::ProductName, "Other").unwrap_err(),
            WizardError::FormLocked
        );
        assert!(wizard.back().is_err());
        assert_eq!(wizard.form(), &artisan_coffee_form());
    }

    #[test]
    fn test_success_moves_to_review() {
        let mut wizard = at_audience();
        let (ticket, _) = wizard.advance().unwrap().unwrap().into_parts();
        wizard
            .complete_generation(ticket, Ok(artisan_coffee_ad()))
            .unwrap();

        assert_eq!(wizard.stage(), Stage::Reviewing);
        assert_eq!(wizard.ad(), Some(&artisan_coffee_ad()));
        assert!(wizard.error().is_none());
        assert!(!wizard.can_advance());
    }

    #[test]
    fn test_failure_returns_to_audience_with_banner_until_retry() {
        let mut wizard = at_audience();
        let ticket = wizard.advance().unwrap().unwrap().ticket();
        wizard.complete_generation(ticket, Err(no_image())).unwrap();

        assert_eq!(wizard.stage(), Stage::CollectingAudience);
        assert!(wizard.ad().is_none());
        assert_eq!(wizard.form(), &artisan_coffee_form());
        let banner = wizard.error().unwrap();
        assert!(banner.starts_with("Ad generation failed: "));
        assert!(banner.contains("No image was generated."));

        // Banner survives navigation.
        wizard.back().unwrap();
        assert!(wizard.error().is_some());
        wizard.advance().unwrap();

        // Retry dismisses it.
        let retry = wizard.advance().unwrap().unwrap();
        assert!(wizard.error().is_none());
        assert_ne!(retry.ticket(), ticket);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut wizard = at_audience();
        let first = wizard.advance().unwrap().unwrap().ticket();
        wizard.complete_generation(first, Err(no_image())).unwrap();
        let second = wizard.advance().unwrap().unwrap().ticket();

        let err = wizard
            .complete_generation(first, Ok(artisan_coffee_ad()))
            .unwrap_err();
        assert_eq!(
            err,
            WizardError::StaleGeneration {
                expected: Some(second.id()),
                got: first.id()
            }
        );
        assert_eq!(wizard.stage(), Stage::Generating);

        wizard
            .complete_generation(second, Ok(artisan_coffee_ad()))
            .unwrap();
        assert!(
            wizard
                .complete_generation(second, Ok(artisan_coffee_ad()))
                .is_err()
        );
    }

    #[test]
    fn test_abandoned_generation_returns_to_audience() {
        let mut wizard = at_audience();
        assert!(wizard.pending_ticket().is_none());
        let ticket = wizard.advance().unwrap().unwrap().ticket();
        assert_eq!(wizard.pending_ticket(), Some(ticket));

        wizard.abandon_generation(ticket).unwrap();
        assert_eq!(wizard.stage(), Stage::CollectingAudience);
        assert!(wizard.pending_ticket().is_none());
        assert!(wizard.error().is_none());
        assert_eq!(wizard.form(), &artisan_coffee_form());

        // The late outcome no longer applies, and the form is editable again.
        assert!(
            wizard
                .complete_generation(ticket, Ok(artisan_coffee_ad()))
                .is_err()
        );
        assert!(wizard.abandon_generation(ticket).is_err());
        wizard
            .set_field(FormField::TargetAudience, "Home baristas")
            .unwrap();
        assert!(wizard.advance().unwrap().is_some());
    }

    #[test]
    fn test_reset_only_from_review() {
        let mut wizard = at_audience();
        assert!(wizard.reset().is_err());

        let ticket = wizard.advance().unwrap().unwrap().ticket();
        wizard
            .complete_generation(ticket, Ok(artisan_coffee_ad()))
            .unwrap();
        wizard.reset().unwrap();

        assert_eq!(wizard.stage(), Stage::CollectingProduct);
        assert_eq!(wizard.form(), &AdFormData::default());
        assert!(wizard.ad().is_none());
        assert!(wizard.error().is_none());
    }

    #[test]
    fn test_progress_and_view() {
        let mut wizard = at_audience();
        let progress = wizard.progress();
        assert_eq!(progress.current, 2);
        assert_eq!(progress.total, 4);
        assert_eq!(
            progress.labels,
            ["Product Info", "Audience", "Generate", "Review"]
        );

        let _request = wizard.advance().unwrap();
        let view = wizard.view();
        assert_eq!(view.stage, Stage::Generating);
        assert_eq!(view.progress.current, 3);
        assert!(!view.can_advance);
        assert!(view.ad.is_none());
    }

    proptest! {
        #[test]
        fn prop_product_guard_matches_blankness(name in ".{0,12}", description in ".{0,12}") {
            let mut wizard = WizardController::new();
            wizard.set_field(FormField::ProductName, name.clone()).unwrap();
            wizard.set_field(FormField::ProductDescription, description.clone()).unwrap();

            let expected = !name.trim().is_empty() && !description.trim().is_empty();
            prop_assert_eq!(wizard.can_advance(), expected);

            let outcome = wizard.advance();
            if expected {
                prop_assert!(matches!(outcome, Ok(None)));
                prop_assert_eq!(wizard.stage(), Stage::CollectingAudience);
            } else {
                prop_assert!(outcome.is_err());
                prop_assert_eq!(wizard.stage(), Stage::CollectingProduct);
            }
            prop_assert!(wizard.error().is_none());
        }

        #[test]
        fn prop_audience_guard_never_emits_for_blank(audience in "[ \t]{0,6}") {
            let mut wizard = at_audience();
            wizard.set_field(FormField::TargetAudience, audience).unwrap();
            prop_assert!(wizard.advance().is_err());
            prop_assert_eq!(wizard.stage(), Stage::CollectingAudience);
        }
    }
}
