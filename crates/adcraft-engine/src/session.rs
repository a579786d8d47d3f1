//! Async driver for [`WizardController`].
//!
//! The session executes the generating stage's entry action as part of the
//! `advance` that enters it, so each entry issues exactly one generator call.

use adcraft_utils::error::WizardError;
use tracing::info;

use crate::model::FormField;
use crate::orchestrator::AdGenerator;
use crate::wizard::{Stage, WizardController, WizardView};

#[derive(Debug)]
pub struct WizardSession<G> {
    controller: WizardController,
    generator: G,
}

impl<G: AdGenerator> WizardSession<G> {
    #[must_use]
    pub fn new(generator: G) -> Self {
        Self {
            controller: WizardController::new(),
            generator,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    #[must_use]
    pub fn generator(&self) -> &G {
        &self.generator
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.controller.stage()
    }

    #[must_use]
    pub fn view(&self) -> WizardView<'_> {
        self.controller.view()
    }

    /// # Errors
    ///
    /// See [`WizardController::set_field`].
    pub fn set_field(
        &mut self,
        field: FormField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.controller.set_field(field, value)
    }

    /// # Errors
    ///
    /// See [`WizardController::back`].
    pub fn back(&mut self) -> Result<(), WizardError> {
        self.controller.back()
    }

    /// # Errors
    ///
    /// See [`WizardController::reset`].
    pub fn reset(&mut self) -> Result<(), WizardError> {
        self.controller.reset()
    }

    /// Move forward one stage and return the stage now active.
    ///
    /// Leaving the audience stage runs the generator once and resolves to
    /// either [`Stage::Reviewing`] or, on failure, back to
    /// [`Stage::CollectingAudience`] with the error message stored.
    ///
    /// # Errors
    ///
    /// See [`WizardController::advance`]. A generation failure is not an error
    /// here; it is recorded on the controller.
    ///
    /// # Cancellation
    ///
    /// Dropping the returned future while the generator runs leaves the
    /// session in [`Stage::Generating`]. Call
    /// [`abandon_generation`](Self::abandon_generation) to get back to the
    /// audience stage.
    pub async fn advance(&mut self) -> Result<Stage, WizardError> {
        let Some(request) = self.controller.advance()? else {
            return Ok(self.controller.stage());
        };

        let (ticket, form) = request.into_parts();
        info!(ticket = ticket.id(), "Generating ad");
        let result = self.generator.generate_full_ad(form).await;
        self.controller.complete_generation(ticket, result)?;
        Ok(self.controller.stage())
    }

    /// Drop the in-flight generation and return to the audience stage.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidTransition`] when nothing is generating.
    pub fn abandon_generation(&mut self) -> Result<(), WizardError> {
        let Some(ticket) = self.controller.pending_ticket() else {
            return Err(WizardError::InvalidTransition {
                stage: self.controller.stage().as_str(),
                action: "abandon generation",
            });
        };
        info!(ticket = ticket.id(), "Abandoning generation");
        self.controller.abandon_generation(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedGenerator, artisan_coffee_form};
    use std::time::Duration;

    async fn fill_and_submit(session: &mut WizardSession<ScriptedGenerator>) -> Stage {
        let form = artisan_coffee_form();
        for field in FormField::ALL {
            session.set_field(field, form.get(field)).unwrap();
        }
        assert_eq!(session.advance().await.unwrap(), Stage::CollectingAudience);
        session.advance().await.unwrap()
    }

    #[tokio::test]
    async fn test_artisan_coffee_reaches_review() {
        let mut session = WizardSession::new(ScriptedGenerator::new());
        let calls = session.generator().calls();

        assert_eq!(fill_and_submit(&mut session).await, Stage::Reviewing);

        let view = session.view();
        let ad = view.ad.unwrap();
        assert_eq!(ad.creative.headline, "Fresh Roasted Daily");
        assert_eq!(ad.targeting.age_range, "25-40");
        assert!(ad.image_url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(calls.get(), 1);
        assert_eq!(
            session.generator().last_form().get(),
            Some(artisan_coffee_form())
        );
    }

    #[tokio::test]
    async fn test_failed_generation_returns_to_audience_with_banner() {
        let mut session = WizardSession::new(ScriptedGenerator::new().then_no_image());

        assert_eq!(fill_and_submit(&mut session).await, Stage::CollectingAudience);
        let view = session.view();
        assert_eq!(
            view.error,
            Some("Ad generation failed: Failed to generate ad image: No image was generated.")
        );
        assert!(view.ad.is_none());
        assert_eq!(view.form, &artisan_coffee_form());

        // Retry clears the banner and succeeds.
        assert_eq!(session.advance().await.unwrap(), Stage::Reviewing);
        assert!(session.view().error.is_none());
        assert_eq!(session.generator().calls().get(), 2);
    }

    #[tokio::test]
    async fn test_viewing_never_reissues_generation() {
        let mut session = WizardSession::new(ScriptedGenerator::new());
        fill_and_submit(&mut session).await;

        for _ in 0..5 {
            let _ = session.view();
        }
        assert!(session.advance().await.is_err());
        assert_eq!(session.generator().calls().get(), 1);
    }

    #[tokio::test]
    async fn test_guard_rejection_skips_generator() {
        let mut session = WizardSession::new(ScriptedGenerator::new());
        session
            .set_field(FormField::ProductName, "Artisan Coffee")
            .unwrap();

        let err = session.advance().await.unwrap_err();
        assert_eq!(err, WizardError::GuardRejected { stage: "product" });
        assert_eq!(session.generator().calls().get(), 0);
    }

    #[tokio::test]
    async fn test_dropped_advance_can_be_abandoned() {
        let mut session =
            WizardSession::new(ScriptedGenerator::new().with_delay(Duration::from_secs(30)));
        let form = artisan_coffee_form();
        for field in FormField::ALL {
            session.set_field(field, form.get(field)).unwrap();
        }
        session.advance().await.unwrap();

        let timed_out = tokio::time::timeout(Duration::from_millis(20), session.advance()).await;
        assert!(timed_out.is_err());
        assert_eq!(session.stage(), Stage::Generating);
        assert!(session.set_field(FormField::TargetAudience, "x").is_err());

        session.abandon_generation().unwrap();
        assert_eq!(session.stage(), Stage::CollectingAudience);
        assert!(session.view().error.is_none());
        assert!(session.abandon_generation().is_err());
        assert_eq!(session.generator().calls().get(), 1);
    }

    #[tokio::test]
    async fn test_reset_after_review_starts_fresh() {
        let mut session = WizardSession::new(ScriptedGenerator::new());
        fill_and_submit(&mut session).await;
        session.reset().unwrap();

        assert_eq!(session.stage(), Stage::CollectingProduct);
        assert!(session.view().form.first_blank().is_some());
    }
}
