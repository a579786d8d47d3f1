//! Ad generation core: data model, orchestrator and wizard state machine.
//!
//! The [`orchestrator::AdOrchestrator`] issues the content and image requests
//! concurrently and merges them into one [`model::AdData`] or one
//! [`GenerationError`](adcraft_utils::error::GenerationError). The
//! [`wizard::WizardController`] sequences the four stages and emits exactly one
//! generation request per entry into the generating stage;
//! [`session::WizardSession`] executes it.

pub use adcraft_config as config;
pub use adcraft_llm as llm;

pub use adcraft_utils::error;

pub mod model;
pub mod orchestrator;
pub mod parse;
pub mod progress;
pub mod prompts;
pub mod schema;
pub mod session;
pub mod wizard;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use model::{AdContent, AdCreative, AdData, AdFormData, Advisory, FormField, TargetingSuggestions};
pub use orchestrator::{AdGenerator, AdOrchestrator};
pub use session::WizardSession;
pub use wizard::{GenerationRequest, GenerationTicket, Stage, StepProgress, WizardController, WizardView};
