//! Data Transfer Objects for the REST API.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Note: ToSchema is derived on all DTOs for OpenAPI generation, TS for the front-end bindings

use crate::listing::ListingForm;
use crate::session::WizardSession;
use crate::wizard::{Step, StepSequencer};

// =============================================================================
// Health DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: usize,
    pub catalog_steps: usize,
}

// =============================================================================
// Step DTOs
// =============================================================================

/// A catalog step as seen under a given classification
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
pub struct StepResponse {
    pub index: usize,
    pub id: String,
    pub title: String,
    /// Hidden for the active classification
    pub skipped: bool,
}

impl StepResponse {
    pub fn new(index: usize, step: &Step, sequencer: &StepSequencer) -> Self {
        Self {
            index,
            id: step.id.clone(),
            title: step.title.clone(),
            skipped: !sequencer.is_visible(index),
        }
    }

    /// Every catalog step, flagged for the sequencer's classification
    pub fn all(sequencer: &StepSequencer) -> Vec<Self> {
        sequencer
            .catalog()
            .steps()
            .iter()
            .enumerate()
            .map(|(i, step)| Self::new(i, step, sequencer))
            .collect()
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StepsQuery {
    /// Classification tag; unknown or missing tags hide nothing
    pub classification: Option<String>,
}

// =============================================================================
// Session DTOs
// =============================================================================

/// Request to open a wizard session
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, TS)]
pub struct CreateSessionRequest {
    /// Classification for a new listing (ignored when resuming)
    #[serde(default)]
    pub classification: Option<String>,
    /// Resume a persisted listing instead of starting a new one
    #[serde(default)]
    pub listing_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
pub struct JumpRequest {
    pub target: usize,
}

/// Current state of a wizard session
#[derive(Debug, Serialize, Deserialize, ToSchema, TS)]
pub struct SessionResponse {
    pub listing_id: Uuid,
    pub classification: String,
    pub current_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<StepResponse>,
    pub form_position: usize,
    /// Fraction of visible steps reached, 0 to 1
    pub progress: f64,
    pub visible_steps: Vec<usize>,
    /// Visible steps whose form section has been filled in
    pub completed_steps: Vec<usize>,
    pub is_last_step: bool,
    /// Changes not yet handed to persistence
    pub dirty: bool,
    pub form: ListingForm,
}

impl From<&WizardSession> for SessionResponse {
    fn from(session: &WizardSession) -> Self {
        let sequencer = session.sequencer();
        let current_index = sequencer.current_index();
        let form = session.snapshot();
        let completed_steps = sequencer
            .visible_indices()
            .into_iter()
            .filter(|&i| sequencer.step(i).is_some_and(|step| form.has_section(&step.id)))
            .collect();
        Self {
            listing_id: session.listing_id(),
            classification: sequencer.classification().to_string(),
            current_index,
            current_step: sequencer
                .current_step()
                .map(|step| StepResponse::new(current_index, step, sequencer)),
            form_position: session.form_position(),
            progress: sequencer.progress_fraction(),
            visible_steps: sequencer.visible_indices(),
            completed_steps,
            is_last_step: sequencer.is_on_last_visible(),
            dirty: session.store().is_dirty(),
            form,
        }
    }
}
