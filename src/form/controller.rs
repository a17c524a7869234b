use serde::Serialize;

use super::phone::{digits_only, format_phone};
use super::validate::validate;
use crate::api::{ApiError, LeadResult, LeadService, LeadSubmission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormPhase {
    Editing,
    /// A request is in flight; inputs and the submit control are disabled.
    Submitting,
    Succeeded,
    /// The service rejected the last submission. Behaves like `Editing`
    /// with the error still shown.
    Failed,
}

/// What the form renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub email: String,
    /// Display-formatted.
    pub phone: String,
    pub loading: bool,
    pub error: Option<String>,
}

/// Handed to the confirmation view after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub email: String,
    pub target_url: Option<String>,
}

pub struct SignupForm {
    state: FormState,
    phase: FormPhase,
    source: String,
    pending: Option<LeadSubmission>,
}

impl SignupForm {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            state: FormState::default(),
            phase: FormPhase::Editing,
            source: source.into(),
            pending: None,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn can_submit(&self) -> bool {
        self.phase != FormPhase::Submitting
    }

    pub fn set_email(&mut self, value: &str) {
        if self.phase == FormPhase::Submitting {
            return;
        }
        self.state.email = value.to_string();
        self.touch();
    }

    pub fn set_phone(&mut self, value: &str) {
        if self.phase == FormPhase::Submitting {
            return;
        }
        self.state.phone = format_phone(value);
        self.touch();
    }

    fn touch(&mut self) {
        self.state.error = None;
        self.phase = FormPhase::Editing;
    }

    /// Validate and move to `Submitting`. Returns the payload to send, or
    /// `None` if validation failed or a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<LeadSubmission> {
        if !self.can_submit() {
            log::debug!("Submit ignored: request already in flight");
            return None;
        }

        if let Err(e) = validate(&self.state.email, &self.state.phone) {
            log::debug!("Form rejected locally: {}", e);
            self.state.error = Some(e.to_string());
            self.phase = FormPhase::Editing;
            return None;
        }

        let lead = LeadSubmission {
            email: self.state.email.trim().to_string(),
            phone: digits_only(&self.state.phone),
            source: self.source.clone(),
        };

        self.state.error = None;
        self.state.loading = true;
        self.phase = FormPhase::Submitting;
        self.pending = Some(lead.clone());
        Some(lead)
    }

    /// Apply the service's answer to the in-flight submission.
    pub fn complete_submit(
        &mut self,
        result: Result<LeadResult, ApiError>,
    ) -> Option<SubmitOutcome> {
        let Some(lead) = self.pending.take() else {
            log::warn!("Submission result arrived with nothing in flight");
            return None;
        };
        self.state.loading = false;

        match result {
            Ok(created) => {
                log::info!("Lead registered: {}", lead.email);
                self.state.email.clear();
                self.state.phone.clear();
                self.phase = FormPhase::Succeeded;
                Some(SubmitOutcome {
                    email: lead.email,
                    target_url: created.group_url().map(str::to_string),
                })
            }
            Err(e) => {
                log::error!("Lead submission failed: {:?}", e);
                self.state.error = Some(e.to_string());
                self.phase = FormPhase::Failed;
                None
            }
        }
    }

    pub async fn submit<S: LeadService>(&mut self, service: &S) -> Option<SubmitOutcome> {
        let lead = self.begin_submit()?;
        let result = service.submit_lead(&lead).await;
        self.complete_submit(result)
    }
}
