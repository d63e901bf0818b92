//! Assessment orchestration.
//!
//! Owns the patient selection and drives one request/response assessment cycle at a time.
//! At any moment there is either no result or exactly one; a new request clears the previous
//! result before it is issued, and results are never merged or compared.
//!
//! The cycle is split into [`AssessmentOrchestrator::begin_assessment`] and
//! [`AssessmentOrchestrator::finish_assessment`] joined by an [`AssessmentTicket`]. A ticket
//! goes stale as soon as a newer assessment begins or the current one is cancelled, and a
//! stale completion is discarded. [`AssessmentOrchestrator::run_assessment`] composes the two
//! around the backend call.

use crate::cancel::CancelToken;
use crate::directory::PatientDirectory;
use crate::urgency::UrgencyTier;
use crate::{Backend, ClientError, ClientResult};
use ng12_types::{AssessRequest, AssessmentResult, Patient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssessmentStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Proof that an assessment was begun; consumed by `finish_assessment`.
#[derive(Debug)]
#[must_use = "an assessment ticket must be finished or the orchestrator stays loading"]
pub struct AssessmentTicket {
    generation: u64,
    request: AssessRequest,
}

impl AssessmentTicket {
    pub fn request(&self) -> &AssessRequest {
        &self.request
    }
}

/// Assessment state for one view.
pub struct AssessmentOrchestrator<B> {
    backend: B,
    directory: PatientDirectory,
    selected_patient_id: Option<String>,
    status: AssessmentStatus,
    result: Option<AssessmentResult>,
    error_message: Option<String>,
    generation: u64,
}

impl<B: Backend> AssessmentOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            directory: PatientDirectory::new(),
            selected_patient_id: None,
            status: AssessmentStatus::Idle,
            result: None,
            error_message: None,
            generation: 0,
        }
    }

    /// Fetches the patient directory.
    ///
    /// On success, if nothing is selected yet, the first returned patient becomes the
    /// selection. On failure the message is surfaced through `error_message` and the
    /// previous directory is kept.
    pub async fn load_patients(&mut self, cancel: &CancelToken) -> ClientResult<()> {
        let first = match self.directory.refresh(&self.backend, cancel).await {
            Ok(patients) => patients.first().map(|p| p.patient_id.clone()),
            Err(err) => {
                self.error_message = Some(format!("Error loading patients: {}", err));
                return Err(err);
            }
        };

        if self.selected_patient_id.is_none() {
            if let Some(id) = first {
                tracing::debug!("defaulting selection to first patient {}", id);
                self.selected_patient_id = Some(id);
            }
        }
        Ok(())
    }

    /// Selects a patient. Pure state update; an in-flight assessment keeps running.
    pub fn select_patient(&mut self, patient_id: impl Into<String>) {
        self.selected_patient_id = Some(patient_id.into());
    }

    /// Returns the selection to absent.
    pub fn clear_selection(&mut self) {
        self.selected_patient_id = None;
    }

    /// Validates the selection and moves into `Loading`.
    ///
    /// Clears any previous result and error message. Without a selection this fails with
    /// [`ClientError::NoPatientSelected`]; only `error_message` changes in that case.
    pub fn begin_assessment(&mut self) -> ClientResult<AssessmentTicket> {
        let Some(patient_id) = self.selected_patient_id.clone() else {
            let err = ClientError::NoPatientSelected;
            self.error_message = Some(err.to_string());
            return Err(err);
        };

        self.generation += 1;
        self.result = None;
        self.error_message = None;
        self.status = AssessmentStatus::Loading;

        Ok(AssessmentTicket {
            generation: self.generation,
            request: AssessRequest { patient_id },
        })
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Returns `false` (and changes nothing) if the ticket is stale.
    pub fn finish_assessment(
        &mut self,
        ticket: AssessmentTicket,
        outcome: &ClientResult<AssessmentResult>,
    ) -> bool {
        if ticket.generation != self.generation || self.status != AssessmentStatus::Loading {
            tracing::warn!(
                "discarding stale assessment for {} (ticket {}, current {})",
                ticket.request.patient_id,
                ticket.generation,
                self.generation
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(
                    "assessment for {}: {}",
                    result.patient_id,
                    result.recommendation
                );
                self.result = Some(result.clone());
                self.status = AssessmentStatus::Success;
            }
            Err(ClientError::Cancelled) => {
                self.status = AssessmentStatus::Idle;
            }
            Err(err) => {
                tracing::warn!("assessment for {} failed: {}", ticket.request.patient_id, err);
                self.result = None;
                self.error_message = Some(format!("Error: {}", err));
                self.status = AssessmentStatus::Error;
            }
        }
        true
    }

    /// Abandons the in-flight assessment, if any. Its completion will be discarded.
    pub fn cancel_assessment(&mut self) {
        if self.status == AssessmentStatus::Loading {
            tracing::debug!("cancelling assessment generation {}", self.generation);
            self.generation += 1;
            self.status = AssessmentStatus::Idle;
        }
    }

    /// Runs one full assessment cycle for the current selection.
    ///
    /// The outcome is reflected in `status`, `result` and `error_message`; the error is also
    /// returned for callers that want to log it. No retry is attempted.
    pub async fn run_assessment(&mut self, cancel: &CancelToken) -> ClientResult<()> {
        let ticket = self.begin_assessment()?;
        let outcome = cancel.run(self.backend.assess(ticket.request())).await;
        self.finish_assessment(ticket, &outcome);
        outcome.map(|_| ())
    }

    pub fn directory(&self) -> &PatientDirectory {
        &self.directory
    }

    pub fn patients(&self) -> &[Patient] {
        self.directory.patients()
    }

    pub fn selected_patient_id(&self) -> Option<&str> {
        self.selected_patient_id.as_deref()
    }

    /// The selected patient as listed in the directory, if it is listed.
    pub fn selected_patient(&self) -> Option<&Patient> {
        self.selected_patient_id
            .as_deref()
            .and_then(|id| self.directory.find(id))
    }

    pub fn status(&self) -> AssessmentStatus {
        self.status
    }

    pub fn result(&self) -> Option<&AssessmentResult> {
        self.result.as_ref()
    }

    /// Tier of the current result's recommendation; `None` when there is no result or the
    /// recommendation is unrecognised.
    pub fn urgency(&self) -> Option<UrgencyTier> {
        self.result
            .as_ref()
            .and_then(|r| UrgencyTier::for_recommendation(&r.recommendation))
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether the assess control should be enabled.
    pub fn can_assess(&self) -> bool {
        self.selected_patient_id.is_some() && self.status != AssessmentStatus::Loading
    }
}
