//! Patients listed by the backend directory.

use serde::{Deserialize, Serialize};

/// A selectable patient as returned by `GET /patients`.
///
/// The directory endpoint deliberately omits medical history and risk factors; those stay
/// on the backend and only influence the assessment it computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Unique, stable identifier (for example `PT-101`).
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    /// Presenting symptoms in the order the backend records them.
    #[serde(default)]
    pub symptoms: Vec<String>,
}

impl Patient {
    /// Symptoms joined for single-line display.
    pub fn symptom_summary(&self) -> String {
        self.symptoms.join(", ")
    }
}
