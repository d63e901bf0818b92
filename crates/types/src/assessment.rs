//! Assessment request and result bodies.

use crate::{null_as_empty, Citation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk stratification returned by the backend.
///
/// The backend emits free text. The three NG12 pathways are recognised, and anything else
/// is kept verbatim in [`Recommendation::Unrecognised`] so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recommendation {
    RoutineGpScreening,
    UrgentReferral,
    SameDayReferral,
    Unrecognised(String),
}

impl Recommendation {
    pub const ROUTINE_GP_SCREENING: &'static str = "Routine GP Screening";
    pub const URGENT_REFERRAL: &'static str = "Urgent Referral";
    pub const SAME_DAY_REFERRAL: &'static str = "Same-Day Referral";

    /// The label exactly as the backend sent it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::RoutineGpScreening => Self::ROUTINE_GP_SCREENING,
            Self::UrgentReferral => Self::URGENT_REFERRAL,
            Self::SameDayReferral => Self::SAME_DAY_REFERRAL,
            Self::Unrecognised(raw) => raw,
        }
    }

    pub fn is_recognised(&self) -> bool {
        !matches!(self, Self::Unrecognised(_))
    }
}

impl From<String> for Recommendation {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::ROUTINE_GP_SCREENING => Self::RoutineGpScreening,
            Self::URGENT_REFERRAL => Self::UrgentReferral,
            Self::SAME_DAY_REFERRAL => Self::SameDayReferral,
            _ => Self::Unrecognised(value),
        }
    }
}

impl From<&str> for Recommendation {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Recommendation> for String {
    fn from(value: Recommendation) -> Self {
        match value {
            Recommendation::Unrecognised(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /assess`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessRequest {
    pub patient_id: String,
}

/// Body returned by `POST /assess`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub patient_id: String,
    pub patient_name: String,
    pub age: u32,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub recommendation: Recommendation,
    pub reasoning: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub citations: Vec<Citation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_recommendations_decode_to_variants() {
        let rec: Recommendation = serde_json::from_str("\"Same-Day Referral\"").unwrap();
        assert_eq!(rec, Recommendation::SameDayReferral);
        assert!(rec.is_recognised());
    }

    #[test]
    fn unknown_recommendation_keeps_raw_text() {
        let rec: Recommendation = serde_json::from_str("\"Watchful waiting\"").unwrap();
        assert_eq!(rec, Recommendation::Unrecognised("Watchful waiting".into()));
        assert_eq!(rec.as_str(), "Watchful waiting");
        assert_eq!(serde_json::to_string(&rec).unwrap(), "\"Watchful waiting\"");
    }

    #[test]
    fn recommendation_match_is_exact() {
        let rec = Recommendation::from("urgent referral");
        assert!(!rec.is_recognised());
    }

    #[test]
    fn assessment_result_tolerates_null_citations() {
        let body = r#"{
            "patient_id": "PT-101",
            "patient_name": "John Doe",
            "age": 55,
            "symptoms": ["unexplained hemoptysis"],
            "recommendation": "Urgent Referral",
            "reasoning": "Hemoptysis in a patient over 40.",
            "citations": null
        }"#;

        let result: AssessmentResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.recommendation, Recommendation::UrgentReferral);
        assert!(result.citations.is_empty());
    }
}
