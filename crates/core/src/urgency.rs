//! Presentation emphasis for recommendations.

use ng12_types::Recommendation;

/// Severity tier of a recognised recommendation, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UrgencyTier {
    Routine,
    Urgent,
    SameDay,
}

impl UrgencyTier {
    /// Fixed lookup from recommendation to tier.
    ///
    /// Returns `None` for an unrecognised recommendation, which views render neutral and
    /// unstyled while still showing the raw label.
    pub fn for_recommendation(recommendation: &Recommendation) -> Option<Self> {
        match recommendation {
            Recommendation::RoutineGpScreening => Some(Self::Routine),
            Recommendation::UrgentReferral => Some(Self::Urgent),
            Recommendation::SameDayReferral => Some(Self::SameDay),
            Recommendation::Unrecognised(_) => None,
        }
    }
}
