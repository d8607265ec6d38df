//! Deal snapshot: everything the engine needs to assess one deal.
//!
//! This is the input document exchanged with callers. Participants may be
//! supplied either as precomputed engagement rows or as a bare roster, in
//! which case engagement is derived from the activity log.

use serde::{Deserialize, Serialize};

use super::activity::{ActivityEvent, ParticipantEngagement, ParticipantProfile};
use super::terms::{term_progress, CategoryWithTerms};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealSnapshot {
    pub deal_id: String,
    #[serde(default)]
    pub activities: Vec<ActivityEvent>,
    /// Precomputed engagement rows. Takes precedence over `roster`.
    #[serde(default)]
    pub participants: Vec<ParticipantEngagement>,
    #[serde(default)]
    pub roster: Vec<ParticipantProfile>,
    #[serde(default)]
    pub categories: Vec<CategoryWithTerms>,
    #[serde(default)]
    pub total_terms: Option<u32>,
    #[serde(default)]
    pub agreed_terms: Option<u32>,
}

impl DealSnapshot {
    /// Explicit term counts when given, otherwise counted from the categories.
    pub fn term_counts(&self) -> (u32, u32) {
        let (derived_total, derived_agreed) = term_progress(&self.categories);
        (
            self.total_terms.unwrap_or(derived_total),
            self.agreed_terms.unwrap_or(derived_agreed),
        )
    }
}
