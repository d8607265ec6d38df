//! Term and category models consumed by risk detection.

use serde::{Deserialize, Serialize};

use super::negotiation::NegotiationStatus;

/// A single negotiated term as seen by the risk engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSummary {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub negotiation_status: NegotiationStatus,
    #[serde(default)]
    pub pending_proposals_count: u32,
    #[serde(default)]
    pub comments_count: u32,
}

impl TermSummary {
    pub fn new(id: impl Into<String>, label: impl Into<String>, status: NegotiationStatus) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            negotiation_status: status,
            pending_proposals_count: 0,
            comments_count: 0,
        }
    }

    pub fn with_pending_proposals(mut self, count: u32) -> Self {
        self.pending_proposals_count = count;
        self
    }

    pub fn with_comments(mut self, count: u32) -> Self {
        self.comments_count = count;
        self
    }

    pub fn is_under_discussion(&self) -> bool {
        self.negotiation_status == NegotiationStatus::UnderDiscussion
    }
}

/// Terms grouped under a named category (e.g. "Pricing", "Financial Covenants").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithTerms {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub terms: Vec<TermSummary>,
}

impl CategoryWithTerms {
    pub fn new(name: impl Into<String>, terms: Vec<TermSummary>) -> Self {
        let name = name.into();
        Self {
            id: name.to_lowercase().replace(' ', "-"),
            name,
            terms,
        }
    }

    /// Case-insensitive substring match on the category name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    pub fn terms_under_discussion(&self) -> impl Iterator<Item = &TermSummary> {
        self.terms.iter().filter(|t| t.is_under_discussion())
    }
}

/// Count all terms, and finalized (agreed or locked) terms, across categories.
pub fn term_progress(categories: &[CategoryWithTerms]) -> (u32, u32) {
    categories
        .iter()
        .flat_map(|c| c.terms.iter())
        .fold((0, 0), |(total, agreed), term| {
            let finalized = u32::from(term.negotiation_status.is_finalized());
            (total + 1, agreed + finalized)
        })
}
