//! Coarse domain classification by keyword membership.
//!
//! The stopping policy is stricter for health-like issues. The original
//! service kept three slightly divergent keyword lists; this is the
//! single consolidated vocabulary.

/// Health vocabulary. Any case-insensitive hit classifies the issue as
/// health-like.
pub const HEALTH_KEYWORDS: &[&str] = &[
    "vomiting", "headache", "fever", "pain", "sick", "ill", "symptom", "dizzy", "nausea",
    "feeling", "health", "disease", "hurt", "ache", "cough", "fatigue",
];

/// Domain tag selecting a stopping-policy bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Health,
    General,
}

impl Domain {
    /// Key into the policy table.
    pub fn policy_key(&self) -> &'static str {
        match self {
            Domain::Health => "health",
            Domain::General => "general",
        }
    }

    /// Label used in prompt text.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Health => "HEALTH/MEDICAL",
            Domain::General => "TECHNICAL/HOME/GENERAL",
        }
    }
}

/// Classify a free-text issue description. Total and deterministic:
/// keyword order has no effect, no-match means general.
pub fn classify(text: &str) -> Domain {
    let lower = text.to_lowercase();
    if HEALTH_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Domain::Health
    } else {
        Domain::General
    }
}
