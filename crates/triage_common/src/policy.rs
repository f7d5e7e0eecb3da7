//! Stopping-policy bundles and hard turn bounds.
//!
//! The per-domain thresholds are advisory context handed to the
//! collaborator when it judges stop/continue. The two hard bounds below
//! are enforced by the conversation driver regardless of that judgment
//! and are the actual correctness-critical policy.

use serde::{Deserialize, Serialize};

/// Driver-enforced floor: never honor a STOP verdict before this many
/// answered questions.
pub const MIN_ANSWERS_BEFORE_STOP: u32 = 4;

/// Driver-enforced cap: always stop once this many questions have been
/// answered, overriding a CONTINUE verdict.
pub const MAX_ANSWERS: u32 = 8;

/// Named policy bundle selected by domain tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainPolicy {
    /// Minimum top-hypothesis confidence before stopping.
    pub min_confidence: f64,
    /// Minimum answered questions before stopping.
    pub min_questions: u32,
    /// Minimum probability gap between the top two hypotheses.
    pub min_gap: f64,
}

/// Look up the bundle for a domain tag. Unrecognized tags fall back to
/// the general bundle.
pub fn policy_for(tag: &str) -> DomainPolicy {
    match tag {
        "health" | "medical" => DomainPolicy {
            min_confidence: 0.85,
            min_questions: 4,
            min_gap: 0.40,
        },
        "safety" => DomainPolicy {
            min_confidence: 0.80,
            min_questions: 3,
            min_gap: 0.35,
        },
        "tech" => DomainPolicy {
            min_confidence: 0.65,
            min_questions: 2,
            min_gap: 0.20,
        },
        _ => DomainPolicy {
            min_confidence: 0.70,
            min_questions: 2,
            min_gap: 0.25,
        },
    }
}

/// Advisory stop/continue judgment returned by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Continue,
    Stop,
}

impl Verdict {
    /// Lenient parse; anything that is not a clear STOP keeps the
    /// conversation going.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("stop") {
            Verdict::Stop
        } else {
            Verdict::Continue
        }
    }
}
