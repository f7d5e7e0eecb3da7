//! Confidence gate: decides, per turn, whether to keep asking.
//!
//! The numeric inputs (top probability, gap) and the domain thresholds
//! are computed here and handed to the collaborator, whose returned
//! score/verdict is advisory only - it may be inconsistent from turn to
//! turn. The hard bounds in [`should_stop`] are what actually governs
//! the conversation.

use crate::extract::extract_as;
use crate::llm::LlmClient;
use crate::prompts::build_confidence_prompt;
use serde::Deserialize;
use tracing::{debug, warn};
use triage_common::{
    classify, policy_for, HypothesisSet, Verdict, MAX_ANSWERS, MIN_ANSWERS_BEFORE_STOP,
};

/// Numbers the gate computes from the current hypothesis set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateInputs {
    /// Probability of the probability-maximal hypothesis (0 if empty).
    pub top_probability: f64,
    /// Distance to the runner-up (0 if fewer than two hypotheses).
    pub gap: f64,
}

/// Compute top probability and gap with the set's stable ordering.
pub fn gate_inputs(hypotheses: &HypothesisSet) -> GateInputs {
    let top = hypotheses.top_k(2);
    let top_probability = top.first().map(|h| h.probability).unwrap_or(0.0);
    let second = top.get(1).map(|h| h.probability).unwrap_or(0.0);
    GateInputs {
        top_probability,
        gap: if top.len() < 2 {
            0.0
        } else {
            top_probability - second
        },
    }
}

/// Advisory judgment extracted from the collaborator's reply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateDecision {
    pub confidence: f64,
    pub verdict: Verdict,
}

impl Default for GateDecision {
    /// Substituted when the collaborator's reply cannot be parsed:
    /// middling confidence, keep asking.
    fn default() -> Self {
        Self {
            confidence: 0.5,
            verdict: Verdict::Continue,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawJudgment {
    #[serde(default)]
    confidence_score: Option<f64>,
    #[serde(default)]
    verdict: Option<String>,
}

/// Parse the collaborator's judgment, degrading to defaults on any
/// malformed field. Never errors.
pub fn parse_judgment(raw: &str) -> GateDecision {
    match extract_as::<RawJudgment>(raw) {
        Ok(judgment) => GateDecision {
            confidence: judgment.confidence_score.unwrap_or(0.5),
            verdict: judgment
                .verdict
                .as_deref()
                .map(Verdict::parse)
                .unwrap_or(Verdict::Continue),
        },
        Err(e) => {
            warn!("Confidence judgment unparseable, using defaults: {}", e);
            GateDecision::default()
        }
    }
}

/// Driver-level hard bounds, applied on top of the advisory verdict:
/// never stop before [`MIN_ANSWERS_BEFORE_STOP`] answers, always stop at
/// [`MAX_ANSWERS`].
pub fn should_stop(verdict: Verdict, answer_count: u32) -> bool {
    (verdict == Verdict::Stop && answer_count >= MIN_ANSWERS_BEFORE_STOP)
        || answer_count >= MAX_ANSWERS
}

/// Run one gate evaluation: classify the domain, pick the policy bundle,
/// ask the collaborator, parse leniently. A transport failure degrades to
/// the default decision - the gate never fails the request.
pub async fn evaluate(
    llm: &LlmClient,
    temperature: f32,
    main_issue: &str,
    hypotheses: &HypothesisSet,
    answer_count: u32,
) -> GateDecision {
    let domain = classify(main_issue);
    let policy = policy_for(domain.policy_key());
    let inputs = gate_inputs(hypotheses);
    debug!(
        "Gate: domain={:?} top={:.2} gap={:.2} answers={}",
        domain, inputs.top_probability, inputs.gap, answer_count
    );
    let prompt = build_confidence_prompt(main_issue, hypotheses, answer_count, domain, &policy);

    match llm.generate(&prompt, temperature).await {
        Ok(raw) => parse_judgment(&raw),
        Err(e) => {
            warn!("Confidence call failed, using defaults: {}", e);
            GateDecision::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use triage_common::Hypothesis;

    fn hyp(name: &str, probability: f64) -> Hypothesis {
        Hypothesis {
            name: name.to_string(),
            description: String::new(),
            probability,
            key_evidence: vec![],
        }
    }

    #[test]
    fn test_gate_inputs_top_and_gap() {
        let set = HypothesisSet::new(vec![hyp("a", 0.7), hyp("b", 0.2), hyp("c", 0.1)]);
        let inputs = gate_inputs(&set);
        assert_relative_eq!(inputs.top_probability, 0.7);
        assert_relative_eq!(inputs.gap, 0.5);
    }

    #[test]
    fn test_gate_inputs_single_hypothesis_gap_is_zero() {
        let set = HypothesisSet::new(vec![hyp("only", 0.9)]);
        let inputs = gate_inputs(&set);
        assert_relative_eq!(inputs.top_probability, 0.9);
        assert_relative_eq!(inputs.gap, 0.0);
    }

    #[test]
    fn test_gate_inputs_empty_set() {
        let inputs = gate_inputs(&HypothesisSet::default());
        assert_relative_eq!(inputs.top_probability, 0.0);
        assert_relative_eq!(inputs.gap, 0.0);
    }

    #[test]
    fn test_should_stop_floor() {
        // STOP verdicts before 4 answers are never honored.
        for count in 0..MIN_ANSWERS_BEFORE_STOP {
            assert!(!should_stop(Verdict::Stop, count));
        }
        assert!(should_stop(Verdict::Stop, MIN_ANSWERS_BEFORE_STOP));
    }

    #[test]
    fn test_should_stop_cap_overrides_continue() {
        assert!(!should_stop(Verdict::Continue, 7));
        assert!(should_stop(Verdict::Continue, MAX_ANSWERS));
        assert!(should_stop(Verdict::Continue, MAX_ANSWERS + 3));
    }

    #[test]
    fn test_parse_judgment_happy_path() {
        let decision = parse_judgment(r#"{"confidence_score": 0.82, "verdict": "STOP"}"#);
        assert_relative_eq!(decision.confidence, 0.82);
        assert_eq!(decision.verdict, Verdict::Stop);
    }

    #[test]
    fn test_parse_judgment_garbage_degrades_to_defaults() {
        let decision = parse_judgment("I think we should keep going, no JSON for you");
        assert_relative_eq!(decision.confidence, 0.5);
        assert_eq!(decision.verdict, Verdict::Continue);
    }

    #[test]
    fn test_parse_judgment_missing_fields() {
        let decision = parse_judgment(r#"{"reasoning": "hmm"}"#);
        assert_relative_eq!(decision.confidence, 0.5);
        assert_eq!(decision.verdict, Verdict::Continue);
    }
}
