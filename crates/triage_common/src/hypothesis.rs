//! Causal hypotheses and the probability-ordered belief set.
//!
//! A session carries a small set of candidate explanations, each with an
//! advisory probability. Probabilities come from the LLM and are stored
//! as-is: they are not renormalized and are not required to sum to 1
//! across the set.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One candidate explanation for the user's issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    /// Short label, used as a case-insensitive lookup key within a session.
    pub name: String,
    /// Plain-English reason why this might be happening.
    pub description: String,
    /// Advisory likelihood in [0.0, 1.0]. Stored as given, no clamping.
    pub probability: f64,
    /// Observations that would support or contradict this hypothesis.
    #[serde(default)]
    pub key_evidence: Vec<String>,
}

/// The ordered collection of hypotheses for one session.
///
/// Insertion order is preserved; `top_k` uses a stable sort so equal
/// probabilities keep their original relative order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HypothesisSet {
    hypotheses: Vec<Hypothesis>,
}

impl HypothesisSet {
    /// Store the batch as-is. No renormalization, no range validation.
    pub fn new(hypotheses: Vec<Hypothesis>) -> Self {
        Self { hypotheses }
    }

    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hypothesis> {
        self.hypotheses.iter()
    }

    /// Hypotheses ordered by probability descending, ties broken by
    /// insertion order (stable sort), truncated to `k`.
    pub fn top_k(&self, k: usize) -> Vec<&Hypothesis> {
        let mut sorted: Vec<&Hypothesis> = self.hypotheses.iter().collect();
        sorted.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
        });
        sorted.truncate(k);
        sorted
    }

    /// The probability-maximal hypothesis, if any.
    pub fn top(&self) -> Option<&Hypothesis> {
        self.top_k(1).into_iter().next()
    }

    /// Point-update one hypothesis by case-insensitive name match.
    ///
    /// Returns `false` when no hypothesis matched; the update is then
    /// silently dropped, which is the contract - unknown names are not
    /// an error. Hypotheses not mentioned keep their prior probability.
    pub fn apply_update(&mut self, name: &str, new_probability: f64) -> bool {
        for hyp in &mut self.hypotheses {
            if hyp.name.eq_ignore_ascii_case(name) {
                hyp.probability = new_probability;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hyp(name: &str, probability: f64) -> Hypothesis {
        Hypothesis {
            name: name.to_string(),
            description: format!("{} description", name),
            probability,
            key_evidence: vec![],
        }
    }

    #[test]
    fn test_top_k_orders_by_probability_descending() {
        let set = HypothesisSet::new(vec![hyp("a", 0.2), hyp("b", 0.7), hyp("c", 0.5)]);
        let top = set.top_k(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "b");
        assert_eq!(top[1].name, "c");
    }

    #[test]
    fn test_top_k_ties_keep_insertion_order() {
        let set = HypothesisSet::new(vec![hyp("first", 0.5), hyp("second", 0.5), hyp("third", 0.5)]);
        let top = set.top_k(3);
        assert_eq!(top[0].name, "first");
        assert_eq!(top[1].name, "second");
        assert_eq!(top[2].name, "third");
    }

    #[test]
    fn test_apply_update_is_case_insensitive() {
        let mut set = HypothesisSet::new(vec![hyp("Dehydration", 0.3), hyp("Migraine", 0.6)]);
        assert!(set.apply_update("dehydration", 0.9));
        let top = set.top().unwrap();
        assert_eq!(top.name, "Dehydration");
        assert_eq!(top.probability, 0.9);
    }

    #[test]
    fn test_apply_update_unknown_name_is_dropped() {
        let mut set = HypothesisSet::new(vec![hyp("a", 0.4), hyp("b", 0.3)]);
        assert!(!set.apply_update("nonexistent", 0.99));
        assert_eq!(set.top().unwrap().name, "a");
        assert_eq!(set.top().unwrap().probability, 0.4);
    }

    #[test]
    fn test_probabilities_stored_as_is() {
        // Out-of-range and non-normalized values pass through untouched.
        let set = HypothesisSet::new(vec![hyp("a", 1.4), hyp("b", 0.9)]);
        assert_eq!(set.top().unwrap().probability, 1.4);
        let sum: f64 = set.iter().map(|h| h.probability).sum();
        assert!(sum > 1.0);
    }
}
