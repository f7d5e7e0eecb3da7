//! Diagnostic session state.
//!
//! One `Session` per conversation, created at intake and destroyed when a
//! final response is issued (or by the idle sweep). Mutated once per
//! submitted answer.

use crate::hypothesis::{Hypothesis, HypothesisSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Urgency of the reported issue, as judged at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Low
    }
}

impl RiskLevel {
    /// Lenient parse of the LLM-supplied level. Anything unrecognized
    /// degrades to `Low`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" => RiskLevel::High,
            "moderate" | "medium" => RiskLevel::Moderate,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }
}

/// One answered question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
}

/// Structured intake result from the collaborator: issue summary, risk
/// judgment, and the initial hypothesis batch.
#[derive(Debug, Clone, Deserialize)]
pub struct Intake {
    pub main_issue: String,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub hypotheses: Vec<Hypothesis>,
}

/// The stateful context of one diagnostic conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The user's original free-text message, verbatim.
    pub original_message: String,
    /// Normalized one-sentence issue summary.
    pub main_issue: String,
    pub risk_level: RiskLevel,
    pub hypotheses: HypothesisSet,
    /// All question/answer pairs, in order.
    pub answers_history: Vec<AnswerRecord>,
    /// Every question ever asked, deduplicated. A superset of the
    /// questions in `answers_history` - a question is registered here
    /// before it is answered.
    pub asked_questions: Vec<String>,
    /// Invariant: equals `answers_history.len()`.
    pub answer_count: u32,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation; drives the idle sweep.
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(original_message: &str, intake: Intake) -> Self {
        let now = Utc::now();
        Self {
            original_message: original_message.to_string(),
            main_issue: intake.main_issue,
            risk_level: RiskLevel::parse(&intake.risk_level),
            hypotheses: HypothesisSet::new(intake.hypotheses),
            answers_history: Vec::new(),
            asked_questions: Vec::new(),
            answer_count: 0,
            created_at: now,
            last_activity: now,
        }
    }

    /// Register a question that was (or is about to be) asked.
    /// Duplicates are ignored.
    pub fn register_question(&mut self, question: &str) {
        if !question.is_empty() && !self.asked_questions.iter().any(|q| q == question) {
            self.asked_questions.push(question.to_string());
        }
        self.touch();
    }

    /// Append an answered question to history, register the question,
    /// and bump the answer count.
    pub fn record_answer(&mut self, question: &str, answer: &str) {
        self.answers_history.push(AnswerRecord {
            question: question.to_string(),
            answer: answer.to_string(),
        });
        if !self.asked_questions.iter().any(|q| q == question) {
            self.asked_questions.push(question.to_string());
        }
        self.answer_count += 1;
        self.touch();
    }

    /// The most recently asked question, or the placeholder label when
    /// none was ever registered.
    pub fn last_question(&self) -> String {
        self.asked_questions
            .last()
            .cloned()
            .unwrap_or_else(|| "Initial question".to_string())
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake() -> Intake {
        Intake {
            main_issue: "Recurring headaches".to_string(),
            risk_level: "moderate".to_string(),
            hypotheses: vec![],
        }
    }

    #[test]
    fn test_answer_count_tracks_history_length() {
        let mut session = Session::new("my head hurts", intake());
        session.record_answer("When did it start?", "Two weeks ago");
        session.record_answer("Any nausea?", "No");
        assert_eq!(session.answer_count as usize, session.answers_history.len());
        assert_eq!(session.answer_count, 2);
    }

    #[test]
    fn test_asked_questions_superset_of_history() {
        let mut session = Session::new("my head hurts", intake());
        session.register_question("When did it start?");
        assert_eq!(session.asked_questions.len(), 1);
        assert!(session.answers_history.is_empty());

        session.record_answer("When did it start?", "Two weeks ago");
        // Already registered, must not duplicate.
        assert_eq!(session.asked_questions.len(), 1);
        for record in &session.answers_history {
            assert!(session.asked_questions.contains(&record.question));
        }
    }

    #[test]
    fn test_last_question_placeholder() {
        let session = Session::new("my head hurts", intake());
        assert_eq!(session.last_question(), "Initial question");
    }

    #[test]
    fn test_risk_level_parse_is_lenient() {
        assert_eq!(RiskLevel::parse("HIGH"), RiskLevel::High);
        assert_eq!(RiskLevel::parse("medium"), RiskLevel::Moderate);
        assert_eq!(RiskLevel::parse("???"), RiskLevel::Low);
    }
}
