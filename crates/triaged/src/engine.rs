//! Conversation driver.
//!
//! Orchestrates the INTAKE -> QUESTIONING -> FINALIZED turn sequence:
//! one collaborator round-trip per concern, the confidence gate between
//! turns, and the hard stop bounds on top of its advisory verdict.

use crate::config::LlmConfig;
use crate::extract::extract_as;
use crate::gate;
use crate::llm::LlmClient;
use crate::postprocess::clean_final_response;
use crate::prompts;
use crate::sessions::{HypothesisUpdate, SessionStore};
use serde::Deserialize;
use tracing::{info, warn};
use triage_common::{classify, AnswerResponse, Intake, StartResponse, TriageError};

/// Question payload returned by the collaborator. All fields are
/// tolerated as missing; an empty question is passed through rather
/// than failing the turn.
#[derive(Debug, Default, Deserialize)]
struct QuestionPayload {
    #[serde(default)]
    question: String,
    #[serde(default)]
    options: Vec<String>,
    why_asking: Option<String>,
    reasoning: Option<String>,
}

impl QuestionPayload {
    fn why(&self) -> String {
        self.why_asking
            .clone()
            .or_else(|| self.reasoning.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct RawUpdate {
    name: String,
    new_probability: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct UpdateBatch {
    #[serde(default)]
    updated_hypotheses: Vec<RawUpdate>,
}

/// The diagnostic engine: LLM client + session store + per-call
/// temperatures.
#[derive(Debug, Clone)]
pub struct Engine {
    llm: LlmClient,
    store: SessionStore,
    temps: LlmConfig,
}

impl Engine {
    pub fn new(llm: LlmClient, store: SessionStore, llm_config: LlmConfig) -> Self {
        Self {
            llm,
            store,
            temps: llm_config,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn llm(&self) -> &LlmClient {
        &self.llm
    }

    /// INTAKE: extract issue summary, risk level, and initial hypotheses,
    /// create the session, and ask the first question.
    ///
    /// A malformed intake reply fails the whole start - no session is
    /// created. The follow-up question call is tolerant: an unparseable
    /// reply yields an empty question, matching the answer-turn behavior.
    pub async fn start(&self, message: &str) -> Result<StartResponse, TriageError> {
        info!("Starting session for message ({} chars)", message.len());

        let raw = self
            .llm
            .generate(&prompts::build_intake_prompt(message), self.temps.intake_temperature)
            .await
            .map_err(|e| TriageError::Llm(e.to_string()))?;

        let intake: Intake = extract_as(&raw)?;

        let session_id = self.store.create(message, intake).await;
        let session = self
            .store
            .get(&session_id)
            .await
            .ok_or_else(|| TriageError::Internal("session vanished after create".to_string()))?;

        let question = self
            .request_question(
                &session.main_issue,
                &session.hypotheses,
                &session.answers_history,
                &session.asked_questions,
            )
            .await;

        if !question.question.is_empty() {
            self.store
                .register_question(&session_id, &question.question)
                .await;
        }

        info!(
            "Session {} started: risk={} hypotheses={}",
            session_id,
            session.risk_level.as_str(),
            session.hypotheses.len()
        );

        let why_asking = question.why();
        Ok(StartResponse {
            session_id,
            issue_summary: session.main_issue,
            risk_level: session.risk_level,
            question: question.question,
            why_asking,
            options: question.options,
            question_number: 1,
        })
    }

    /// QUESTIONING: record the answer, update beliefs, run the gate, and
    /// either finalize or return the next question.
    pub async fn answer(
        &self,
        session_id: &str,
        selected_option: &str,
    ) -> Result<AnswerResponse, TriageError> {
        let session = self
            .store
            .get(session_id)
            .await
            .ok_or_else(|| TriageError::SessionNotFound(session_id.to_string()))?;

        // The answer is recorded against the most recently asked
        // question; the placeholder covers the never-asked edge.
        let last_question = session.last_question();
        self.store
            .append_answer(session_id, &last_question, selected_option)
            .await;

        self.update_beliefs(session_id, &session.main_issue, &last_question, selected_option)
            .await;

        let session = self
            .store
            .get(session_id)
            .await
            .ok_or_else(|| TriageError::SessionNotFound(session_id.to_string()))?;

        let decision = gate::evaluate(
            &self.llm,
            self.temps.confidence_temperature,
            &session.main_issue,
            &session.hypotheses,
            session.answer_count,
        )
        .await;

        info!(
            "Session {}: answers={} verdict={:?} confidence={:.2}",
            session_id, session.answer_count, decision.verdict, decision.confidence
        );

        if gate::should_stop(decision.verdict, session.answer_count) {
            let final_response = self.finalize(&session).await;
            self.store.delete(session_id).await;
            return Ok(AnswerResponse::Completed {
                confidence: decision.confidence,
                final_response,
            });
        }

        let question = self
            .request_question(
                &session.main_issue,
                &session.hypotheses,
                &session.answers_history,
                &session.asked_questions,
            )
            .await;

        if !question.question.is_empty() {
            self.store
                .register_question(session_id, &question.question)
                .await;
        }

        let top_hypothesis = session
            .hypotheses
            .top()
            .map(|h| h.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let why_asking = question.why();
        Ok(AnswerResponse::Continue {
            confidence: decision.confidence,
            question: question.question,
            why_asking,
            options: question.options,
            question_number: session.answer_count + 1,
            top_hypothesis,
        })
    }

    /// Ask the collaborator to re-estimate hypothesis probabilities.
    /// Failures are tolerated: the prior probabilities stand.
    async fn update_beliefs(
        &self,
        session_id: &str,
        main_issue: &str,
        last_question: &str,
        last_answer: &str,
    ) {
        let session = match self.store.get(session_id).await {
            Some(s) => s,
            None => return,
        };

        let prompt = prompts::build_update_prompt(
            main_issue,
            &session.hypotheses,
            last_question,
            last_answer,
        );

        let raw = match self.llm.generate(&prompt, self.temps.update_temperature).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Hypothesis update call failed, keeping priors: {}", e);
                return;
            }
        };

        let batch: UpdateBatch = match extract_as(&raw) {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Hypothesis update unparseable, keeping priors: {}", e);
                return;
            }
        };

        let updates: Vec<HypothesisUpdate> = batch
            .updated_hypotheses
            .into_iter()
            .filter_map(|u| {
                u.new_probability.map(|p| HypothesisUpdate {
                    name: u.name,
                    new_probability: p,
                })
            })
            .collect();

        self.store
            .apply_hypothesis_updates(session_id, &updates)
            .await;
    }

    /// Tolerant question round-trip: any failure yields an empty payload.
    async fn request_question(
        &self,
        main_issue: &str,
        hypotheses: &triage_common::HypothesisSet,
        answers_history: &[triage_common::AnswerRecord],
        asked_questions: &[String],
    ) -> QuestionPayload {
        let prompt =
            prompts::build_question_prompt(main_issue, hypotheses, answers_history, asked_questions);

        let raw = match self.llm.generate(&prompt, self.temps.question_temperature).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Question call failed: {}", e);
                return QuestionPayload::default();
            }
        };

        match extract_as(&raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Question reply unparseable: {}", e);
                QuestionPayload::default()
            }
        }
    }

    /// FINALIZED: request the short narrative and post-process it. A
    /// failed call degrades to the fallback template via the cleaner.
    async fn finalize(&self, session: &triage_common::Session) -> String {
        let top_name = session
            .hypotheses
            .top()
            .map(|h| h.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let domain = classify(&session.main_issue);

        let prompt = prompts::build_final_prompt(&session.main_issue, &top_name, domain);
        let raw = match self.llm.generate(&prompt, self.temps.final_temperature).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Final narrative call failed, using fallback: {}", e);
                String::new()
            }
        };

        clean_final_response(&raw, &top_name)
    }
}
