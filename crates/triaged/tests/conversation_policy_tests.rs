//! Conversation policy tests
//!
//! Exercise the turn-by-turn stopping policy the way the driver does:
//! the session store, the gate's pure decision pieces, and the final
//! post-processor together - no LLM round-trips.
//!
//! ## Running
//!
//! ```bash
//! cargo test -p triaged conversation_policy -- --nocapture
//! ```

use std::time::Duration;

use triaged::gate::{gate_inputs, parse_judgment, should_stop};
use triaged::postprocess::clean_final_response;
use triaged::sessions::{HypothesisUpdate, SessionStore};
use triage_common::{Hypothesis, Intake, Verdict, MAX_ANSWERS, MIN_ANSWERS_BEFORE_STOP};

fn intake() -> Intake {
    Intake {
        main_issue: "Recurring fever in the evenings".to_string(),
        risk_level: "moderate".to_string(),
        hypotheses: vec![
            hyp("Viral infection", 0.5),
            hyp("Chronic inflammation", 0.3),
            hyp("Medication side effect", 0.2),
        ],
    }
}

fn hyp(name: &str, probability: f64) -> Hypothesis {
    Hypothesis {
        name: name.to_string(),
        description: format!("{} as the cause", name),
        probability,
        key_evidence: vec![],
    }
}

// ============================================================================
// Driver-level stop bounds
// ============================================================================

/// An eager STOP verdict must not end the conversation before the floor.
#[tokio::test]
async fn test_stop_verdict_ignored_before_minimum_answers() {
    let store = SessionStore::new();
    let id = store.create("I get a fever every evening", intake()).await;

    for turn in 1..MIN_ANSWERS_BEFORE_STOP {
        store
            .append_answer(&id, &format!("Question {turn}"), "Yes")
            .await;
        let session = store.get(&id).await.unwrap();
        // Even a confident STOP from the collaborator is overridden.
        let decision = parse_judgment(r#"{"confidence_score": 0.95, "verdict": "STOP"}"#);
        assert_eq!(decision.verdict, Verdict::Stop);
        assert!(
            !should_stop(decision.verdict, session.answer_count),
            "must continue at {} answers",
            session.answer_count
        );
    }
}

/// A stubborn CONTINUE verdict must not extend past the cap.
#[tokio::test]
async fn test_continue_verdict_overridden_at_maximum_answers() {
    let store = SessionStore::new();
    let id = store.create("I get a fever every evening", intake()).await;

    for turn in 1..=MAX_ANSWERS {
        store
            .append_answer(&id, &format!("Question {turn}"), "Sometimes")
            .await;
    }
    let session = store.get(&id).await.unwrap();
    assert_eq!(session.answer_count, MAX_ANSWERS);
    assert!(should_stop(Verdict::Continue, session.answer_count));
}

/// Between floor and cap the advisory verdict decides.
#[tokio::test]
async fn test_verdict_decides_between_floor_and_cap() {
    for count in MIN_ANSWERS_BEFORE_STOP..MAX_ANSWERS {
        assert!(should_stop(Verdict::Stop, count));
        assert!(!should_stop(Verdict::Continue, count));
    }
}

// ============================================================================
// Belief updates and gate inputs
// ============================================================================

/// An applied update must be visible through top_k; a name mismatch must
/// leave the ordering untouched.
#[tokio::test]
async fn test_update_reflected_in_top_hypothesis() {
    let store = SessionStore::new();
    let id = store.create("I get a fever every evening", intake()).await;

    store
        .apply_hypothesis_updates(
            &id,
            &[HypothesisUpdate {
                name: "medication side effect".to_string(),
                new_probability: 0.9,
            }],
        )
        .await;

    let session = store.get(&id).await.unwrap();
    assert_eq!(session.hypotheses.top().unwrap().name, "Medication side effect");

    // Unknown name: dropped silently, top unchanged.
    store
        .apply_hypothesis_updates(
            &id,
            &[HypothesisUpdate {
                name: "Alien abduction".to_string(),
                new_probability: 1.0,
            }],
        )
        .await;
    let session = store.get(&id).await.unwrap();
    assert_eq!(session.hypotheses.top().unwrap().name, "Medication side effect");
    assert_eq!(session.hypotheses.len(), 3);
}

#[tokio::test]
async fn test_gate_inputs_track_store_state() {
    let store = SessionStore::new();
    let id = store.create("I get a fever every evening", intake()).await;

    let session = store.get(&id).await.unwrap();
    let inputs = gate_inputs(&session.hypotheses);
    assert!((inputs.top_probability - 0.5).abs() < 1e-9);
    assert!((inputs.gap - 0.2).abs() < 1e-9);

    store
        .apply_hypothesis_updates(
            &id,
            &[HypothesisUpdate {
                name: "Viral infection".to_string(),
                new_probability: 0.85,
            }],
        )
        .await;
    let session = store.get(&id).await.unwrap();
    let inputs = gate_inputs(&session.hypotheses);
    assert!((inputs.top_probability - 0.85).abs() < 1e-9);
    assert!((inputs.gap - 0.55).abs() < 1e-9);
}

// ============================================================================
// Session lifecycle
// ============================================================================

/// The invariant answer_count == answers_history.len() holds after every
/// submission, and finalization deletes the session for good.
#[tokio::test]
async fn test_full_session_lifecycle() {
    let store = SessionStore::new();
    let id = store.create("I get a fever every evening", intake()).await;

    store.register_question(&id, "When did it start?").await;
    for turn in 0..MAX_ANSWERS {
        let session = store.get(&id).await.unwrap();
        let question = session.last_question();
        store.append_answer(&id, &question, "Answer").await;

        let session = store.get(&id).await.unwrap();
        assert_eq!(session.answer_count as usize, session.answers_history.len());

        if should_stop(Verdict::Continue, session.answer_count) {
            assert_eq!(turn + 1, MAX_ANSWERS);
            break;
        }
        store
            .register_question(&id, &format!("Follow-up {turn}"))
            .await;
    }

    // Finalization removes the session; later lookups are a not-found.
    assert!(store.delete(&id).await);
    assert!(store.get(&id).await.is_none());
    assert!(!store.append_answer(&id, "q", "a").await);
}

#[tokio::test]
async fn test_idle_sweep_leaves_active_sessions() {
    let store = SessionStore::new();
    let id = store.create("I get a fever every evening", intake()).await;
    store.append_answer(&id, "Question 1", "Yes").await;

    // Nothing is old enough to sweep.
    let removed = store.sweep_idle(Duration::from_secs(3600)).await;
    assert_eq!(removed, 0);
    assert!(store.get(&id).await.is_some());
}

// ============================================================================
// Finalization text
// ============================================================================

/// The cleaned narrative handed back at completion is never a question
/// and always names something actionable.
#[test]
fn test_final_narrative_cleanup_end_to_end() {
    let raw = "1. Yeah, probably a viral infection running its course.\n2. Rest well?\n- drink fluids";
    let cleaned = clean_final_response(raw, "Viral infection");
    assert_eq!(cleaned, "Yeah, probably a viral infection running its course.");

    let too_short = clean_final_response("Ok?", "Viral infection");
    assert!(too_short.contains("Viral infection"));
    assert!(too_short.len() >= 15);
}
