//! In-memory session store.
//!
//! A store object owning a guarded map, shared by handle. Callers are
//! expected not to issue concurrent requests for the same session id;
//! distinct sessions are fully independent. Entries leave the map at
//! finalization or via the idle sweep.

use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use triage_common::{HypothesisSet, Intake, Session};
use uuid::Uuid;

/// Case-insensitive hypothesis probability update, as accepted from the
/// collaborator.
#[derive(Debug, Clone)]
pub struct HypothesisUpdate {
    pub name: String,
    pub new_probability: f64,
}

/// Shared handle to the session map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and return its generated identifier.
    pub async fn create(&self, original_message: &str, intake: Intake) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = Session::new(original_message, intake);
        self.inner.write().await.insert(session_id.clone(), session);
        session_id
    }

    /// Snapshot of a session, or `None` for unknown ids.
    pub async fn get(&self, session_id: &str) -> Option<Session> {
        self.inner.read().await.get(session_id).cloned()
    }

    /// Pre-register an asked question. Returns `false` for unknown ids.
    pub async fn register_question(&self, session_id: &str, question: &str) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.register_question(question);
                true
            }
            None => false,
        }
    }

    /// Append an answer to history, register the question, and bump the
    /// answer count - atomically under the write lock.
    pub async fn append_answer(&self, session_id: &str, question: &str, answer: &str) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.record_answer(question, answer);
                true
            }
            None => false,
        }
    }

    /// Apply a batch of accepted probability updates. Name mismatches
    /// are dropped silently per the update contract.
    pub async fn apply_hypothesis_updates(
        &self,
        session_id: &str,
        updates: &[HypothesisUpdate],
    ) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                for update in updates {
                    if !session.hypotheses.apply_update(&update.name, update.new_probability) {
                        debug!("Dropping update for unknown hypothesis '{}'", update.name);
                    }
                }
                session.touch();
                true
            }
            None => false,
        }
    }

    /// Replace the hypothesis set wholesale.
    pub async fn replace_hypotheses(&self, session_id: &str, hypotheses: HypothesisSet) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.hypotheses = hypotheses;
                session.touch();
                true
            }
            None => false,
        }
    }

    /// Remove a session. Returns `false` when it was already gone.
    pub async fn delete(&self, session_id: &str) -> bool {
        self.inner.write().await.remove(session_id).is_some()
    }

    pub async fn active_count(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Remove sessions idle longer than `ttl`. Returns how many were
    /// dropped.
    pub async fn sweep_idle(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now()
            - ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::seconds(0));
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_activity > cutoff);
        before - sessions.len()
    }

    /// Background task: periodically sweep idle sessions.
    pub fn spawn_sweeper(self, ttl: Duration, interval: Duration) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately
            loop {
                ticker.tick().await;
                let removed = self.sweep_idle(ttl).await;
                if removed > 0 {
                    info!("Idle sweep removed {} session(s)", removed);
                }
            }
        });
    }
}
