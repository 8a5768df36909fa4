use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, RwLock};

use crate::errors::SearchError;
use crate::search_client::{SearchClient, SearchServiceConfig};
use crate::types::{ImageBlob, InputSelection, SearchResult, SessionState, SessionStatus};

/// Client-side controller for one visual-similarity search session
///
/// Owns all mutable session state: the query input, the submission lifecycle
/// status, the received results and the display threshold. Every mutation
/// publishes a fresh state snapshot on a watch channel so a presentation
/// layer can re-render without being coupled to this crate.
///
/// Handles are cheap to clone and share the same session.
#[derive(Debug, Clone)]
pub struct SearchSession {
    client: SearchClient,
    state: Arc<RwLock<SessionState>>,
    state_tx: watch::Sender<SessionState>,
    /// Monotonic submission counter; a response is applied only if its
    /// sequence number is still the latest issued.
    submit_seq: Arc<AtomicU64>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    /// Create a session against the default service configuration
    pub fn new() -> Self {
        Self::with_config(SearchServiceConfig::default())
    }

    /// Create a session against a custom service configuration
    pub fn with_config(config: SearchServiceConfig) -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());

        Self {
            client: SearchClient::with_config(config),
            state: Arc::new(RwLock::new(SessionState::default())),
            state_tx,
            submit_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get a snapshot of the current session state
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Subscribe to state snapshots, one per mutation
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Set the URL input; empty text clears the selection entirely
    ///
    /// Replaces any previously chosen file. Does not touch status or results.
    pub async fn set_url_input(&self, text: &str) {
        let mut state = self.state.write().await;
        state.selection = if text.is_empty() {
            InputSelection::None
        } else {
            InputSelection::Url(text.to_string())
        };
        self.publish(&state);
    }

    /// Set the file input, replacing any URL text
    pub async fn set_file_input(&self, blob: ImageBlob) {
        let mut state = self.state.write().await;
        state.selection = InputSelection::File(blob);
        self.publish(&state);
    }

    /// Set the display threshold, clamped to [0, 100]
    ///
    /// Takes effect on the next filtered read; never touches status.
    pub async fn set_min_score_threshold(&self, threshold: f64) {
        let clamped = if threshold.is_finite() {
            threshold.clamp(0.0, 100.0)
        } else {
            0.0
        };

        let mut state = self.state.write().await;
        state.min_score_threshold = clamped;
        self.publish(&state);
    }

    /// Results at or above the current threshold
    pub async fn filtered_results(&self) -> Vec<SearchResult> {
        self.state.read().await.filtered_results()
    }

    /// Run one submission to completion and return the settled state
    ///
    /// With no input selected, only the error message changes; the status
    /// keeps its previous value and nothing is dispatched. Otherwise the
    /// session transitions to Loading before the request goes out, and
    /// settles into Success or Error when the response arrives. Failures are
    /// converted to state here and never propagate to the caller.
    pub async fn submit(&self) -> SessionState {
        let selection = {
            let state = self.state.read().await;
            state.selection.clone()
        };

        if selection.is_none() {
            let mut state = self.state.write().await;
            state.error_message = Some(SearchError::MissingInput.user_message());
            self.publish(&state);
            return state.clone();
        }

        let seq = self.submit_seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write().await;
            state.status = SessionStatus::Loading;
            state.error_message = None;
            state.results.clear();
            state.last_submitted_at = Some(Utc::now());
            self.publish(&state);
        }

        // Sole suspension point. The selection was cloned out above, so edits
        // made while this is in flight cannot alter the outgoing request.
        let outcome = self.client.search(&selection).await;

        if self.submit_seq.load(Ordering::SeqCst) != seq {
            log::debug!("⏭️ Discarding stale search response (seq {})", seq);
            return self.state().await;
        }

        let mut state = self.state.write().await;
        match outcome {
            Ok(results) => {
                log::debug!("✅ Submission {} settled with {} matches", seq, results.len());
                state.results = results;
                state.status = SessionStatus::Success;
            }
            Err(error) => {
                log::warn!("⚠️ Submission {} failed: {}", seq, error);
                state.results.clear();
                state.error_message = Some(error.user_message());
                state.status = SessionStatus::Error;
            }
        }
        state.last_completed_at = Some(Utc::now());
        self.publish(&state);
        state.clone()
    }

    fn publish(&self, state: &SessionState) {
        self.state_tx.send_replace(state.clone());
    }
}
