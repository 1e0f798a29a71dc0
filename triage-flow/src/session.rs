//! Session orchestration for the two-phase extract → predict flow.
//!
//! One `TriageSession` owns one user's mutable state: the latest extraction,
//! the per-annotation confirmation flags, the latest predictions, and the
//! phase/error bookkeeping. All of it sits behind a single mutex that is
//! never held across an await; the suspension points are exactly the two
//! backend calls.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::TriageBackend;
use crate::models::{ExtractRequest, ExtractResponse, PredictRequest, PredictResponse, Target};
use crate::selection::{SelectionKey, SelectionState};

/// Lifecycle of one request phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Default)]
struct SessionState {
    extract_phase: Phase,
    predict_phase: Phase,
    extraction: Option<ExtractResponse>,
    selection: SelectionState,
    predictions: Option<PredictResponse>,
    error: Option<String>,
    /// Bumped on every extract start; a predict resolution carrying an older
    /// value belongs to a superseded extraction and is discarded.
    generation: u64,
}

/// Cloned, render-ready view of the session.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub extract_phase: Phase,
    pub predict_phase: Phase,
    pub extraction: Option<ExtractResponse>,
    pub selection: SelectionState,
    pub predictions: Option<PredictResponse>,
    pub error: Option<String>,
}

impl SessionSnapshot {
    /// Ids that would be sent to prediction right now.
    pub fn confirmed_hpo_ids(&self) -> Vec<String> {
        match &self.extraction {
            Some(extraction) => self.selection.confirmed_hpo_ids(&extraction.symptoms),
            None => Vec::new(),
        }
    }

    /// Whether the predict phase can be triggered.
    pub fn can_predict(&self) -> bool {
        self.extract_phase == Phase::Succeeded
            && self.predict_phase != Phase::InFlight
            && !self.confirmed_hpo_ids().is_empty()
    }
}

pub struct TriageSession {
    backend: Arc<dyn TriageBackend>,
    state: Mutex<SessionState>,
}

impl TriageSession {
    pub fn new(backend: Arc<dyn TriageBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().unwrap();
        SessionSnapshot {
            extract_phase: state.extract_phase,
            predict_phase: state.predict_phase,
            extraction: state.extraction.clone(),
            selection: state.selection.clone(),
            predictions: state.predictions.clone(),
            error: state.error.clone(),
        }
    }

    /// Run the extract phase over `text`. Silently a no-op on blank input or
    /// while an extraction is already in flight (the triggering control is
    /// disabled in both situations). Any previous predictions are invalidated
    /// immediately: they were defined relative to the superseded extraction.
    pub async fn extract(&self, text: &str) {
        {
            let mut state = self.state.lock().unwrap();
            if text.trim().is_empty() {
                return;
            }
            if state.extract_phase == Phase::InFlight {
                warn!("extract already in flight, ignoring re-submission");
                return;
            }
            state.extract_phase = Phase::InFlight;
            state.error = None;
            state.predictions = None;
            state.predict_phase = Phase::Idle;
            state.generation += 1;
        }

        let request = ExtractRequest {
            text: text.to_string(),
        };
        let outcome = self.backend.extract(&request).await;

        let mut state = self.state.lock().unwrap();
        match outcome {
            Ok(extraction) => {
                info!(
                    "extraction succeeded: {} annotation(s)",
                    extraction.symptoms.len()
                );
                state.selection = SelectionState::initialized(&extraction.symptoms);
                state.extraction = Some(extraction);
                state.extract_phase = Phase::Succeeded;
            }
            Err(e) => {
                // Failed extract leaves the session as if nothing had ever
                // been extracted, except for the error message.
                state.extraction = None;
                state.selection = SelectionState::default();
                state.error = Some(e.to_string());
                state.extract_phase = Phase::Failed;
            }
        }
    }

    /// Run the predict phase over the currently confirmed ids. A no-op unless
    /// the extract phase has succeeded, the confirmed set is non-empty, and
    /// no predict call is already in flight. If a newer extraction starts
    /// while this call is suspended, its resolution is discarded.
    pub async fn predict(&self, target: Target, limit: u32) {
        let (hpo_ids, generation) = {
            let mut state = self.state.lock().unwrap();
            if state.extract_phase != Phase::Succeeded {
                return;
            }
            if state.predict_phase == Phase::InFlight {
                warn!("predict already in flight, ignoring re-submission");
                return;
            }
            let Some(extraction) = &state.extraction else {
                return;
            };
            let hpo_ids = state.selection.confirmed_hpo_ids(&extraction.symptoms);
            if hpo_ids.is_empty() {
                return;
            }
            state.predict_phase = Phase::InFlight;
            state.error = None;
            (hpo_ids, state.generation)
        };

        let request = PredictRequest {
            hpo_ids,
            target,
            limit,
        };
        let outcome = self.backend.predict(&request).await;

        let mut state = self.state.lock().unwrap();
        if state.generation != generation {
            warn!("discarding stale prediction from a superseded extraction");
            return;
        }
        match outcome {
            Ok(predictions) => {
                info!(
                    "prediction succeeded: {} ranked disease(s)",
                    predictions.predictions.len()
                );
                state.predictions = Some(predictions);
                state.predict_phase = Phase::Succeeded;
            }
            Err(e) => {
                state.predictions = None;
                state.error = Some(e.to_string());
                state.predict_phase = Phase::Failed;
            }
        }
    }

    /// Set one annotation's confirmed flag.
    pub fn set_confirmed(&self, key: SelectionKey, value: bool) {
        let mut state = self.state.lock().unwrap();
        state.selection.set(key, value);
    }

    /// Confirm or unconfirm every annotation of the current extraction.
    /// Confirming never reaches annotations without a binding.
    pub fn set_all_confirmed(&self, value: bool) {
        let mut state = self.state.lock().unwrap();
        let Some(extraction) = state.extraction.take() else {
            return;
        };
        state.selection.set_all(&extraction.symptoms, value);
        state.extraction = Some(extraction);
    }
}
