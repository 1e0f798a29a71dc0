//! Core library for the clinical symptom triage flow: free-text narrative in,
//! extracted symptom mentions with HPO bindings back, user-confirmed subset
//! forward to disease prediction.

pub mod client;
pub mod error;
pub mod highlight;
pub mod models;
pub mod selection;
pub mod session;

// Re-export commonly used types
pub use client::{HttpBackend, TriageBackend};
pub use error::{Result, TriageError};
pub use highlight::{RenderPlan, Segment, SpanMark, reconcile, span_marks};
pub use models::{
    DiseasePrediction, ExtractRequest, ExtractResponse, NormalizedSymptom, PredictRequest,
    PredictResponse, Target, TextSpan,
};
pub use selection::{SelectionKey, SelectionState};
pub use session::{Phase, SessionSnapshot, TriageSession};
