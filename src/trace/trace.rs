use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::overlay::overlay_model::OverlayState;
use crate::resolve::engine::{Resolution, ResolutionReport};

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub overlay_state: String,
    pub event: String,

    pub decision: Option<String>,
    pub label: Option<String>,

    pub score: Option<u32>,
    pub threshold: Option<u32>,
    pub candidate: Option<usize>,
    pub candidates_scanned: Option<usize>,
    pub surface_fingerprint: Option<String>,

    pub failure: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, state: OverlayState, event: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            overlay_state: format!("{:?}", state),
            event: event.to_string(),
            decision: None,
            label: None,
            score: None,
            threshold: None,
            candidate: None,
            candidates_scanned: None,
            surface_fingerprint: None,
            failure: None,
        }
    }

    pub fn with_decision(mut self, decision: impl ToString) -> Self {
        self.decision = Some(decision.to_string());
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_report(mut self, report: &ResolutionReport, threshold: u32) -> Self {
        match &report.resolution {
            Resolution::Resolved(t) => {
                self.score = Some(t.score);
                self.candidate = Some(t.candidate.0);
            }
            Resolution::NotFound { max_score } => {
                self.score = Some(*max_score);
            }
        }
        self.threshold = Some(threshold);
        self.candidates_scanned = Some(report.candidates_scanned);
        self.surface_fingerprint = Some(report.surface_fingerprint.clone());
        self
    }

    pub fn with_failure(mut self, reason: impl ToString) -> Self {
        self.failure = Some(reason.to_string());
        self
    }
}
