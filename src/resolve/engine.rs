use tracing::{debug, info};

use crate::action::action_model::ActionDescriptor;
use crate::host::Surface;
use crate::overlay::error::OverlayError;
use crate::resolve::scoring::{ScoringWeights, score};
use crate::surface::normalize::surface_fingerprint;
use crate::surface::scanner::{ScannerConfig, scan};
use crate::surface::surface_model::{Candidate, CandidateRef, TagCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEntry {
    pub candidate: CandidateRef,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    pub candidate: CandidateRef,
    pub score: u32,
    pub tag_category: TagCategory,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(ResolvedTarget),
    NotFound { max_score: u32 },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// Outcome of one pass plus what it saw, for tracing.
#[derive(Debug, Clone)]
pub struct ResolutionReport {
    pub resolution: Resolution,
    pub candidates_scanned: usize,
    pub surface_fingerprint: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResolutionEngine {
    pub weights: ScoringWeights,
    pub scanner: ScannerConfig,
}

impl ResolutionEngine {
    pub fn new(weights: ScoringWeights, scanner: ScannerConfig) -> Self {
        Self { weights, scanner }
    }

    pub fn threshold(&self) -> u32 {
        self.weights.accept_threshold
    }

    /// Scan the surface and pick the best candidate. Never caches: every
    /// call walks the surface again.
    pub fn resolve(
        &self,
        surface: &mut dyn Surface,
        action: &ActionDescriptor,
    ) -> Result<ResolutionReport, OverlayError> {
        let candidates = scan(surface, &self.scanner)?;
        let resolution = self.resolve_candidates(&candidates, action);

        match &resolution {
            Resolution::Resolved(t) => info!(
                label = %action.label,
                candidate = t.candidate.0,
                score = t.score,
                "target resolved"
            ),
            Resolution::NotFound { max_score } => info!(
                label = %action.label,
                max_score,
                threshold = self.threshold(),
                "no target met the threshold"
            ),
        }

        Ok(ResolutionReport {
            resolution,
            candidates_scanned: candidates.len(),
            surface_fingerprint: surface_fingerprint(&candidates),
        })
    }

    pub fn score_all(&self, candidates: &[Candidate], action: &ActionDescriptor) -> Vec<ScoreEntry> {
        candidates
            .iter()
            .map(|c| ScoreEntry {
                candidate: c.candidate,
                score: score(action, &c.signals, &self.weights),
            })
            .collect()
    }

    /// Maximum over candidates; the earliest in scan order wins ties.
    pub fn resolve_candidates(&self, candidates: &[Candidate], action: &ActionDescriptor) -> Resolution {
        let mut best: Option<(&Candidate, u32)> = None;

        for c in candidates {
            let s = score(action, &c.signals, &self.weights);
            debug!(candidate = c.candidate.0, score = s, "scored candidate");

            if best.is_none_or(|(_, max)| s > max) {
                best = Some((c, s));
            }
        }

        match best {
            Some((c, s)) if s >= self.threshold() => Resolution::Resolved(ResolvedTarget {
                candidate: c.candidate,
                score: s,
                tag_category: c.signals.tag_category,
            }),
            Some((_, s)) => Resolution::NotFound { max_score: s },
            None => Resolution::NotFound { max_score: 0 },
        }
    }
}
