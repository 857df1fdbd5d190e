use serde::{Deserialize, Serialize};

use crate::action::action_model::ActionDescriptor;
use crate::surface::surface_model::{ElementSignals, TagCategory};

pub const ACCEPT_THRESHOLD: u32 = 15;

/// Points per tier. Fixed constants with no calibration behind them, so they
/// are loadable from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_exact")]
    pub exact: u32,
    #[serde(default = "default_partial")]
    pub partial: u32,
    #[serde(default = "default_class_token")]
    pub class_token: u32,
    #[serde(default = "default_bonus")]
    pub tag_bonus: u32,
    #[serde(default = "default_bonus")]
    pub role_bonus: u32,
    #[serde(default = "default_bonus")]
    pub type_bonus: u32,
    #[serde(default = "default_pointer_bonus")]
    pub pointer_bonus: u32,
    /// Visible text at or above this length earns no partial-match points.
    #[serde(default = "default_max_partial_text_len")]
    pub max_partial_text_len: usize,
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact: 30,
            partial: 15,
            class_token: 5,
            tag_bonus: 10,
            role_bonus: 10,
            type_bonus: 10,
            pointer_bonus: 5,
            max_partial_text_len: 50,
            accept_threshold: ACCEPT_THRESHOLD,
        }
    }
}

fn default_exact() -> u32 { 30 }
fn default_partial() -> u32 { 15 }
fn default_class_token() -> u32 { 5 }
fn default_bonus() -> u32 { 10 }
fn default_pointer_bonus() -> u32 { 5 }
fn default_max_partial_text_len() -> usize { 50 }
fn default_accept_threshold() -> u32 { ACCEPT_THRESHOLD }

/// Score one candidate against an action. Pure.
pub fn score(action: &ActionDescriptor, signals: &ElementSignals, weights: &ScoringWeights) -> u32 {
    let mut total: u32 = 0;

    for raw in &action.keywords {
        let k = raw.trim().to_lowercase();
        if k.is_empty() {
            continue;
        }
        total = total.saturating_add(keyword_score(&k, signals, weights));
    }

    total.saturating_add(structural_bonus(signals, weights))
}

fn keyword_score(k: &str, s: &ElementSignals, w: &ScoringWeights) -> u32 {
    let mut points: u32 = 0;
    let short_text = s.visible_text.chars().count() < w.max_partial_text_len;

    // A field that matches exactly does not also count as containing k.
    if s.visible_text == k {
        points = points.saturating_add(w.exact);
    } else if short_text && s.visible_text.contains(k) {
        points = points.saturating_add(w.partial);
    }

    if s.identifier == k {
        points = points.saturating_add(w.exact);
    } else if s.identifier.contains(k) {
        points = points.saturating_add(w.partial);
    }

    if s.accessible_label == k {
        points = points.saturating_add(w.exact);
    }

    if s.placeholder.contains(k) {
        points = points.saturating_add(w.partial);
    }

    // Tier 3
    if s.class_tokens.contains(k) {
        points = points.saturating_add(w.class_token);
    }

    points
}

pub fn structural_bonus(s: &ElementSignals, w: &ScoringWeights) -> u32 {
    let mut points: u32 = 0;

    if matches!(
        s.tag_category,
        TagCategory::Button | TagCategory::Link | TagCategory::Input
    ) {
        points = points.saturating_add(w.tag_bonus);
    }
    if matches!(s.role.as_str(), "button" | "link") {
        points = points.saturating_add(w.role_bonus);
    }
    if matches!(s.type_attribute.as_str(), "submit" | "search") {
        points = points.saturating_add(w.type_bonus);
    }
    if s.has_pointer_affordance {
        points = points.saturating_add(w.pointer_bonus);
    }

    points
}
