use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::host::Surface;
use crate::overlay::error::OverlayError;
use crate::surface::normalize::{class_tokens, normalize_signal_text};
use crate::surface::surface_model::{
    Candidate, CandidateRef, ElementSignals, RawElement, TagCategory,
};

pub const MIN_BOX_SIZE: f64 = 10.0;

const SEMANTIC_TAGS: [&str; 5] = ["a", "button", "input", "textarea", "select"];

const INTERACTIVE_ROLES: [&str; 11] = [
    "button", "link", "menuitem", "tab", "checkbox", "radio", "switch", "option", "textbox",
    "searchbox", "combobox",
];

// Real-world controls are often built from these.
const GENERIC_TAGS: [&str; 9] = ["div", "span", "li", "label", "p", "img", "svg", "i", "td"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default = "default_min_box_size")]
    pub min_box_size: f64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_box_size: MIN_BOX_SIZE,
        }
    }
}

fn default_min_box_size() -> f64 {
    MIN_BOX_SIZE
}

/// Walk the host surface once and return the visible candidates in walk order.
pub fn scan(surface: &mut dyn Surface, config: &ScannerConfig) -> Result<Vec<Candidate>, OverlayError> {
    let elements = surface.walk()?;
    Ok(scan_elements(&elements, config))
}

pub fn scan_elements(elements: &[RawElement], config: &ScannerConfig) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for (index, el) in elements.iter().enumerate() {
        if !is_candidate_node(el) {
            continue;
        }

        let signals = extract_signals(el, config);
        if !signals.is_visible {
            debug!(index, tag = %el.tag, "skipping invisible node");
            continue;
        }

        candidates.push(Candidate {
            candidate: CandidateRef(index),
            signals,
        });
    }

    candidates
}

fn is_candidate_node(el: &RawElement) -> bool {
    let tag = el.tag.to_lowercase();

    if SEMANTIC_TAGS.contains(&tag.as_str()) || GENERIC_TAGS.contains(&tag.as_str()) {
        return true;
    }

    let role = normalize_signal_text(el.role.as_deref());
    INTERACTIVE_ROLES.contains(&role.as_str()) || el.tab_index == Some(0)
}

pub fn is_visible(el: &RawElement, min_box_size: f64) -> bool {
    if !el.connected {
        return false;
    }

    match &el.rect {
        Some(rect) => rect.width >= min_box_size && rect.height >= min_box_size,
        None => false,
    }
}

pub fn extract_signals(el: &RawElement, config: &ScannerConfig) -> ElementSignals {
    let tag = el.tag.to_lowercase();
    let tag_category = TagCategory::from_tag(&tag);
    let type_attribute = normalize_signal_text(el.r#type.as_deref());
    let value = normalize_signal_text(el.value.as_deref());

    let mut visible_text = normalize_signal_text(el.text.as_deref());
    // Button-like inputs paint their value as their label.
    if visible_text.is_empty()
        && tag == "input"
        && matches!(type_attribute.as_str(), "submit" | "button" | "reset")
    {
        visible_text = value.clone();
    }

    ElementSignals {
        visible_text,
        value,
        identifier: normalize_signal_text(el.id.as_deref()),
        class_tokens: class_tokens(el.class_name.as_deref()),
        accessible_label: normalize_signal_text(el.aria_label.as_deref()),
        placeholder: normalize_signal_text(el.placeholder.as_deref()),
        role: normalize_signal_text(el.role.as_deref()),
        type_attribute,
        tag_category,
        is_visible: is_visible(el, config.min_box_size),
        has_pointer_affordance: normalize_signal_text(el.cursor.as_deref()) == "pointer",
    }
}
