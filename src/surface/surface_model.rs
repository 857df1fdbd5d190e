use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One node as reported by the host's element walk, in document order.
///
/// Every attribute is optional on the wire; the scanner turns this into a
/// fully populated [`ElementSignals`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawElement {
    pub tag: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub tab_index: Option<i32>,
    #[serde(default)]
    pub rect: Option<BoundingBox>,
    #[serde(default = "default_connected")]
    pub connected: bool,
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_connected() -> bool {
    true
}

impl Default for RawElement {
    fn default() -> Self {
        Self {
            tag: String::new(),
            text: None,
            value: None,
            id: None,
            class_name: None,
            aria_label: None,
            placeholder: None,
            role: None,
            r#type: None,
            tab_index: None,
            rect: None,
            connected: true,
            cursor: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Index of a node in the walk that produced it. Only meaningful for that scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateRef(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    Button,
    Link,
    Input,
    Textarea,
    GenericBox,
}

impl TagCategory {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "button" => TagCategory::Button,
            "a" => TagCategory::Link,
            "input" | "select" => TagCategory::Input,
            "textarea" => TagCategory::Textarea,
            _ => TagCategory::GenericBox,
        }
    }

    /// Categories that receive text rather than a click.
    pub fn is_text_entry(self) -> bool {
        matches!(self, TagCategory::Input | TagCategory::Textarea)
    }
}

/// Normalized per-scan signals for one candidate.
///
/// All strings are lower-cased and trimmed; absent attributes are empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSignals {
    pub visible_text: String,
    pub value: String,
    pub identifier: String,
    pub class_tokens: BTreeSet<String>,
    pub accessible_label: String,
    pub placeholder: String,
    pub role: String,
    pub type_attribute: String,
    pub tag_category: TagCategory,
    pub is_visible: bool,
    pub has_pointer_affordance: bool,
}

impl ElementSignals {
    /// Signals with every field empty, for the given category.
    pub fn empty(tag_category: TagCategory) -> Self {
        Self {
            visible_text: String::new(),
            value: String::new(),
            identifier: String::new(),
            class_tokens: BTreeSet::new(),
            accessible_label: String::new(),
            placeholder: String::new(),
            role: String::new(),
            type_attribute: String::new(),
            tag_category,
            is_visible: true,
            has_pointer_affordance: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub candidate: CandidateRef,
    pub signals: ElementSignals,
}
