use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::overlay::error::OverlayError;

pub const DRAW_UI: &str = "DRAW_UI";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeHint {
    Input,
    #[serde(alias = "clickable")]
    Activatable,
    #[default]
    #[serde(other)]
    Unspecified,
}

/// One user-intended action, as handed over by the summarizing backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(
        default,
        rename = "type",
        alias = "type_hint",
        deserialize_with = "null_as_default"
    )]
    pub type_hint: TypeHint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
}

impl ActionDescriptor {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            type_hint: TypeHint::Unspecified,
            icon_name: None,
        }
    }

    pub fn with_type_hint(mut self, type_hint: TypeHint) -> Self {
        self.type_hint = type_hint;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_summary: String,
    pub primary_actions: Vec<ActionDescriptor>,
}

/// Backends send `null` for unset optional fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl DrawPayload {
    /// Reject payloads that would produce an unusable control.
    pub fn validate(&self) -> Result<(), OverlayError> {
        for (i, action) in self.primary_actions.iter().enumerate() {
            if action.label.trim().is_empty() {
                return Err(OverlayError::Input(format!("action #{} has an empty label", i)));
            }
        }
        Ok(())
    }
}

/// Inspect a runtime message from the draw request channel.
///
/// Returns `Ok(None)` for messages addressed to someone else.
pub fn parse_draw_request(message: &Value) -> Result<Option<DrawPayload>, OverlayError> {
    if message.get("action").and_then(Value::as_str) != Some(DRAW_UI) {
        return Ok(None);
    }

    let envelope = message
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| OverlayError::Input("no data received from backend".into()))?;

    if envelope.get("status").and_then(Value::as_str) == Some("error") {
        let msg = envelope
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown backend error");
        return Err(OverlayError::Input(format!("backend reported an error: {}", msg)));
    }

    let inner = envelope
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| OverlayError::Input("no data received from backend".into()))?;

    let payload: DrawPayload = serde_json::from_value(inner.clone())
        .map_err(|e| OverlayError::Input(format!("malformed draw payload: {}", e)))?;

    payload.validate()?;
    Ok(Some(payload))
}
