use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::action_model::{ActionDescriptor, DrawPayload, TypeHint};
use crate::overlay::error::OverlayError;

pub trait SummaryBackend {
    /// Turn a page screenshot (data URL) into a summary and action list.
    fn simplify(&self, image_data: &str) -> Result<DrawPayload, OverlayError>;
}

// ============================================================================
// HTTP Backend
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000/simplify".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

pub struct HttpSummaryBackend {
    pub config: BackendConfig,
}

#[derive(Serialize)]
struct SimplifyRequest<'a> {
    image_data: &'a str,
}

#[derive(Deserialize)]
struct SimplifyResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<DrawPayload>,
}

impl HttpSummaryBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }
}

impl SummaryBackend for HttpSummaryBackend {
    fn simplify(&self, image_data: &str) -> Result<DrawPayload, OverlayError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| OverlayError::Backend(e.to_string()))?;

        let response = client
            .post(&self.config.endpoint)
            .json(&SimplifyRequest { image_data })
            .send()
            .map_err(|e| OverlayError::Backend(e.to_string()))?;

        let body: SimplifyResponse = response
            .json()
            .map_err(|e| OverlayError::Backend(format!("unreadable response: {}", e)))?;

        unwrap_envelope(body)
    }
}

fn unwrap_envelope(body: SimplifyResponse) -> Result<DrawPayload, OverlayError> {
    if body.status.as_deref() == Some("error") {
        return Err(OverlayError::Backend(
            body.message.unwrap_or_else(|| "unknown error".into()),
        ));
    }

    let payload = body
        .data
        .ok_or_else(|| OverlayError::Backend("response carried no data".into()))?;
    payload.validate()?;
    Ok(payload)
}

/// Parse a raw backend response body, as the HTTP backend does.
pub fn parse_simplify_response(json: &str) -> Result<DrawPayload, OverlayError> {
    let body: SimplifyResponse = serde_json::from_str(json).map_err(|e| OverlayError::JsonParse {
        context: "simplify response".into(),
        source: e,
    })?;
    unwrap_envelope(body)
}

// ============================================================================
// Mock Backend (for running without a model)
// ============================================================================

pub struct MockSummaryBackend;

impl SummaryBackend for MockSummaryBackend {
    fn simplify(&self, _image_data: &str) -> Result<DrawPayload, OverlayError> {
        Ok(DrawPayload {
            page_summary: "Wikipedia Homepage".into(),
            primary_actions: vec![
                ActionDescriptor {
                    icon_name: Some("search".into()),
                    ..ActionDescriptor::new(
                        "Search",
                        &["search", "search-input", "searchinput", "go", "find", "vector-search-box-input", "searchform"],
                    )
                    .with_type_hint(TypeHint::Input)
                },
                ActionDescriptor {
                    icon_name: Some("login".into()),
                    ..ActionDescriptor::new(
                        "Login",
                        &["log in", "sign in", "user-login", "pt-login", "account", "auth", "user"],
                    )
                    .with_type_hint(TypeHint::Activatable)
                },
            ],
        })
    }
}
