use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::action_model::{ActionDescriptor, DrawPayload};
use crate::host::OverlayView;

pub const ACK_DELAY_MS: u64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverlayState {
    Closed,
    Open,
    Listening,
    Searching,
    Acting,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MicState {
    Idle,
    Listening,
    Disabled,
}

/// Everything that can happen to the overlay, one variant per user gesture
/// or host callback.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    /// Raw message from the draw request channel, not yet validated.
    RuntimeMessage(Value),
    Draw(DrawPayload),
    ActionActivated(usize),
    MicActivated,
    Transcript(String),
    CaptureEnded,
    Exit,
    AckElapsed { token: u64 },
}

impl OverlayEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OverlayEvent::RuntimeMessage(_) => "runtime_message",
            OverlayEvent::Draw(_) => "draw",
            OverlayEvent::ActionActivated(_) => "action_activated",
            OverlayEvent::MicActivated => "mic_activated",
            OverlayEvent::Transcript(_) => "transcript",
            OverlayEvent::CaptureEnded => "capture_ended",
            OverlayEvent::Exit => "exit",
            OverlayEvent::AckElapsed { .. } => "ack_elapsed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_ack_delay_ms")]
    pub ack_delay_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            ack_delay_ms: ACK_DELAY_MS,
        }
    }
}

impl OverlayConfig {
    pub fn ack_delay(&self) -> Duration {
        Duration::from_millis(self.ack_delay_ms)
    }
}

fn default_ack_delay_ms() -> u64 {
    ACK_DELAY_MS
}

/// The single live overlay. Only [`crate::overlay::machine::OverlayMachine`]
/// creates one, after tearing down its predecessor.
#[derive(Debug, Clone)]
pub struct OverlaySession {
    pub page_summary: String,
    pub actions: Vec<ActionDescriptor>,
    pub state: OverlayState,
    pub active_listening: bool,
    pub voice_disabled: bool,
    /// Timer token that closes this session once the acknowledgment ends.
    pub closing_token: Option<u64>,
}

impl OverlaySession {
    pub(crate) fn new(payload: DrawPayload) -> Self {
        Self {
            page_summary: payload.page_summary,
            actions: payload.primary_actions,
            state: OverlayState::Open,
            active_listening: false,
            voice_disabled: false,
            closing_token: None,
        }
    }

    pub fn mic_state(&self) -> MicState {
        if self.voice_disabled {
            MicState::Disabled
        } else if self.active_listening {
            MicState::Listening
        } else {
            MicState::Idle
        }
    }

    pub fn view(&self) -> OverlayView {
        OverlayView {
            page_summary: self.page_summary.clone(),
            labels: self.actions.iter().map(|a| a.label.clone()).collect(),
            mic: self.mic_state(),
        }
    }
}
