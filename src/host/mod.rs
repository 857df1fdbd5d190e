//! Capabilities the core needs from the page it runs against.
//!
//! All calls happen on the host's single UI thread; none of them block on
//! user input. Results that arrive later (speech, timers, clicks) come back
//! as [`crate::overlay::overlay_model::OverlayEvent`]s.

use std::time::Duration;

use serde::Serialize;

use crate::overlay::error::OverlayError;
use crate::overlay::overlay_model::MicState;
use crate::surface::surface_model::{CandidateRef, RawElement};

pub mod bridge;
pub mod snapshot;

pub trait Surface {
    /// Every live node of the interactive surface, in document order.
    fn walk(&mut self) -> Result<Vec<RawElement>, OverlayError>;
}

pub trait Interaction {
    fn mark(&mut self, target: CandidateRef) -> Result<(), OverlayError>;
    fn unmark(&mut self, target: CandidateRef) -> Result<(), OverlayError>;
    fn scroll_into_view(&mut self, target: CandidateRef) -> Result<(), OverlayError>;
    fn focus_and_select(&mut self, target: CandidateRef) -> Result<(), OverlayError>;
    fn activate(&mut self, target: CandidateRef) -> Result<(), OverlayError>;
}

pub trait SpeechCapture {
    /// Begin a single-utterance capture. `CapabilityUnavailable` if the host has none.
    fn start_capture(&mut self) -> Result<(), OverlayError>;
    fn stop_capture(&mut self) -> Result<(), OverlayError>;
}

/// What the overlay panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayView {
    pub page_summary: String,
    pub labels: Vec<String>,
    pub mic: MicState,
}

pub trait Presenter {
    fn render(&mut self, view: &OverlayView) -> Result<(), OverlayError>;
    /// Remove the overlay node tree. Must be harmless when none is present.
    fn remove(&mut self) -> Result<(), OverlayError>;
    fn alert(&mut self, message: &str) -> Result<(), OverlayError>;
    fn set_mic(&mut self, mic: MicState) -> Result<(), OverlayError>;
}

pub trait Timer {
    /// Deliver `AckElapsed { token }` after `delay`. Not cancellable.
    fn schedule(&mut self, delay: Duration, token: u64) -> Result<(), OverlayError>;
}

pub trait OverlayHost: Surface + Interaction + SpeechCapture + Presenter + Timer {}

impl<T> OverlayHost for T where T: Surface + Interaction + SpeechCapture + Presenter + Timer {}
