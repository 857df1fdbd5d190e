use std::time::Duration;

use tap_assist::{
    host::{Interaction, OverlayView, Presenter, SpeechCapture, Surface, Timer},
    overlay::{error::OverlayError, overlay_model::MicState},
    surface::surface_model::{CandidateRef, RawElement},
};

/// Every host call the core made, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Walk,
    Mark(usize),
    Unmark(usize),
    Scroll(usize),
    FocusSelect(usize),
    Activate(usize),
    StartCapture,
    StopCapture,
    Render(OverlayView),
    Remove,
    Alert(String),
    SetMic(MicState),
    Schedule(Duration, u64),
}

pub struct FakeHost {
    pub elements: Vec<RawElement>,
    pub speech_supported: bool,
    pub calls: Vec<HostCall>,
}

impl FakeHost {
    pub fn new(elements: Vec<RawElement>) -> Self {
        Self {
            elements,
            speech_supported: true,
            calls: Vec::new(),
        }
    }

    pub fn without_speech(mut self) -> Self {
        self.speech_supported = false;
        self
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Alert(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &HostCall) -> usize {
        self.calls.iter().filter(|c| *c == wanted).count()
    }

    pub fn scheduled_tokens(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Schedule(_, token) => Some(*token),
                _ => None,
            })
            .collect()
    }

    pub fn walks(&self) -> usize {
        self.count(&HostCall::Walk)
    }
}

impl Surface for FakeHost {
    fn walk(&mut self) -> Result<Vec<RawElement>, OverlayError> {
        self.calls.push(HostCall::Walk);
        Ok(self.elements.clone())
    }
}

impl Interaction for FakeHost {
    fn mark(&mut self, target: CandidateRef) -> Result<(), OverlayError> {
        self.calls.push(HostCall::Mark(target.0));
        Ok(())
    }

    fn unmark(&mut self, target: CandidateRef) -> Result<(), OverlayError> {
        self.calls.push(HostCall::Unmark(target.0));
        Ok(())
    }

    fn scroll_into_view(&mut self, target: CandidateRef) -> Result<(), OverlayError> {
        self.calls.push(HostCall::Scroll(target.0));
        Ok(())
    }

    fn focus_and_select(&mut self, target: CandidateRef) -> Result<(), OverlayError> {
        self.calls.push(HostCall::FocusSelect(target.0));
        Ok(())
    }

    fn activate(&mut self, target: CandidateRef) -> Result<(), OverlayError> {
        self.calls.push(HostCall::Activate(target.0));
        Ok(())
    }
}

impl SpeechCapture for FakeHost {
    fn start_capture(&mut self) -> Result<(), OverlayError> {
        if !self.speech_supported {
            return Err(OverlayError::CapabilityUnavailable("no speech in test host".into()));
        }
        self.calls.push(HostCall::StartCapture);
        Ok(())
    }

    fn stop_capture(&mut self) -> Result<(), OverlayError> {
        self.calls.push(HostCall::StopCapture);
        Ok(())
    }
}

impl Presenter for FakeHost {
    fn render(&mut self, view: &OverlayView) -> Result<(), OverlayError> {
        self.calls.push(HostCall::Render(view.clone()));
        Ok(())
    }

    fn remove(&mut self) -> Result<(), OverlayError> {
        self.calls.push(HostCall::Remove);
        Ok(())
    }

    fn alert(&mut self, message: &str) -> Result<(), OverlayError> {
        self.calls.push(HostCall::Alert(message.to_string()));
        Ok(())
    }

    fn set_mic(&mut self, mic: MicState) -> Result<(), OverlayError> {
        self.calls.push(HostCall::SetMic(mic));
        Ok(())
    }
}

impl Timer for FakeHost {
    fn schedule(&mut self, delay: Duration, token: u64) -> Result<(), OverlayError> {
        self.calls.push(HostCall::Schedule(delay, token));
        Ok(())
    }
}
