use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::host::{Interaction, OverlayView, Presenter, SpeechCapture, Surface, Timer};
use crate::overlay::error::OverlayError;
use crate::overlay::machine::OverlayMachine;
use crate::overlay::overlay_model::{MicState, OverlayEvent};
use crate::surface::surface_model::{CandidateRef, RawElement};
use crate::trace::logger::TraceLogger;

/// Command sent to the page shim (one JSON line).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HostCommand {
    Walk,
    Mark { target: usize },
    Unmark { target: usize },
    ScrollIntoView { target: usize },
    FocusSelect { target: usize },
    Activate { target: usize },
    StartCapture,
    StopCapture,
    Render { view: OverlayView },
    Remove,
    Alert { message: String },
    SetMic { mic: MicState },
    Schedule { delay_ms: u64, token: u64 },
}

impl HostCommand {
    pub fn name(&self) -> &'static str {
        match self {
            HostCommand::Walk => "walk",
            HostCommand::Mark { .. } => "mark",
            HostCommand::Unmark { .. } => "unmark",
            HostCommand::ScrollIntoView { .. } => "scroll_into_view",
            HostCommand::FocusSelect { .. } => "focus_select",
            HostCommand::Activate { .. } => "activate",
            HostCommand::StartCapture => "start_capture",
            HostCommand::StopCapture => "stop_capture",
            HostCommand::Render { .. } => "render",
            HostCommand::Remove => "remove",
            HostCommand::Alert { .. } => "alert",
            HostCommand::SetMic { .. } => "set_mic",
            HostCommand::Schedule { .. } => "schedule",
        }
    }
}

/// Reply from the page shim to the command last sent.
#[derive(Debug, Deserialize)]
pub struct HostReply {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub elements: Option<Vec<RawElement>>,
    #[serde(default)]
    pub supported: Option<bool>,
}

/// Something that happened on the page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    RuntimeMessage { message: Value },
    ActionClicked { index: usize },
    MicClicked,
    SpeechResult { transcript: String },
    SpeechEnd,
    ExitClicked,
    Timer { token: u64 },
}

impl From<HostEvent> for OverlayEvent {
    fn from(event: HostEvent) -> Self {
        match event {
            HostEvent::RuntimeMessage { message } => OverlayEvent::RuntimeMessage(message),
            HostEvent::ActionClicked { index } => OverlayEvent::ActionActivated(index),
            HostEvent::MicClicked => OverlayEvent::MicActivated,
            HostEvent::SpeechResult { transcript } => OverlayEvent::Transcript(transcript),
            HostEvent::SpeechEnd => OverlayEvent::CaptureEnded,
            HostEvent::ExitClicked => OverlayEvent::Exit,
            HostEvent::Timer { token } => OverlayEvent::AckElapsed { token },
        }
    }
}

/// An overlay host living on the other end of an NDJSON stream.
///
/// Commands go out on `writer`; events and command replies come back on
/// `reader`. Events that arrive while a reply is awaited are queued.
pub struct HostBridge<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    queued: VecDeque<HostEvent>,
}

enum Inbound {
    Event(HostEvent),
    Reply(HostReply),
}

impl<R: BufRead, W: Write> HostBridge<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            queued: VecDeque::new(),
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Next page event, or `None` once the stream is closed.
    pub fn next_event(&mut self) -> Result<Option<HostEvent>, OverlayError> {
        if let Some(event) = self.queued.pop_front() {
            return Ok(Some(event));
        }

        loop {
            match self.read_inbound()? {
                None => return Ok(None),
                Some(Inbound::Event(event)) => return Ok(Some(event)),
                Some(Inbound::Reply(_)) => warn!("dropping reply with no command outstanding"),
            }
        }
    }

    fn read_inbound(&mut self) -> Result<Option<Inbound>, OverlayError> {
        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .map_err(|e| OverlayError::HostIo(format!("failed to read from host: {}", e)))?;
            if read == 0 {
                return Ok(None);
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = match serde_json::from_str(line) {
                Ok(v) => v,
                Err(e) => {
                    warn!(error = %e, "skipping malformed host line");
                    continue;
                }
            };

            let parsed = if value.get("event").is_some() {
                serde_json::from_value(value).map(Inbound::Event)
            } else {
                serde_json::from_value(value).map(Inbound::Reply)
            };

            match parsed {
                Ok(inbound) => return Ok(Some(inbound)),
                Err(e) => warn!(error = %e, "skipping unrecognised host line"),
            }
        }
    }

    /// Send a command and wait for its reply.
    fn send(&mut self, command: &HostCommand) -> Result<HostReply, OverlayError> {
        let json = serde_json::to_string(command).map_err(|e| OverlayError::JsonSerialize {
            context: "HostCommand".into(),
            source: e,
        })?;

        writeln!(self.writer, "{}", json)
            .map_err(|e| OverlayError::HostIo(format!("failed to write to host: {}", e)))?;
        self.writer
            .flush()
            .map_err(|e| OverlayError::HostIo(format!("failed to flush host stream: {}", e)))?;
        debug!(cmd = command.name(), "sent host command");

        loop {
            match self.read_inbound()? {
                None => {
                    return Err(OverlayError::HostIo(format!(
                        "host closed the stream while '{}' was outstanding",
                        command.name()
                    )));
                }
                Some(Inbound::Event(event)) => self.queued.push_back(event),
                Some(Inbound::Reply(reply)) => return Ok(reply),
            }
        }
    }

    /// Send a command and verify it succeeded.
    fn send_ok(&mut self, command: HostCommand) -> Result<HostReply, OverlayError> {
        let reply = self.send(&command)?;
        if !reply.ok {
            return Err(OverlayError::HostProtocol {
                command: command.name().into(),
                error: reply.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(reply)
    }
}

impl<R: BufRead, W: Write> Surface for HostBridge<R, W> {
    fn walk(&mut self) -> Result<Vec<RawElement>, OverlayError> {
        let reply = self.send_ok(HostCommand::Walk)?;
        reply.elements.ok_or_else(|| OverlayError::HostProtocol {
            command: "walk".into(),
            error: "No elements in walk reply".into(),
        })
    }
}

impl<R: BufRead, W: Write> Interaction for HostBridge<R, W> {
    fn mark(&mut self, target: CandidateRef) -> Result<(), OverlayError> {
        self.send_ok(HostCommand::Mark { target: target.0 }).map(|_| ())
    }

    fn unmark(&mut self, target: CandidateRef) -> Result<(), OverlayError> {
        self.send_ok(HostCommand::Unmark { target: target.0 }).map(|_| ())
    }

    fn scroll_into_view(&mut self, target: CandidateRef) -> Result<(), OverlayError> {
        self.send_ok(HostCommand::ScrollIntoView { target: target.0 }).map(|_| ())
    }

    fn focus_and_select(&mut self, target: CandidateRef) -> Result<(), OverlayError> {
        self.send_ok(HostCommand::FocusSelect { target: target.0 }).map(|_| ())
    }

    fn activate(&mut self, target: CandidateRef) -> Result<(), OverlayError> {
        self.send_ok(HostCommand::Activate { target: target.0 }).map(|_| ())
    }
}

impl<R: BufRead, W: Write> SpeechCapture for HostBridge<R, W> {
    fn start_capture(&mut self) -> Result<(), OverlayError> {
        let reply = self.send(&HostCommand::StartCapture)?;
        if reply.supported == Some(false) {
            return Err(OverlayError::CapabilityUnavailable(
                "this browser doesn't support speech recognition".into(),
            ));
        }
        if !reply.ok {
            return Err(OverlayError::CapabilityUnavailable(
                reply
                    .error
                    .unwrap_or_else(|| "speech recognition could not start".into()),
            ));
        }
        Ok(())
    }

    fn stop_capture(&mut self) -> Result<(), OverlayError> {
        self.send_ok(HostCommand::StopCapture).map(|_| ())
    }
}

impl<R: BufRead, W: Write> Presenter for HostBridge<R, W> {
    fn render(&mut self, view: &OverlayView) -> Result<(), OverlayError> {
        self.send_ok(HostCommand::Render { view: view.clone() }).map(|_| ())
    }

    fn remove(&mut self) -> Result<(), OverlayError> {
        self.send_ok(HostCommand::Remove).map(|_| ())
    }

    fn alert(&mut self, message: &str) -> Result<(), OverlayError> {
        self.send_ok(HostCommand::Alert {
            message: message.to_string(),
        })
        .map(|_| ())
    }

    fn set_mic(&mut self, mic: MicState) -> Result<(), OverlayError> {
        self.send_ok(HostCommand::SetMic { mic }).map(|_| ())
    }
}

impl<R: BufRead, W: Write> Timer for HostBridge<R, W> {
    fn schedule(&mut self, delay: Duration, token: u64) -> Result<(), OverlayError> {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.send_ok(HostCommand::Schedule { delay_ms, token }).map(|_| ())
    }
}

/// Drive the overlay from bridge events until the host closes the stream.
///
/// A command the host rejects is logged and the loop goes on; a broken
/// stream ends it.
pub fn serve<R: BufRead, W: Write>(
    bridge: &mut HostBridge<R, W>,
    machine: &mut OverlayMachine,
    tracer: &TraceLogger,
) -> Result<(), OverlayError> {
    while let Some(event) = bridge.next_event()? {
        match machine.dispatch(bridge, event.into(), tracer) {
            Ok(state) => debug!(?state, "event handled"),
            Err(e) if e.ends_session_loop() => return Err(e),
            Err(e) => warn!(error = %e, "event failed"),
        }
    }
    Ok(())
}
