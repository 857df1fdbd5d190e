use std::collections::HashMap;

use tracing::{info, warn};

use crate::{
    action::{
        action_model::{DrawPayload, parse_draw_request},
        voice::match_transcript_index,
    },
    host::OverlayHost,
    overlay::{
        error::OverlayError,
        executor::{execute, finish_acknowledgment},
        overlay_model::{MicState, OverlayConfig, OverlayEvent, OverlaySession, OverlayState},
    },
    resolve::engine::{Resolution, ResolutionEngine, ResolvedTarget},
    trace::{logger::TraceLogger, trace::TraceEvent},
};

/// Owns the (at most one) overlay session and moves it between states.
///
/// Failures a user can recover from are alerted and swallowed; only host
/// plumbing errors escape [`OverlayMachine::dispatch`].
pub struct OverlayMachine {
    engine: ResolutionEngine,
    config: OverlayConfig,
    session: Option<OverlaySession>,
    // Markers waiting for their acknowledgment timer, by token.
    pending_acks: HashMap<u64, ResolvedTarget>,
    next_token: u64,
    step: u64,
}

impl OverlayMachine {
    pub fn new(engine: ResolutionEngine, config: OverlayConfig) -> Self {
        Self {
            engine,
            config,
            session: None,
            pending_acks: HashMap::new(),
            next_token: 1,
            step: 0,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(OverlayState::Closed)
    }

    pub fn session(&self) -> Option<&OverlaySession> {
        self.session.as_ref()
    }

    pub fn pending_acknowledgments(&self) -> usize {
        self.pending_acks.len()
    }

    pub fn dispatch<H: OverlayHost>(
        &mut self,
        host: &mut H,
        event: OverlayEvent,
        tracer: &TraceLogger,
    ) -> Result<OverlayState, OverlayError> {
        let trace = TraceEvent::now(self.step, self.state(), event.name());
        self.step += 1;

        match event {
            OverlayEvent::RuntimeMessage(message) => match parse_draw_request(&message) {
                Ok(Some(payload)) => self.open(host, payload, trace, tracer)?,
                Ok(None) => tracer.log(&trace.with_decision("ignored")),
                Err(e) => {
                    warn!(error = %e, "rejected draw request");
                    host.alert(&e.to_string())?;
                    tracer.log(&trace.with_decision("rejected").with_failure(&e));
                }
            },

            OverlayEvent::Draw(payload) => match payload.validate() {
                Ok(()) => self.open(host, payload, trace, tracer)?,
                Err(e) => {
                    host.alert(&e.to_string())?;
                    tracer.log(&trace.with_decision("rejected").with_failure(&e));
                }
            },

            OverlayEvent::ActionActivated(index) => match self.state() {
                OverlayState::Open => self.search(host, index, trace, tracer)?,
                OverlayState::Listening => {
                    self.stop_listening(host)?;
                    self.search(host, index, trace, tracer)?;
                }
                _ => tracer.log(&trace.with_decision("ignored")),
            },

            OverlayEvent::MicActivated => self.listen(host, trace, tracer)?,

            OverlayEvent::Transcript(transcript) => {
                if self.state() != OverlayState::Listening {
                    tracer.log(&trace.with_decision("ignored"));
                } else {
                    self.stop_listening(host)?;
                    let matched = self
                        .session
                        .as_ref()
                        .and_then(|s| match_transcript_index(&transcript, &s.actions));

                    match matched {
                        Some(index) => self.search(host, index, trace, tracer)?,
                        None => {
                            let e = OverlayError::VoiceNoMatch {
                                transcript: transcript.trim().to_lowercase(),
                            };
                            host.alert(&e.to_string())?;
                            tracer.log(&trace.with_decision("no_match").with_failure(&e));
                        }
                    }
                }
            }

            OverlayEvent::CaptureEnded => {
                if self.state() == OverlayState::Listening {
                    self.stop_listening(host)?;
                    tracer.log(&trace.with_decision("capture_ended"));
                }
            }

            OverlayEvent::Exit => {
                if self.session.is_some() {
                    self.teardown(host)?;
                    tracer.log(&trace.with_decision("closed"));
                }
            }

            OverlayEvent::AckElapsed { token } => {
                if let Some(target) = self.pending_acks.remove(&token) {
                    finish_acknowledgment(host, &target)?;
                    let closes_session = self
                        .session
                        .as_ref()
                        .is_some_and(|s| s.closing_token == Some(token));
                    if closes_session {
                        self.teardown(host)?;
                    }
                    tracer.log(&trace.with_decision("acknowledged"));
                }
            }
        }

        Ok(self.state())
    }

    fn open<H: OverlayHost>(
        &mut self,
        host: &mut H,
        payload: DrawPayload,
        trace: TraceEvent,
        tracer: &TraceLogger,
    ) -> Result<(), OverlayError> {
        self.teardown(host)?;

        let session = OverlaySession::new(payload);
        host.render(&session.view())?;
        info!(actions = session.actions.len(), "overlay opened");
        self.session = Some(session);

        tracer.log(&trace.with_decision("opened"));
        Ok(())
    }

    /// Drop the current session, if any, cancelling voice capture first.
    fn teardown<H: OverlayHost>(&mut self, host: &mut H) -> Result<(), OverlayError> {
        if let Some(session) = self.session.take() {
            if session.active_listening {
                host.stop_capture()?;
            }
            host.remove()?;
            info!("overlay closed");
        }
        Ok(())
    }

    fn listen<H: OverlayHost>(
        &mut self,
        host: &mut H,
        trace: TraceEvent,
        tracer: &TraceLogger,
    ) -> Result<(), OverlayError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if session.state != OverlayState::Open || session.voice_disabled {
            tracer.log(&trace.with_decision("ignored"));
            return Ok(());
        }

        match host.start_capture() {
            Ok(()) => {
                session.active_listening = true;
                session.state = OverlayState::Listening;
                host.set_mic(MicState::Listening)?;
                tracer.log(&trace.with_decision("listening"));
            }
            Err(e @ OverlayError::CapabilityUnavailable(_)) => {
                session.voice_disabled = true;
                host.set_mic(MicState::Disabled)?;
                host.alert(&e.to_string())?;
                tracer.log(&trace.with_decision("voice_disabled").with_failure(&e));
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn stop_listening<H: OverlayHost>(&mut self, host: &mut H) -> Result<(), OverlayError> {
        if let Some(session) = self.session.as_mut() {
            if session.active_listening {
                session.active_listening = false;
                host.stop_capture()?;
                host.set_mic(MicState::Idle)?;
            }
            if session.state == OverlayState::Listening {
                session.state = OverlayState::Open;
            }
        }
        Ok(())
    }

    fn search<H: OverlayHost>(
        &mut self,
        host: &mut H,
        index: usize,
        trace: TraceEvent,
        tracer: &TraceLogger,
    ) -> Result<(), OverlayError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let Some(action) = session.actions.get(index).cloned() else {
            warn!(index, "activation for unknown action");
            tracer.log(&trace.with_decision("ignored"));
            return Ok(());
        };

        session.state = OverlayState::Searching;
        let report = match self.engine.resolve(host, &action) {
            Ok(report) => report,
            Err(e) => {
                session.state = OverlayState::Open;
                return Err(e);
            }
        };
        let threshold = self.engine.threshold();
        let trace = trace
            .with_label(&action.label)
            .with_report(&report, threshold);

        match report.resolution {
            Resolution::Resolved(target) => {
                session.state = OverlayState::Acting;
                let token = self.next_token;
                self.next_token += 1;
                session.closing_token = Some(token);
                self.pending_acks.insert(token, target.clone());

                match execute(host, &target, &action, self.config.ack_delay(), token) {
                    Ok(execution) => {
                        if let Err(e) = execution.outcome {
                            warn!(error = %e, "interaction failed");
                            tracer.log(&trace.with_decision("act_failed").with_failure(&e));
                            return Err(e);
                        }
                    }
                    Err(e) => {
                        // No timer will fire for this token.
                        self.pending_acks.remove(&token);
                        self.teardown(host)?;
                        tracer.log(&trace.with_decision("act_failed").with_failure(&e));
                        return Err(e);
                    }
                }
                tracer.log(&trace.with_decision("acting"));
            }
            Resolution::NotFound { max_score } => {
                session.state = OverlayState::Failed;
                let e = OverlayError::ResolutionFailure {
                    label: action.label.clone(),
                    max_score,
                    threshold,
                };
                session.state = OverlayState::Open;
                tracer.log(&trace.with_decision("not_found").with_failure(&e));
                host.alert(&e.to_string())?;
            }
        }
        Ok(())
    }
}
