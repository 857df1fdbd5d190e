use std::fmt;

#[derive(Debug)]
pub enum OverlayError {
    /// Draw request missing or carrying unusable data
    Input(String),

    /// No candidate reached the acceptance threshold
    ResolutionFailure { label: String, max_score: u32, threshold: u32 },

    /// Host cannot capture speech
    CapabilityUnavailable(String),

    /// Transcript matched no known action label
    VoiceNoMatch { transcript: String },

    /// Reading from or writing to the host failed
    HostIo(String),

    /// Host answered a command with an error or an unexpected reply
    HostProtocol { command: String, error: String },

    /// JSON parsing failed (host reply, backend response, fixture file)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (command to the host)
    JsonSerialize { context: String, source: serde_json::Error },

    /// Summarizing backend request failed
    Backend(String),
}

impl OverlayError {
    /// Errors after which the host stream can no longer be used.
    pub fn ends_session_loop(&self) -> bool {
        matches!(self, OverlayError::HostIo(_))
    }
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::Input(msg) => {
                write!(f, "Error: {}", msg)
            }
            OverlayError::ResolutionFailure { label, max_score, threshold } => {
                write!(
                    f,
                    "I couldn't find a button or input for \"{}\" (best score {}, needed {})",
                    label, max_score, threshold
                )
            }
            OverlayError::CapabilityUnavailable(msg) => {
                write!(f, "Voice control is not available: {}", msg)
            }
            OverlayError::VoiceNoMatch { transcript } => {
                write!(f, "I heard \"{}\", but I don't see a button for that", transcript)
            }
            OverlayError::HostIo(msg) => {
                write!(f, "Host I/O failed: {}", msg)
            }
            OverlayError::HostProtocol { command, error } => {
                write!(f, "Host rejected '{}': {}", command, error)
            }
            OverlayError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            OverlayError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            OverlayError::Backend(msg) => {
                write!(f, "Backend request failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OverlayError::JsonParse { source, .. } => Some(source),
            OverlayError::JsonSerialize { source, .. } => Some(source),
            _ => None,
        }
    }
}
