use std::fmt;

use crate::shared::constants::DEFAULT_LANGUAGE;
use crate::transcript::domain::result_event::ResultEvent;

/// Session settings snapshotted when recognition starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Locale tag handed to the provider (e.g. "en-US").
    pub language: String,
    /// Whether the provider should report interim (not yet finalized)
    /// results. Providers may ignore this; visibility is enforced at
    /// display time either way.
    pub interim_results: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            interim_results: true,
        }
    }
}

/// Provider-reported error vocabulary.
///
/// Kinds the provider reports outside this set are carried verbatim in
/// `Other`. Every kind is recoverable: the session returns to idle and a
/// fresh start may be issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    NoSpeech,
    Aborted,
    AudioCapture,
    Network,
    NotAllowed,
    Other(String),
}

impl RecognitionErrorKind {
    /// Maps a provider error string to a kind, keeping unknown strings
    /// verbatim.
    pub fn parse(kind: &str) -> Self {
        match kind {
            "no-speech" => Self::NoSpeech,
            "aborted" => Self::Aborted,
            "audio-capture" => Self::AudioCapture,
            "network" => Self::Network,
            "not-allowed" | "service-not-allowed" => Self::NotAllowed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpeech => write!(f, "no-speech"),
            Self::Aborted => write!(f, "aborted"),
            Self::AudioCapture => write!(f, "audio-capture"),
            Self::Network => write!(f, "network"),
            Self::NotAllowed => write!(f, "not-allowed"),
            Self::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// Lifecycle events delivered by a recognition session.
#[derive(Clone, Debug, PartialEq)]
pub enum RecognitionEvent {
    /// The provider accepted the start request and is capturing audio.
    Started,
    /// New recognition results (final and/or interim entries).
    Result(ResultEvent),
    /// The session closed, whether user-initiated or provider-initiated
    /// (silence timeout, provider-side closure).
    Ended,
    /// The provider failed; `Ended` follows.
    Error(RecognitionErrorKind),
}

/// Capability boundary to the host speech-recognition provider.
///
/// Implementations deliver [`RecognitionEvent`]s through whatever channel
/// they were constructed with; `start` only requests that a session begin.
/// The host delivers events strictly sequentially, so consumers need no
/// synchronization beyond ordinary sequential state updates.
pub trait RecognitionSession: Send {
    /// Request that a recognition session begin with the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider refuses to start (for example,
    /// because a session is already running).
    fn start(&mut self, config: &SessionConfig) -> Result<(), Box<dyn std::error::Error>>;

    /// Request that the active session end. Safe to call when no session
    /// is active; `Ended` is only delivered for sessions that started.
    fn stop(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_parse_known_strings() {
        assert_eq!(
            RecognitionErrorKind::parse("no-speech"),
            RecognitionErrorKind::NoSpeech
        );
        assert_eq!(
            RecognitionErrorKind::parse("network"),
            RecognitionErrorKind::Network
        );
        assert_eq!(
            RecognitionErrorKind::parse("service-not-allowed"),
            RecognitionErrorKind::NotAllowed
        );
    }

    #[test]
    fn test_error_kind_parse_keeps_unknown_verbatim() {
        assert_eq!(
            RecognitionErrorKind::parse("bad-grammar"),
            RecognitionErrorKind::Other("bad-grammar".to_string())
        );
    }

    #[test]
    fn test_error_kind_display_round_trips() {
        for kind in ["no-speech", "aborted", "audio-capture", "network"] {
            assert_eq!(RecognitionErrorKind::parse(kind).to_string(), kind);
        }
    }

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.language, "en-US");
        assert!(config.interim_results);
    }
}
