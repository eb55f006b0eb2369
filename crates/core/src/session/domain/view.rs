use std::fmt;
use std::path::PathBuf;

use super::recognizer::RecognitionErrorKind;

/// Which session controls are currently usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlStates {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

/// Human-readable session status, mirroring a single status line.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionStatus {
    /// No recognition capability on this host. Permanent.
    Unavailable,
    Idle,
    Listening,
    PermissionDenied,
    RecognitionFailed(RecognitionErrorKind),
    StartFailed(String),
    Copied,
    CopyFailed(String),
    Saved(PathBuf),
    SaveFailed(String),
}

impl SessionStatus {
    /// Transient statuses report the outcome of a one-shot command and do
    /// not reflect a change in session state.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Copied | Self::CopyFailed(_) | Self::Saved(_) | Self::SaveFailed(_)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "speech recognition is not available on this host"),
            Self::Idle => write!(f, "idle"),
            Self::Listening => write!(f, "listening…"),
            Self::PermissionDenied => write!(f, "microphone access denied"),
            Self::RecognitionFailed(kind) => write!(f, "recognition error: {kind}"),
            Self::StartFailed(reason) => write!(f, "could not start recognition: {reason}"),
            Self::Copied => write!(f, "copied to clipboard"),
            Self::CopyFailed(reason) => write!(f, "copy failed: {reason}"),
            Self::Saved(path) => write!(f, "saved to {}", path.display()),
            Self::SaveFailed(reason) => write!(f, "save failed: {reason}"),
        }
    }
}

/// Cross-cutting observer for controller output.
///
/// Decouples the state machine from any particular rendering (terminal,
/// GUI signals, test capture) so the controller can be exercised without a
/// real host.
pub trait SessionView: Send {
    /// Report a status change or a one-shot command outcome.
    fn status(&mut self, status: &SessionStatus);

    /// Render the displayed transcript after it changed.
    fn transcript(&mut self, text: &str);

    /// Reflect which controls are currently usable.
    fn controls(&mut self, controls: ControlStates);
}

/// Silent view that discards all updates.
///
/// Used where the caller reads controller state directly and by tests
/// that don't care about rendering.
pub struct NullSessionView;

impl SessionView for NullSessionView {
    fn status(&mut self, _status: &SessionStatus) {}
    fn transcript(&mut self, _text: &str) {}
    fn controls(&mut self, _controls: ControlStates) {}
}

/// Terminal view: statuses and the transcript line go to stdout, control
/// states to the debug log.
///
/// Consecutive identical transcript renders are suppressed so a toggle
/// that doesn't change the displayed text stays quiet.
pub struct StdoutSessionView {
    last_transcript: Option<String>,
}

impl StdoutSessionView {
    pub fn new() -> Self {
        Self {
            last_transcript: None,
        }
    }
}

impl Default for StdoutSessionView {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionView for StdoutSessionView {
    fn status(&mut self, status: &SessionStatus) {
        println!("[{status}]");
    }

    fn transcript(&mut self, text: &str) {
        if self.last_transcript.as_deref() == Some(text) {
            return;
        }
        println!("» {text}");
        self.last_transcript = Some(text.to_string());
    }

    fn controls(&mut self, controls: ControlStates) {
        log::debug!(
            "controls: start={} stop={}",
            controls.start_enabled,
            controls.stop_enabled
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_view_all_methods_are_noop() {
        let mut view = NullSessionView;
        view.status(&SessionStatus::Idle);
        view.transcript("hello");
        view.controls(ControlStates {
            start_enabled: true,
            stop_enabled: false,
        });
        // No panics = success
    }

    #[test]
    fn test_stdout_view_suppresses_duplicate_transcripts() {
        let mut view = StdoutSessionView::new();
        view.transcript("hello");
        view.transcript("hello");
        assert_eq!(view.last_transcript.as_deref(), Some("hello"));

        view.transcript("hello world");
        assert_eq!(view.last_transcript.as_deref(), Some("hello world"));
    }

    #[test]
    fn test_transient_statuses() {
        assert!(SessionStatus::Copied.is_transient());
        assert!(SessionStatus::Saved(PathBuf::from("/tmp/t.txt")).is_transient());
        assert!(SessionStatus::SaveFailed("disk full".into()).is_transient());
        assert!(!SessionStatus::Idle.is_transient());
        assert!(!SessionStatus::Listening.is_transient());
        assert!(!SessionStatus::PermissionDenied.is_transient());
    }

    #[test]
    fn test_status_display_wording() {
        assert_eq!(SessionStatus::Listening.to_string(), "listening…");
        assert_eq!(
            SessionStatus::PermissionDenied.to_string(),
            "microphone access denied"
        );
        assert_eq!(
            SessionStatus::RecognitionFailed(RecognitionErrorKind::Network).to_string(),
            "recognition error: network"
        );
    }
}
