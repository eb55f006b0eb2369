use log::{debug, warn};

use crate::export::domain::clipboard::ClipboardSink;
use crate::export::domain::exporter::TranscriptExporter;
use crate::session::domain::microphone::{MicAccess, MicrophoneGate};
use crate::session::domain::recognizer::{
    RecognitionEvent, RecognitionSession, SessionConfig,
};
use crate::session::domain::view::{ControlStates, SessionStatus, SessionView};
use crate::transcript::domain::transcript_buffer::TranscriptBuffer;

/// Recognition lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
}

/// Owns the recognition lifecycle and the accumulated transcript, reacting
/// to provider lifecycle events and user commands.
///
/// Collaborator failures are absorbed into status updates: no operation is
/// fatal, and every error path leaves the controller in a state from which
/// a fresh `start` can be issued. The controller is single-threaded; the
/// front-end delivers commands and recognition events to it strictly
/// sequentially.
pub struct SessionController {
    recognizer: Option<Box<dyn RecognitionSession>>,
    microphone: Box<dyn MicrophoneGate>,
    clipboard: Box<dyn ClipboardSink>,
    exporter: Box<dyn TranscriptExporter>,
    view: Box<dyn SessionView>,
    transcript: TranscriptBuffer,
    language: String,
    interim_enabled: bool,
    state: SessionState,
    // Guards the window between a successful start request and the
    // provider's Started event.
    start_pending: bool,
}

impl SessionController {
    /// Builds a controller around its collaborators. A `None` recognizer
    /// means the host has no recognition capability: start stays disabled
    /// for the controller's lifetime.
    pub fn new(
        recognizer: Option<Box<dyn RecognitionSession>>,
        microphone: Box<dyn MicrophoneGate>,
        clipboard: Box<dyn ClipboardSink>,
        exporter: Box<dyn TranscriptExporter>,
        view: Box<dyn SessionView>,
        config: SessionConfig,
    ) -> Self {
        let mut controller = Self {
            recognizer,
            microphone,
            clipboard,
            exporter,
            view,
            transcript: TranscriptBuffer::new(),
            language: config.language,
            interim_enabled: config.interim_results,
            state: SessionState::Idle,
            start_pending: false,
        };
        let initial = if controller.recognizer.is_some() {
            SessionStatus::Idle
        } else {
            SessionStatus::Unavailable
        };
        controller.view.status(&initial);
        controller.push_controls();
        controller
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    /// True from a successful start request until the session reports
    /// `Started`, `Ended`, or `Error`.
    pub fn is_session_active(&self) -> bool {
        self.state == SessionState::Listening || self.start_pending
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn interim_enabled(&self) -> bool {
        self.interim_enabled
    }

    /// The transcript as it should currently be displayed.
    pub fn displayed(&self) -> String {
        self.transcript.displayed(self.interim_enabled)
    }

    /// Begins a recognition session: requests microphone access, resets
    /// the transcript, and asks the capability to start. A no-op when the
    /// capability is absent or a session is already active.
    pub fn start(&mut self) {
        if self.recognizer.is_none() {
            self.view.status(&SessionStatus::Unavailable);
            return;
        }
        if self.is_session_active() {
            debug!("start ignored: session already active");
            return;
        }

        match self.microphone.request_access() {
            Ok(MicAccess::Granted) => {}
            Ok(MicAccess::Denied) => {
                self.view.status(&SessionStatus::PermissionDenied);
                return;
            }
            Err(e) => {
                warn!("microphone permission request failed: {e}");
                self.view.status(&SessionStatus::PermissionDenied);
                return;
            }
        }

        self.transcript.clear();
        self.push_transcript();

        let config = SessionConfig {
            language: self.language.clone(),
            interim_results: self.interim_enabled,
        };
        let outcome = match self.recognizer.as_mut() {
            Some(recognizer) => recognizer.start(&config),
            None => return,
        };
        match outcome {
            Ok(()) => {
                self.start_pending = true;
                self.push_controls();
            }
            Err(e) => {
                warn!("recognition start failed: {e}");
                self.view.status(&SessionStatus::StartFailed(e.to_string()));
            }
        }
    }

    /// Ends the active session. The transcript is retained; the state
    /// change happens when the session reports `Ended`. Safe to call when
    /// idle or while a start is pending.
    pub fn stop(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
    }

    /// Drives the state machine with one provider lifecycle event.
    pub fn handle_event(&mut self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Started => {
                self.start_pending = false;
                self.state = SessionState::Listening;
                self.view.status(&SessionStatus::Listening);
                self.push_controls();
            }
            RecognitionEvent::Result(result) => {
                self.transcript.apply(&result);
                self.push_transcript();
            }
            RecognitionEvent::Ended => {
                self.start_pending = false;
                self.state = SessionState::Idle;
                self.view.status(&SessionStatus::Idle);
                self.push_controls();
            }
            RecognitionEvent::Error(kind) => {
                self.start_pending = false;
                self.state = SessionState::Idle;
                self.view.status(&SessionStatus::RecognitionFailed(kind));
                self.push_controls();
            }
        }
    }

    /// Empties the transcript. Legal while listening; session state is
    /// unaffected.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.push_transcript();
    }

    /// Copies the displayed transcript to the clipboard sink. Failure is a
    /// transient status; buffer and state are untouched.
    pub fn copy(&mut self) {
        let text = self.displayed();
        match self.clipboard.write_text(&text) {
            Ok(()) => self.view.status(&SessionStatus::Copied),
            Err(e) => self.view.status(&SessionStatus::CopyFailed(e.to_string())),
        }
    }

    /// Exports the displayed transcript as a file. Failure is a transient
    /// status; buffer and state are untouched.
    pub fn save(&mut self) {
        let text = self.displayed();
        match self.exporter.export(&text) {
            Ok(path) => self.view.status(&SessionStatus::Saved(path)),
            Err(e) => self.view.status(&SessionStatus::SaveFailed(e.to_string())),
        }
    }

    /// Toggles interim-result display and re-renders immediately. The
    /// provider-side preference is snapshotted at the next start.
    pub fn set_interim_enabled(&mut self, enabled: bool) {
        if self.interim_enabled != enabled {
            self.interim_enabled = enabled;
            self.push_transcript();
        }
    }

    /// Sets the recognition language for the next session start.
    pub fn set_language(&mut self, tag: impl Into<String>) {
        self.language = tag.into();
    }

    fn push_transcript(&mut self) {
        let text = self.transcript.displayed(self.interim_enabled);
        self.view.transcript(&text);
    }

    fn push_controls(&mut self) {
        let controls = ControlStates {
            start_enabled: self.recognizer.is_some()
                && self.state == SessionState::Idle
                && !self.start_pending,
            stop_enabled: self.state == SessionState::Listening,
        };
        self.view.controls(controls);
    }
}
