use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::domain::recognizer::{
    RecognitionErrorKind, RecognitionEvent, RecognitionSession, SessionConfig,
};
use crate::transcript::domain::result_event::ResultEvent;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: event must carry exactly one of `result` or `error`")]
    Shape { line: usize },
}

/// One line of a replay script: an optional delay before delivery, then
/// either a result event or a provider error kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A recorded recognition session in JSON Lines form.
///
/// Blank lines and lines starting with `#` are skipped, so scripts can be
/// annotated by hand.
#[derive(Clone, Debug, Default)]
pub struct ReplayScript {
    events: Vec<ScriptedEvent>,
}

impl ReplayScript {
    pub fn new(events: Vec<ScriptedEvent>) -> Self {
        Self { events }
    }

    /// # Errors
    ///
    /// Returns [`ScriptError::Read`] when the file cannot be opened and
    /// parse errors with their line number otherwise.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let file = File::open(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    fn from_reader(reader: impl BufRead, path: &Path) -> Result<Self, ScriptError> {
        let mut events = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ScriptError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let event: ScriptedEvent = serde_json::from_str(trimmed)
                .map_err(|source| ScriptError::Parse {
                    line: line_no,
                    source,
                })?;
            if event.result.is_some() == event.error.is_some() {
                return Err(ScriptError::Shape { line: line_no });
            }
            events.push(event);
        }
        Ok(Self::new(events))
    }

    pub fn events(&self) -> &[ScriptedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Replays a recorded session from a background thread, standing in for a
/// host recognition provider.
///
/// Delivery matches the host contract: `Started` first, result and error
/// events in script order, then `Ended` — also after a `stop()` request or
/// a scripted error, mirroring a provider whose `end` always fires.
pub struct ReplayRecognizer {
    script: ReplayScript,
    events_tx: Sender<RecognitionEvent>,
    honor_delays: bool,
    cancel: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
}

impl ReplayRecognizer {
    pub fn new(script: ReplayScript, events_tx: Sender<RecognitionEvent>) -> Self {
        Self {
            script,
            events_tx,
            honor_delays: true,
            cancel: Arc::new(AtomicBool::new(false)),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replay scripted delays (default) or deliver events back-to-back.
    pub fn honor_delays(mut self, honor: bool) -> Self {
        self.honor_delays = honor;
        self
    }
}

impl RecognitionSession for ReplayRecognizer {
    fn start(&mut self, config: &SessionConfig) -> Result<(), Box<dyn std::error::Error>> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err("replay session already running".into());
        }
        debug!(
            "replaying {} events (language {}, interim {})",
            self.script.len(),
            config.language,
            config.interim_results
        );
        self.cancel.store(false, Ordering::SeqCst);

        let events = self.script.events().to_vec();
        let tx = self.events_tx.clone();
        let cancel = self.cancel.clone();
        let running = self.running.clone();
        let honor_delays = self.honor_delays;

        thread::spawn(move || {
            let _ = tx.send(RecognitionEvent::Started);
            for scripted in events {
                if cancel.load(Ordering::SeqCst) {
                    break;
                }
                if honor_delays && scripted.delay_ms > 0 {
                    thread::sleep(Duration::from_millis(scripted.delay_ms));
                }
                if cancel.load(Ordering::SeqCst) {
                    break;
                }
                match (scripted.result, scripted.error) {
                    (Some(result), _) => {
                        if tx.send(RecognitionEvent::Result(result)).is_err() {
                            break;
                        }
                    }
                    (None, Some(kind)) => {
                        let kind = RecognitionErrorKind::parse(&kind);
                        let _ = tx.send(RecognitionEvent::Error(kind));
                        // A provider error terminates the session.
                        break;
                    }
                    (None, None) => {}
                }
            }
            // Release the running flag before Ended goes out, so a caller
            // reacting to Ended can immediately start a fresh replay.
            running.store(false, Ordering::SeqCst);
            let _ = tx.send(RecognitionEvent::Ended);
        });
        Ok(())
    }

    fn stop(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::domain::result_event::ResultEntry;
    use std::io::Cursor;

    const RECV_TIMEOUT: Duration = Duration::from_secs(5);

    fn parse(script: &str) -> Result<ReplayScript, ScriptError> {
        ReplayScript::from_reader(Cursor::new(script), Path::new("test.jsonl"))
    }

    fn drain_until_ended(rx: &crossbeam_channel::Receiver<RecognitionEvent>) -> Vec<RecognitionEvent> {
        let mut events = Vec::new();
        loop {
            let event = rx.recv_timeout(RECV_TIMEOUT).expect("replay stalled");
            let ended = event == RecognitionEvent::Ended;
            events.push(event);
            if ended {
                return events;
            }
        }
    }

    // ─── Script parsing ───

    #[test]
    fn test_parses_results_errors_comments_and_blanks() {
        let script = parse(concat!(
            "# a hand-written session\n",
            "\n",
            r#"{"delay_ms": 10, "result": {"result_index": 0, "entries": [{"transcript": "hi", "is_final": true}]}}"#,
            "\n",
            r#"{"error": "no-speech"}"#,
            "\n",
        ))
        .unwrap();

        assert_eq!(script.len(), 2);
        assert_eq!(script.events()[0].delay_ms, 10);
        assert!(script.events()[0].result.is_some());
        assert_eq!(script.events()[1].error.as_deref(), Some("no-speech"));
    }

    #[test]
    fn test_malformed_line_is_reported_with_its_number() {
        let err = parse("\n{not json}\n").unwrap_err();
        match err {
            ScriptError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_line_with_neither_result_nor_error_is_rejected() {
        let err = parse(r#"{"delay_ms": 5}"#).unwrap_err();
        assert!(matches!(err, ScriptError::Shape { line: 1 }));
    }

    #[test]
    fn test_line_with_both_result_and_error_is_rejected() {
        let err = parse(
            r#"{"result": {"result_index": 0, "entries": []}, "error": "network"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::Shape { line: 1 }));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = ReplayScript::load(Path::new("/no/such/script.jsonl")).unwrap_err();
        assert!(err.to_string().contains("/no/such/script.jsonl"));
    }

    // ─── Replay delivery ───

    fn two_result_script() -> ReplayScript {
        ReplayScript::new(vec![
            ScriptedEvent {
                delay_ms: 0,
                result: Some(ResultEvent::new(
                    0,
                    vec![ResultEntry::final_text("Hello ")],
                )),
                error: None,
            },
            ScriptedEvent {
                delay_ms: 0,
                result: Some(ResultEvent::new(
                    1,
                    vec![ResultEntry::final_text("world.")],
                )),
                error: None,
            },
        ])
    }

    #[test]
    fn test_replay_brackets_results_with_started_and_ended() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut recognizer = ReplayRecognizer::new(two_result_script(), tx).honor_delays(false);
        recognizer.start(&SessionConfig::default()).unwrap();

        let events = drain_until_ended(&rx);
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], RecognitionEvent::Started);
        assert!(matches!(events[1], RecognitionEvent::Result(_)));
        assert!(matches!(events[2], RecognitionEvent::Result(_)));
        assert_eq!(events[3], RecognitionEvent::Ended);
    }

    #[test]
    fn test_scripted_error_terminates_replay() {
        let script = ReplayScript::new(vec![
            ScriptedEvent {
                delay_ms: 0,
                result: None,
                error: Some("network".to_string()),
            },
            ScriptedEvent {
                delay_ms: 0,
                result: Some(ResultEvent::new(
                    0,
                    vec![ResultEntry::final_text("never delivered")],
                )),
                error: None,
            },
        ]);
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut recognizer = ReplayRecognizer::new(script, tx).honor_delays(false);
        recognizer.start(&SessionConfig::default()).unwrap();

        let events = drain_until_ended(&rx);
        assert_eq!(
            events,
            vec![
                RecognitionEvent::Started,
                RecognitionEvent::Error(RecognitionErrorKind::Network),
                RecognitionEvent::Ended,
            ]
        );
    }

    #[test]
    fn test_stop_cancels_between_events_but_still_ends() {
        let script = ReplayScript::new(vec![ScriptedEvent {
            delay_ms: 200,
            result: Some(ResultEvent::new(
                0,
                vec![ResultEntry::final_text("too late")],
            )),
            error: None,
        }]);
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut recognizer = ReplayRecognizer::new(script, tx);
        recognizer.start(&SessionConfig::default()).unwrap();
        recognizer.stop();

        let events = drain_until_ended(&rx);
        assert_eq!(events.first(), Some(&RecognitionEvent::Started));
        assert_eq!(events.last(), Some(&RecognitionEvent::Ended));
        assert!(
            !events.iter().any(|e| matches!(e, RecognitionEvent::Result(_))),
            "cancelled replay must not deliver results"
        );
    }

    #[test]
    fn test_double_start_is_refused_until_replay_finishes() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut recognizer = ReplayRecognizer::new(two_result_script(), tx).honor_delays(false);
        recognizer.start(&SessionConfig::default()).unwrap();
        assert!(recognizer.start(&SessionConfig::default()).is_err());

        // Once the first replay has fully ended, a fresh start is fine.
        drain_until_ended(&rx);
        recognizer.start(&SessionConfig::default()).unwrap();
        drain_until_ended(&rx);
    }

    #[test]
    fn test_empty_script_just_starts_and_ends() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut recognizer =
            ReplayRecognizer::new(ReplayScript::default(), tx).honor_delays(false);
        recognizer.start(&SessionConfig::default()).unwrap();
        assert_eq!(
            drain_until_ended(&rx),
            vec![RecognitionEvent::Started, RecognitionEvent::Ended]
        );
    }
}
