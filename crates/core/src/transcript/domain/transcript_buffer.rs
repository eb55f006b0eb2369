use super::result_event::ResultEvent;

/// Accumulates finalized transcript text across provider result events.
///
/// Final fragments are append-only for the lifetime of a session. Interim
/// text is recomputed from scratch on every event — it is never carried
/// from one event to the next, because the provider re-reports the whole
/// provisional tail each time.
#[derive(Clone, Debug, Default)]
pub struct TranscriptBuffer {
    final_text: String,
    interim: String,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one result event into the buffer.
    ///
    /// Entries before the event's `result_index` are skipped entirely, so
    /// replaying an event cannot duplicate already-finalized text.
    pub fn apply(&mut self, event: &ResultEvent) {
        let mut interim = String::new();
        for entry in event.new_entries() {
            if entry.is_final {
                self.final_text.push_str(&entry.transcript);
            } else {
                interim.push_str(&entry.transcript);
            }
        }
        self.interim = interim;
    }

    /// The text to display: finalized text plus, optionally, the current
    /// interim tail.
    pub fn displayed(&self, interim_enabled: bool) -> String {
        if interim_enabled {
            format!("{}{}", self.final_text, self.interim)
        } else {
            self.final_text.clone()
        }
    }

    pub fn final_text(&self) -> &str {
        &self.final_text
    }

    pub fn clear(&mut self) {
        self.final_text.clear();
        self.interim.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.final_text.is_empty() && self.interim.is_empty()
    }
}
