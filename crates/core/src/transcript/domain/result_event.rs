use serde::{Deserialize, Serialize};

/// One recognition alternative reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub transcript: String,
    pub is_final: bool,
}

impl ResultEntry {
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            transcript: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            transcript: text.into(),
            is_final: false,
        }
    }
}

/// A provider result event: the full ordered sequence of entries recognized
/// so far in the session.
///
/// `result_index` marks the first entry that is new since the previous
/// event. Entries below it were already finalized and must never be
/// reprocessed, or text would be appended twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEvent {
    pub result_index: usize,
    pub entries: Vec<ResultEntry>,
}

impl ResultEvent {
    pub fn new(result_index: usize, entries: Vec<ResultEntry>) -> Self {
        Self {
            result_index,
            entries,
        }
    }

    /// The entries at or after `result_index`, in reported order.
    pub fn new_entries(&self) -> &[ResultEntry] {
        self.entries.get(self.result_index..).unwrap_or(&[])
    }
}
