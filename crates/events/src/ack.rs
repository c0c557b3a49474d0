use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acknowledgement returned by the event bus for one publish call.
///
/// The publisher returns this untouched; interpreting partial failures
/// (`failed_entry_count > 0`) is the caller's business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutEventsAck {
    failed_entry_count: u32,
    entries: Vec<AckEntry>,
}

impl PutEventsAck {
    pub fn new(failed_entry_count: u32, entries: Vec<AckEntry>) -> Self {
        Self {
            failed_entry_count,
            entries,
        }
    }

    pub fn failed_entry_count(&self) -> u32 {
        self.failed_entry_count
    }

    pub fn entries(&self) -> &[AckEntry] {
        &self.entries
    }
}

/// Per-entry outcome inside a [`PutEventsAck`].
///
/// Exactly one of `event_id` (accepted) or `error_code`/`error_message`
/// (rejected) is populated by a well-behaved bus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AckEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl AckEntry {
    pub fn accepted(event_id: Uuid) -> Self {
        Self {
            event_id: Some(event_id),
            ..Self::default()
        }
    }

    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: Some(code.into()),
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn event_id(&self) -> Option<Uuid> {
        self.event_id
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
