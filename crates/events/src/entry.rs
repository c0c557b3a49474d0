use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit submitted to the event bus.
///
/// Notes:
/// - `detail` is a **string containing serialized JSON** (an object), not a
///   nested structure. That is the shape the bus accepts on the wire.
/// - `time` is optional business time; the bus assigns its own when absent.
/// - Field casing on the wire is PascalCase (`Source`, `DetailType`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventEntry {
    source: String,
    detail_type: String,
    detail: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<DateTime<Utc>>,
}

impl EventEntry {
    pub fn new(
        source: impl Into<String>,
        detail_type: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            detail_type: detail_type.into(),
            detail: detail.into(),
            time: None,
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Copy of this entry with a replaced detail payload; every other field
    /// passes through unchanged.
    pub fn with_detail(self, detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            ..self
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn detail_type(&self) -> &str {
        &self.detail_type
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }
}

/// Ordered sequence of entries submitted together in one publish call.
///
/// Order and count are preserved end-to-end; nothing here reorders, drops,
/// splits, or retries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventBatch {
    entries: Vec<EventEntry>,
}

impl EventBatch {
    pub fn new(entries: Vec<EventEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[EventEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<EventEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<EventEntry> for EventBatch {
    fn from_iter<I: IntoIterator<Item = EventEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_with_wire_casing() {
        let entry = EventEntry::new("orders", "order.placed", r#"{"orderId":"42"}"#);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["Source"], "orders");
        assert_eq!(json["DetailType"], "order.placed");
        assert_eq!(json["Detail"], r#"{"orderId":"42"}"#);
        // Absent time is omitted entirely, not serialized as null.
        assert!(json.get("Time").is_none());
    }

    #[test]
    fn with_detail_leaves_other_fields_untouched() {
        let entry = EventEntry::new("orders", "order.placed", "{}")
            .with_time(chrono::Utc::now())
            .with_detail(r#"{"a":1}"#);

        assert_eq!(entry.source(), "orders");
        assert_eq!(entry.detail_type(), "order.placed");
        assert_eq!(entry.detail(), r#"{"a":1}"#);
        assert!(entry.time().is_some());
    }

    #[test]
    fn batch_preserves_insertion_order() {
        let batch: EventBatch = ["first", "second", "third"]
            .into_iter()
            .map(|t| EventEntry::new("test", t, "{}"))
            .collect();

        let types: Vec<&str> = batch.entries().iter().map(|e| e.detail_type()).collect();
        assert_eq!(types, vec!["first", "second", "third"]);
        assert_eq!(batch.len(), 3);
    }
}
