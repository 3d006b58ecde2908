//! Progress records carried by the progress stream.

use serde_json::{Map, Value};

/// Key of the envelope object on every progress line.
pub const ENVELOPE_KEY: &str = "command_progress";
/// Timestamp field; shown as a prefix when present.
pub const TIME_KEY: &str = "time";
/// Command id field; never shown.
pub const COMMAND_ID_KEY: &str = "command_id";
/// Broker receive time; hidden when `time` is present.
pub const RECEIVED_TIME_KEY: &str = "aws_iot_received_time";

/// The object inside `{ "command_progress": { ... } }`.
///
/// Field order is preserved as received.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    fields: Map<String, Value>,
}

impl ProgressRecord {
    /// Parse one progress line.
    ///
    /// Returns `None` if the line is not JSON, has no `command_progress` key,
    /// or that key doesn't hold an object.
    pub fn parse(line: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(line.trim()).ok()?;
        match value {
            Value::Object(mut envelope) => match envelope.remove(ENVELOPE_KEY) {
                Some(Value::Object(fields)) => Some(Self { fields }),
                _ => None,
            },
            _ => None,
        }
    }

    /// Wrap an already decoded record.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// All fields, bookkeeping included.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The `time` field, if present (even when `null`).
    pub fn time(&self) -> Option<&Value> {
        self.fields.get(TIME_KEY)
    }

    /// The `command_id` field, if present.
    pub fn command_id(&self) -> Option<&Value> {
        self.fields.get(COMMAND_ID_KEY)
    }

    /// The fields worth showing to an operator.
    ///
    /// With a `time` field, `time`, `command_id` and `aws_iot_received_time`
    /// are removed. Without one, only `command_id` is removed.
    pub fn display_fields(&self) -> Map<String, Value> {
        let hidden: &[&str] = if self.time().is_some() {
            &[TIME_KEY, COMMAND_ID_KEY, RECEIVED_TIME_KEY]
        } else {
            &[COMMAND_ID_KEY]
        };
        self.fields
            .iter()
            .filter(|(key, _)| !hidden.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
