//! Human-readable rendering of progress lines.

use std::fmt;

use serde_json::Value;

use crate::protocol::ProgressRecord;

/// Separator written after every entry on the display surface.
pub const ENTRY_SEPARATOR: &str = "\n\n";

/// How a line was rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A progress record, with its `time` if it had one.
    Progress { time: Option<String> },
    /// Not a progress record; shown verbatim.
    Passthrough,
}

/// One entry for the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    kind: LineKind,
    text: String,
}

impl FormattedLine {
    /// How the line was rendered.
    pub fn kind(&self) -> &LineKind {
        &self.kind
    }

    /// The entry text, without separator.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the raw line was passed through unchanged.
    pub fn is_passthrough(&self) -> bool {
        self.kind == LineKind::Passthrough
    }

    /// The entry as appended to the display surface.
    pub fn rendered(&self) -> String {
        format!("{}{}", self.text, ENTRY_SEPARATOR)
    }
}

impl fmt::Display for FormattedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Render one raw progress line.
///
/// Lines that aren't `{"command_progress": {...}}` envelopes come back
/// unchanged. With a `time` field the entry reads `<time>: <json>`; without
/// one it is the JSON alone. Bookkeeping fields are stripped either way.
pub fn format_line(line: &str) -> FormattedLine {
    let Some(record) = ProgressRecord::parse(line) else {
        tracing::debug!(line, "not a progress record, passing through");
        return FormattedLine {
            kind: LineKind::Passthrough,
            text: line.to_string(),
        };
    };

    let mut shown = Value::Object(record.display_fields());
    integral_floats_as_ints(&mut shown);
    match record.time() {
        Some(time) => {
            let mut time = time.clone();
            integral_floats_as_ints(&mut time);
            let time = display_time(&time);
            FormattedLine {
                text: format!("{time}: {shown}"),
                kind: LineKind::Progress { time: Some(time) },
            }
        }
        None => FormattedLine {
            kind: LineKind::Progress { time: None },
            text: shown.to_string(),
        },
    }
}

/// Render one raw line including the trailing separator.
pub fn format_progress_line(line: &str) -> String {
    format_line(line).rendered()
}

// Strings print bare; anything else prints as JSON.
fn display_time(time: &Value) -> String {
    match time {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Whole-number floats print without a fraction, so `21.0` reads `21`.
pub(crate) fn integral_floats_as_ints(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e18 {
                    *value = Value::from(f as i64);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integral_floats_as_ints),
        Value::Object(map) => map.values_mut().for_each(integral_floats_as_ints),
        _ => {}
    }
}
