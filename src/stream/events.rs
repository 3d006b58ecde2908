//! Items and states of a progress stream.
//!
//! A [`ProgressStream`](super::ProgressStream) yields one [`ProgressBatch`]
//! per body chunk that produced new entries, and tracks its lifecycle as a
//! [`StreamState`].

use std::fmt;

use super::format::FormattedLine;

/// Entries produced by one chunk of the progress body, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressBatch {
    lines: Vec<FormattedLine>,
}

impl ProgressBatch {
    /// Wrap formatted entries.
    pub fn new(lines: Vec<FormattedLine>) -> Self {
        Self { lines }
    }

    /// The entries.
    pub fn lines(&self) -> &[FormattedLine] {
        &self.lines
    }

    /// Consume the batch and return its entries.
    pub fn into_lines(self) -> Vec<FormattedLine> {
        self.lines
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the batch has no entries.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All entries as appended to a display surface.
    pub fn rendered(&self) -> String {
        self.lines.iter().map(FormattedLine::rendered).collect()
    }
}

/// Lifecycle of a progress stream.
///
/// ```text
/// Idle → Requesting → Streaming → Complete
///                 ↘           ↘
///                   Failed      Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamState {
    /// Created, nothing sent yet.
    #[default]
    Idle,
    /// Progress request sent, waiting for the response head.
    Requesting,
    /// Reading body chunks.
    Streaming,
    /// The body ended.
    Complete,
    /// The request or a read failed; no further reads happen.
    Failed,
}

impl StreamState {
    /// Whether the stream has stopped for good.
    pub fn is_terminal(self) -> bool {
        matches!(self, StreamState::Complete | StreamState::Failed)
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamState::Idle => "idle",
            StreamState::Requesting => "requesting",
            StreamState::Streaming => "streaming",
            StreamState::Complete => "complete",
            StreamState::Failed => "failed",
        };
        f.write_str(name)
    }
}
