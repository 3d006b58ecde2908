//! Suppression of repeated progress lines.

use std::collections::HashSet;

/// Raw lines already processed during one command invocation.
///
/// The progress endpoint may resend lines it already delivered; each exact
/// line is shown once. The set only grows and is dropped with its invocation.
#[derive(Debug, Default, Clone)]
pub struct SeenLines {
    lines: HashSet<String>,
}

impl SeenLines {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `line` and report whether it was new.
    ///
    /// Empty lines are never new.
    pub fn insert_new(&mut self, line: &str) -> bool {
        if line.is_empty() || self.lines.contains(line) {
            return false;
        }
        self.lines.insert(line.to_string())
    }

    /// Whether `line` has been recorded.
    pub fn contains(&self, line: &str) -> bool {
        self.lines.contains(line)
    }

    /// Number of distinct lines recorded.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
