//! Chunk-to-entry pipeline for one command invocation.

use super::decode::{LineBuffer, Utf8Decoder};
use super::dedup::SeenLines;
use super::format::{format_line, FormattedLine};
use crate::config::TrailingLine;

/// Turns raw body chunks into display entries.
///
/// Chunks are decoded with a persistent [`Utf8Decoder`], split into complete
/// lines, filtered through [`SeenLines`], and rendered with [`format_line`].
/// Create one per command invocation; it owns that invocation's seen lines.
#[derive(Debug, Clone, Default)]
pub struct ProgressProcessor {
    decoder: Utf8Decoder,
    lines: LineBuffer,
    seen: SeenLines,
    trailing: TrailingLine,
}

impl ProgressProcessor {
    /// Create a processor with the given end-of-stream policy.
    pub fn new(trailing: TrailingLine) -> Self {
        Self {
            trailing,
            ..Self::default()
        }
    }

    /// Process one chunk, returning the new entries in arrival order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<FormattedLine> {
        let text = self.decoder.decode(chunk);
        let lines = self.lines.push(&text);
        self.process(lines)
    }

    /// Flush the decoder at end of stream and apply the trailing line policy.
    pub fn finish(&mut self) -> Vec<FormattedLine> {
        let tail = self.decoder.finish();
        let mut lines = self.lines.push(&tail);
        if let Some(partial) = self.lines.take_partial() {
            match self.trailing {
                TrailingLine::Flush => lines.push(partial),
                TrailingLine::Drop => {
                    tracing::debug!(bytes = partial.len(), "dropping unterminated last line");
                }
            }
        }
        self.process(lines)
    }

    /// Lines seen so far in this invocation.
    pub fn seen(&self) -> &SeenLines {
        &self.seen
    }

    fn process(&mut self, lines: Vec<String>) -> Vec<FormattedLine> {
        lines
            .into_iter()
            .filter(|line| self.seen.insert_new(line))
            .map(|line| format_line(&line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUNNING: &str = r#"{"command_progress":{"time":"T1","command_id":"C1","status":"running"}}"#;
    const DONE: &str = r#"{"command_progress":{"command_id":"C1","status":"done"}}"#;

    fn texts(lines: &[FormattedLine]) -> Vec<&str> {
        lines.iter().map(FormattedLine::text).collect()
    }

    #[test]
    fn complete_lines_in_one_chunk() {
        let mut processor = ProgressProcessor::default();
        let out = processor.feed(format!("{RUNNING}\n{DONE}\n").as_bytes());
        assert_eq!(texts(&out), vec!["T1: {\"status\":\"running\"}", "{\"status\":\"done\"}"]);
        assert!(processor.finish().is_empty());
    }

    #[test]
    fn same_line_twice_is_shown_once() {
        let mut processor = ProgressProcessor::default();
        let first = processor.feed(format!("{RUNNING}\n").as_bytes());
        let second = processor.feed(format!("{RUNNING}\n").as_bytes());
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(processor.seen().len(), 1);
    }

    #[test]
    fn resent_history_only_shows_new_lines() {
        let mut processor = ProgressProcessor::default();
        processor.feed(format!("{RUNNING}\n").as_bytes());
        let out = processor.feed(format!("{RUNNING}\n{DONE}\n").as_bytes());
        assert_eq!(texts(&out), vec!["{\"status\":\"done\"}"]);
    }

    #[test]
    fn line_split_across_chunks() {
        let mut processor = ProgressProcessor::default();
        let (head, tail) = RUNNING.split_at(20);
        assert!(processor.feed(head.as_bytes()).is_empty());
        let out = processor.feed(format!("{tail}\n").as_bytes());
        assert_eq!(texts(&out), vec!["T1: {\"status\":\"running\"}"]);
    }

    #[test]
    fn multibyte_split_across_chunks() {
        let line = "{\"command_progress\":{\"message\":\"21 °C reached\"}}\n";
        let bytes = line.as_bytes();
        let cut = line.find('°').unwrap() + 1;
        let mut processor = ProgressProcessor::default();
        assert!(processor.feed(&bytes[..cut]).is_empty());
        let out = processor.feed(&bytes[cut..]);
        assert_eq!(texts(&out), vec!["{\"message\":\"21 °C reached\"}"]);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let mut processor = ProgressProcessor::default();
        let out = processor.feed(format!("\n\n{DONE}\n\n").as_bytes());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn trailing_partial_dropped_by_default() {
        let mut processor = ProgressProcessor::new(TrailingLine::Drop);
        assert!(processor.feed(DONE.as_bytes()).is_empty());
        assert!(processor.finish().is_empty());
    }

    #[test]
    fn trailing_partial_flushed_when_asked() {
        let mut processor = ProgressProcessor::new(TrailingLine::Flush);
        assert!(processor.feed(DONE.as_bytes()).is_empty());
        assert_eq!(texts(&processor.finish()), vec!["{\"status\":\"done\"}"]);
    }

    #[test]
    fn flushed_tail_is_still_deduplicated() {
        let mut processor = ProgressProcessor::new(TrailingLine::Flush);
        processor.feed(format!("{DONE}\n{DONE}").as_bytes());
        assert!(processor.finish().is_empty());
    }

    #[test]
    fn non_json_lines_pass_through() {
        let mut processor = ProgressProcessor::default();
        let out = processor.feed(b"connecting...\n");
        assert_eq!(out.len(), 1);
        assert!(out[0].is_passthrough());
        assert_eq!(out[0].text(), "connecting...");
    }
}
