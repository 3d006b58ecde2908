//! Integration tests for progress stream processing using scripted chunk streams.

mod common;

use futures::StreamExt;
use heatpump_console::display::BufferSurface;
use heatpump_console::stream::{LineKind, ProgressOptions, ProgressStream, StreamState};
use heatpump_console::{Error, TrailingLine};

use common::{progress_line, ScenarioBuilder};

fn options(trailing_line: TrailingLine) -> ProgressOptions {
    ProgressOptions {
        trailing_line,
        ..ProgressOptions::default()
    }
}

#[tokio::test]
async fn timed_and_untimed_records() {
    let scenario = ScenarioBuilder::new()
        .command_id("C1")
        .timed("T1", "running")
        .untimed("done");

    let stream = ProgressStream::from_chunks(scenario.stream(), ProgressOptions::default());
    let text = stream.collect_text().await.expect("should succeed");

    assert_eq!(text, "T1: {\"status\":\"running\"}\n\n{\"status\":\"done\"}\n\n");
}

#[tokio::test]
async fn repeated_lines_are_shown_once() {
    let scenario = ScenarioBuilder::new()
        .timed("T1", "running")
        .timed("T1", "running")
        .timed("T2", "running")
        .timed("T1", "running");

    let stream = ProgressStream::from_chunks(scenario.stream(), ProgressOptions::default());
    let text = stream.collect_text().await.expect("should succeed");

    assert_eq!(text, "T1: {\"status\":\"running\"}\n\nT2: {\"status\":\"running\"}\n\n");
}

#[tokio::test]
async fn byte_sized_chunks_give_same_output() {
    let build = || {
        ScenarioBuilder::new()
            .timed("12:00:01", "queued")
            .raw_line("plain text from the device")
            .timed("12:00:02", "température atteinte \u{1F525}")
            .untimed("done")
    };

    let by_line = ProgressStream::from_chunks(build().stream(), ProgressOptions::default())
        .collect_text()
        .await
        .unwrap();
    for size in [1, 2, 3, 7, 64] {
        let by_bytes = ProgressStream::from_chunks(build().chunk_size(size).stream(), ProgressOptions::default())
            .collect_text()
            .await
            .unwrap();
        assert_eq!(by_bytes, by_line, "chunk size {size}");
    }
    assert!(by_line.contains("\u{1F525}"));
    assert!(!by_line.contains('\u{FFFD}'));
}

#[tokio::test]
async fn malformed_lines_pass_through() {
    let scenario = ScenarioBuilder::new()
        .raw_line("{not json")
        .raw_line(r#"{"other_envelope": {"status": "x"}}"#)
        .raw_line(r#"{"command_progress": "not an object"}"#);

    let mut stream = ProgressStream::from_chunks(scenario.stream(), ProgressOptions::default());
    let mut lines = Vec::new();
    while let Some(batch) = stream.next().await {
        lines.extend(batch.expect("should not error").into_lines());
    }

    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.is_passthrough()));
    assert_eq!(lines[0].text(), "{not json");
    assert_eq!(lines[2].text(), r#"{"command_progress": "not an object"}"#);
}

#[tokio::test]
async fn blank_lines_are_skipped() {
    let scenario = ScenarioBuilder::new()
        .raw_line("")
        .untimed("a")
        .raw_line("")
        .raw_line("")
        .untimed("b");

    let mut stream = ProgressStream::from_chunks(scenario.stream(), ProgressOptions::default());
    let mut count = 0;
    while let Some(batch) = stream.next().await {
        count += batch.unwrap().len();
    }
    assert_eq!(count, 2);
    assert_eq!(stream.entries_received(), 2);
}

#[tokio::test]
async fn trailing_line_dropped_by_default() {
    let scenario = ScenarioBuilder::new().untimed("a").unterminated(&progress_line(None, "C", "tail"));

    let text = ProgressStream::from_chunks(scenario.stream(), options(TrailingLine::Drop))
        .collect_text()
        .await
        .unwrap();
    assert_eq!(text, "{\"status\":\"a\"}\n\n");
}

#[tokio::test]
async fn trailing_line_flushed_when_asked() {
    let scenario = ScenarioBuilder::new().untimed("a").unterminated(&progress_line(None, "C", "tail"));

    let text = ProgressStream::from_chunks(scenario.stream(), options(TrailingLine::Flush))
        .collect_text()
        .await
        .unwrap();
    assert_eq!(text, "{\"status\":\"a\"}\n\n{\"status\":\"tail\"}\n\n");
}

#[tokio::test]
async fn flushed_trailing_duplicate_is_suppressed() {
    let line = progress_line(None, "C", "a");
    let scenario = ScenarioBuilder::new().raw_line(&line).unterminated(&line);

    let text = ProgressStream::from_chunks(scenario.stream(), options(TrailingLine::Flush))
        .collect_text()
        .await
        .unwrap();
    assert_eq!(text, "{\"status\":\"a\"}\n\n");
}

#[tokio::test]
async fn progress_kind_carries_time() {
    let scenario = ScenarioBuilder::new().timed("T9", "ok");

    let mut stream = ProgressStream::from_chunks(scenario.stream(), ProgressOptions::default());
    let batch = stream.next().await.unwrap().unwrap();
    assert_eq!(
        batch.lines()[0].kind(),
        &LineKind::Progress {
            time: Some("T9".to_string())
        }
    );
}

#[tokio::test]
async fn read_error_stops_stream() {
    let chunks = futures::stream::iter(vec![
        Ok(bytes::Bytes::from(format!("{}\n", progress_line(None, "C", "first")))),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        Ok(bytes::Bytes::from(format!("{}\n", progress_line(None, "C", "never")))),
    ]);

    let mut stream = ProgressStream::from_chunks(chunks, ProgressOptions::default());
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.rendered(), "{\"status\":\"first\"}\n\n");

    let err = stream.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(stream.next().await.is_none());
    assert_eq!(stream.state(), StreamState::Failed);
}

#[tokio::test]
async fn render_to_surface_clears_then_appends() {
    let scenario = ScenarioBuilder::new().timed("T1", "a").timed("T2", "b");

    let mut surface = BufferSurface::new();
    let state = ProgressStream::from_chunks(scenario.stream(), ProgressOptions::default())
        .render_to(&mut surface)
        .await;

    assert_eq!(state, StreamState::Complete);
    assert_eq!(surface.text(), "T1: {\"status\":\"a\"}\n\nT2: {\"status\":\"b\"}\n\n");
    assert_eq!(surface.scroll_count(), 2);
}

#[tokio::test]
async fn separate_streams_have_separate_history() {
    let scenario = ScenarioBuilder::new().timed("T1", "a");

    let first = ProgressStream::from_chunks(scenario.stream(), ProgressOptions::default())
        .collect_text()
        .await
        .unwrap();
    let second = ProgressStream::from_chunks(scenario.stream(), ProgressOptions::default())
        .collect_text()
        .await
        .unwrap();
    assert_eq!(first, second);
    assert!(!second.is_empty());
}

#[tokio::test]
async fn empty_body_completes_without_output() {
    let scenario = ScenarioBuilder::new();

    let mut stream = ProgressStream::from_chunks(scenario.stream(), ProgressOptions::default());
    assert!(stream.next().await.is_none());
    assert_eq!(stream.state(), StreamState::Complete);
}
