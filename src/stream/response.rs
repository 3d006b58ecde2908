//! Progress stream implementation.
//!
//! This module provides [`ProgressStream`], which implements [`futures::Stream`]
//! to yield [`ProgressBatch`]es from a command's progress body.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::timeout as tokio_timeout;

use super::events::{ProgressBatch, StreamState};
use super::processor::ProgressProcessor;
use crate::config::{CommandId, TrailingLine};
use crate::display::DisplaySurface;
use crate::{Error, Result};

/// Body chunks as delivered by the transport.
pub(crate) type ChunkStream = BoxStream<'static, Result<Bytes>>;

/// Tuning for a [`ProgressStream`].
#[derive(Debug, Clone, Copy)]
pub struct ProgressOptions {
    /// What to do with an unterminated last line.
    pub trailing_line: TrailingLine,
    /// Batches buffered between the reader task and the consumer.
    pub channel_capacity: usize,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            trailing_line: TrailingLine::default(),
            channel_capacity: crate::config::builder::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// A stream of display entries from a command's progress body.
///
/// A background task requests the body, reads it one chunk at a time, and
/// runs every chunk through a [`ProgressProcessor`] owned by this stream.
/// It implements [`futures::Stream`] for use with async combinators.
///
/// # Cancellation
///
/// Dropping a `ProgressStream` stops the background task and closes the
/// connection. There is no other way to stop it; it never reconnects.
///
/// # Example
///
/// ```ignore
/// use futures::StreamExt;
///
/// let mut stream = client.stream_progress(&command_id);
/// while let Some(batch) = stream.next().await {
///     for line in batch?.lines() {
///         println!("{line}");
///     }
/// }
/// ```
pub struct ProgressStream {
    rx: mpsc::Receiver<Result<ProgressBatch>>,
    state: watch::Receiver<StreamState>,
    task_handle: Option<tokio::task::JoinHandle<()>>,
    command_id: Option<CommandId>,
    entries_received: usize,
}

impl ProgressStream {
    /// Create a progress stream over an arbitrary chunk stream.
    ///
    /// There is no request to make, so the stream enters
    /// [`StreamState::Streaming`] as soon as the reader task runs.
    pub fn from_chunks<S, E>(chunks: S, options: ProgressOptions) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
        E: Into<Error> + 'static,
    {
        let chunks: ChunkStream = chunks.map(|chunk| chunk.map_err(Into::into)).boxed();
        Self::spawn(None, async move { Ok(chunks) }, options)
    }

    /// Spawn the reader task.
    ///
    /// `connect` performs the request and resolves to the body chunks.
    pub(crate) fn spawn<F>(command_id: Option<CommandId>, connect: F, options: ProgressOptions) -> Self
    where
        F: Future<Output = Result<ChunkStream>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(options.channel_capacity.max(1));
        let (state_tx, state_rx) = watch::channel(StreamState::Idle);
        let log_id = command_id.clone();

        let task_handle = tokio::spawn(async move {
            let result = Self::read_loop(connect, &tx, &state_tx, options.trailing_line).await;
            match result {
                Ok(()) => {
                    tracing::debug!(command_id = ?log_id, "progress stream ended");
                    state_tx.send_replace(StreamState::Complete);
                }
                Err(Error::Cancelled) => {
                    tracing::debug!(command_id = ?log_id, "progress stream cancelled");
                    state_tx.send_replace(StreamState::Failed);
                }
                Err(e) => {
                    tracing::error!(command_id = ?log_id, error = %e, "error reading progress stream");
                    state_tx.send_replace(StreamState::Failed);
                    // Try to send the error, ignore if receiver is gone
                    let _ = tx.send(Err(e)).await;
                }
            }
        });

        Self {
            rx,
            state: state_rx,
            task_handle: Some(task_handle),
            command_id,
            entries_received: 0,
        }
    }

    /// Background loop: request, then read chunks strictly one after another.
    async fn read_loop<F>(
        connect: F,
        tx: &mpsc::Sender<Result<ProgressBatch>>,
        state: &watch::Sender<StreamState>,
        trailing: TrailingLine,
    ) -> Result<()>
    where
        F: Future<Output = Result<ChunkStream>>,
    {
        state.send_replace(StreamState::Requesting);
        let mut chunks = connect.await?;
        state.send_replace(StreamState::Streaming);

        let mut processor = ProgressProcessor::new(trailing);
        while let Some(chunk) = chunks.next().await {
            // Check if receiver is still interested
            if tx.is_closed() {
                return Err(Error::Cancelled);
            }
            let chunk = chunk?;
            tracing::trace!(bytes = chunk.len(), "progress chunk");
            Self::send_batch(tx, processor.feed(&chunk)).await?;
        }

        Self::send_batch(tx, processor.finish()).await
    }

    async fn send_batch(
        tx: &mpsc::Sender<Result<ProgressBatch>>,
        lines: Vec<super::format::FormattedLine>,
    ) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        tx.send(Ok(ProgressBatch::new(lines)))
            .await
            .map_err(|_| Error::Cancelled)
    }

    /// The command this stream follows, when created by the client.
    pub fn command_id(&self) -> Option<&CommandId> {
        self.command_id.as_ref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        *self.state.borrow()
    }

    /// Entries received by the consumer so far.
    pub fn entries_received(&self) -> usize {
        self.entries_received
    }

    /// Drive the stream into a display surface.
    ///
    /// The surface is cleared first. Each batch is appended in order and
    /// followed by a scroll to the end. A failure is logged and ends the
    /// rendering; it is not returned. Returns the final state.
    pub async fn render_to<S>(mut self, surface: &mut S) -> StreamState
    where
        S: DisplaySurface + ?Sized,
    {
        surface.clear();

        while let Some(batch) = self.next().await {
            match batch {
                Ok(batch) => {
                    for line in batch.lines() {
                        surface.append(&line.rendered());
                    }
                    surface.scroll_to_end();
                }
                Err(e) => {
                    // The reader task has already logged the failure.
                    tracing::debug!(command_id = ?self.command_id, error = %e, "progress output stopped");
                    break;
                }
            }
        }

        self.state()
    }

    /// Collect all rendered output, failing on the first error.
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(batch) = self.next().await {
            text.push_str(&batch?.rendered());
        }
        Ok(text)
    }
}

impl Stream for ProgressStream {
    type Item = Result<ProgressBatch>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(Ok(batch))) => {
                this.entries_received += batch.len();
                Poll::Ready(Some(Ok(batch)))
            }
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ProgressStream {
    fn drop(&mut self) {
        // Cancel the background task
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

/// Run a future with a timeout.
///
/// Returns an error if the future doesn't complete within the specified duration.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio_timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(duration)),
    }
}
