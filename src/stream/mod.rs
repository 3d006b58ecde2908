//! Progress stream handling.
//!
//! This module turns the newline-delimited JSON body of
//! `api/progress/?command_id=<id>` into display entries.
//!
//! # Overview
//!
//! Each body chunk goes through a fixed pipeline:
//!
//! 1. [`Utf8Decoder`] - decodes bytes, carrying split characters to the next chunk
//! 2. [`LineBuffer`] - yields complete lines, holding the unterminated tail
//! 3. [`SeenLines`] - drops empty lines and lines already shown
//! 4. [`format_line`] - renders `command_progress` records, passes anything else through
//!
//! [`ProgressProcessor`] runs that pipeline synchronously, and
//! [`ProgressStream`] runs it over an HTTP body in a background task.
//!
//! # Example
//!
//! ```ignore
//! use heatpump_console::display::WriterSurface;
//!
//! let stream = client.stream_progress(&command_id);
//! let state = stream.render_to(&mut WriterSurface::stdout()).await;
//! println!("stream {state}");
//! ```
//!
//! # Cancellation
//!
//! Dropping a [`ProgressStream`] aborts the background reader task and closes
//! the connection.

pub mod decode;
pub mod dedup;
pub mod events;
pub mod format;
pub mod processor;
pub mod response;

pub use decode::{LineBuffer, Utf8Decoder};
pub use dedup::SeenLines;
pub use events::{ProgressBatch, StreamState};
pub use format::{format_line, format_progress_line, FormattedLine, LineKind, ENTRY_SEPARATOR};
pub use processor::ProgressProcessor;
pub use response::{with_timeout, ProgressOptions, ProgressStream};
