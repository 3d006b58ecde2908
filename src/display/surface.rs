//! Display surface trait and implementations.

use std::io::Write;

/// Append-only output area that progress entries are written to.
///
/// # Implementation Notes
///
/// - Implementations must be lightweight; slow surfaces delay stream reading.
/// - Failures are the surface's own business: log them, don't panic.
/// - `scroll_to_end` is called once after every batch of appended entries.
///
/// # Example
///
/// ```ignore
/// use heatpump_console::display::DisplaySurface;
///
/// struct LineCounter {
///     lines: usize,
/// }
///
/// impl DisplaySurface for LineCounter {
///     fn clear(&mut self) {
///         self.lines = 0;
///     }
///
///     fn append(&mut self, text: &str) {
///         self.lines += text.lines().filter(|l| !l.is_empty()).count();
///     }
/// }
/// ```
pub trait DisplaySurface: Send {
    /// Remove everything shown so far.
    fn clear(&mut self);

    /// Append text at the end.
    fn append(&mut self, text: &str);

    /// Bring the end of the output into view.
    fn scroll_to_end(&mut self) {}
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Box<S> {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn append(&mut self, text: &str) {
        (**self).append(text);
    }

    fn scroll_to_end(&mut self) {
        (**self).scroll_to_end();
    }
}

/// In-memory surface; the equivalent of a text box.
#[derive(Debug, Clone, Default)]
pub struct BufferSurface {
    text: String,
    scrolls: usize,
}

impl BufferSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything currently shown.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// How many times the surface was scrolled to its end.
    pub fn scroll_count(&self) -> usize {
        self.scrolls
    }
}

impl DisplaySurface for BufferSurface {
    fn clear(&mut self) {
        self.text.clear();
    }

    fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn scroll_to_end(&mut self) {
        self.scrolls += 1;
    }
}

/// Surface that writes to any [`Write`] sink, typically stdout.
///
/// A terminal can't take output back, so `clear` only flushes.
/// Scrolling flushes the writer so each batch shows up immediately.
#[derive(Debug)]
pub struct WriterSurface<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> WriterSurface<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSurface<std::io::Stdout> {
    /// Surface writing to the process stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> DisplaySurface for WriterSurface<W> {
    fn clear(&mut self) {
        self.scroll_to_end();
    }

    fn append(&mut self, text: &str) {
        if let Err(e) = self.writer.write_all(text.as_bytes()) {
            tracing::warn!(error = %e, "failed to write progress output");
        }
    }

    fn scroll_to_end(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(error = %e, "failed to flush progress output");
        }
    }
}

/// Surface that logs every entry using tracing.
///
/// # Example
///
/// ```ignore
/// use heatpump_console::display::{LogLevel, TracingSurface};
///
/// let mut surface = TracingSurface::with_level(LogLevel::Info);
/// let state = client.stream_progress(&command_id).render_to(&mut surface).await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracingSurface {
    level: LogLevel,
}

/// Log level for TracingSurface.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogLevel {
    /// Log at trace level.
    Trace,
    /// Log at debug level (default).
    #[default]
    Debug,
    /// Log at info level.
    Info,
}

impl TracingSurface {
    /// Create a new tracing surface with debug level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracing surface with a specific level.
    pub fn with_level(level: LogLevel) -> Self {
        Self { level }
    }
}

impl DisplaySurface for TracingSurface {
    fn clear(&mut self) {}

    fn append(&mut self, text: &str) {
        for entry in text.lines().filter(|l| !l.is_empty()) {
            match self.level {
                LogLevel::Trace => tracing::trace!(entry, "command_progress"),
                LogLevel::Debug => tracing::debug!(entry, "command_progress"),
                LogLevel::Info => tracing::info!(entry, "command_progress"),
            }
        }
    }
}
