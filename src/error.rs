use std::fmt;
use std::time::Duration;

/// Errors that can occur when talking to the heat-pump command backend.
///
/// Errors are organized by category:
/// - Configuration errors: detected at `build()` time
/// - Request errors: a request could not be built or was rejected
/// - Protocol errors: unexpected or malformed backend output
/// - Stream errors: failures while reading a progress stream
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    // -------------------------------------------------------------------------
    // Configuration errors (detected at build() time)
    // -------------------------------------------------------------------------
    /// No backend base URL configured or resolvable.
    ///
    /// Checked sources, in order: the builder, the
    /// `HEATPUMP_CONSOLE_BASE_URL` environment variable, and the config file.
    #[error("no base URL configured: set it on the builder, in HEATPUMP_CONSOLE_BASE_URL, or in {path}")]
    BaseUrlNotConfigured { path: String },

    /// Invalid configuration provided to builder.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A URL could not be parsed or extended.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // -------------------------------------------------------------------------
    // Request errors
    // -------------------------------------------------------------------------
    /// A parameter required to dispatch a command is missing.
    ///
    /// No request is sent when this is returned.
    #[error("{name} is missing")]
    MissingParameter { name: &'static str },

    /// Transport-level HTTP failure (connect, TLS, body read).
    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    // -------------------------------------------------------------------------
    // Protocol errors
    // -------------------------------------------------------------------------
    /// Failed to parse JSON from a backend response.
    #[error("failed to parse JSON: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    // -------------------------------------------------------------------------
    // Stream errors
    // -------------------------------------------------------------------------
    /// IO error (config file, display surface).
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    /// Request exceeded the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The progress stream was dropped before it finished.
    #[error("progress stream cancelled")]
    Cancelled,

    // -------------------------------------------------------------------------
    // Dashboard errors
    // -------------------------------------------------------------------------
    /// A dashboard element name with no SVG counterpart.
    #[error("unknown dashboard element: {0}")]
    UnknownElement(String),

    /// A pipe colour other than `hot`, `cold`, `return`, or empty.
    #[error("invalid color: {0}. Available colors are: hot, cold, return")]
    InvalidColor(String),
}

/// A specialized Result type for heatpump-console operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a JSON parse error with context.
    pub fn json_parse(source: serde_json::Error, raw: &str) -> Self {
        Self::JsonParse {
            message: format!(
                "at position {}: {}",
                source.column(),
                raw.chars().take(100).collect::<String>()
            ),
            source,
        }
    }

    /// Create an IO error, prefixing the message with what was being done.
    pub fn io(source: std::io::Error, context: impl fmt::Display) -> Self {
        Self::Io(std::io::Error::new(source.kind(), format!("{context}: {source}")))
    }

    /// Check if this error is caused by bad input rather than the network.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Error::BaseUrlNotConfigured { .. }
                | Error::InvalidConfig(_)
                | Error::Url(_)
                | Error::MissingParameter { .. }
                | Error::UnknownElement(_)
                | Error::InvalidColor(_)
        )
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout(_) | Error::Transport(_) => true,
            Error::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Error::Http {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        Error::Transport(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonParse {
            message: err.to_string(),
            source: err,
        }
    }
}
