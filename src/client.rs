//! High-level client for the heat-pump command backend.
//!
//! This module provides [`HeatpumpClient`], the main entry point for listing
//! commands, dispatching them, and following their progress.
//!
//! # Example
//!
//! ```ignore
//! use heatpump_console::{CommandRequest, HeatpumpClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = HeatpumpClient::builder()
//!         .base_url("http://localhost:8000/")
//!         .heatpump_id("hp-0001")
//!         .build()?;
//!
//!     for command in client.list_commands().await? {
//!         println!("{command}");
//!     }
//!
//!     // Dispatch and wait for the whole progress log
//!     let request = CommandRequest::new("Ping");
//!     let output = client.send_and_collect(&request).await?;
//!     print!("{output}");
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{ClientConfig, ClientConfigBuilder, CommandId, CommandName, TrailingLine};
use crate::console::CommandRequest;
use crate::protocol::{ApiErrorBody, CommandField, CommandFields, CommandList, DispatchResponse};
use crate::stream::response::ChunkStream;
use crate::stream::{with_timeout, ProgressOptions, ProgressStream};
use crate::{Error, Result};

/// A client for the heat-pump command backend.
///
/// `HeatpumpClient` holds the configuration and a pooled HTTP client and
/// provides methods for:
/// - Discovery ([`list_commands`](Self::list_commands), [`command_fields`](Self::command_fields))
/// - Dispatch ([`dispatch`](Self::dispatch), [`send`](Self::send), [`send_and_collect`](Self::send_and_collect))
/// - Progress ([`stream_progress`](Self::stream_progress))
///
/// # Thread Safety
///
/// `HeatpumpClient` is `Send + Sync` and cheap to clone; clones share the
/// configuration and the connection pool.
#[derive(Debug, Clone)]
pub struct HeatpumpClient {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
}

impl HeatpumpClient {
    /// Create a client from the environment and config file.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL can be resolved.
    pub fn new() -> Result<Self> {
        let config = ClientConfig::builder().build()?;
        Self::with_config(config)
    }

    /// Create a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut http = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(connect_timeout) = config.connect_timeout {
            http = http.connect_timeout(connect_timeout);
        }

        Ok(Self {
            config: Arc::new(config),
            http: http.build().map_err(Error::Transport)?,
        })
    }

    /// Create a builder for configuring a new client.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = HeatpumpClient::builder()
    ///     .base_url("https://heatpumps.example.com/console/")
    ///     .timeout(Duration::from_secs(30))
    ///     .build()?;
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// List the commands the backend accepts.
    pub async fn list_commands(&self) -> Result<Vec<CommandName>> {
        let url = self.endpoint(&["api", "get_commands"])?;
        let list: CommandList = self.get_json(url).await?;
        tracing::debug!(count = list.commands.len(), "loaded commands");
        Ok(list.commands)
    }

    /// List the input fields of a command, in form order.
    pub async fn command_fields(&self, command: &CommandName) -> Result<Vec<CommandField>> {
        let url = self.endpoint(&["api", "get_command_fields", command.as_str()])?;
        let fields: CommandFields = self.get_json(url).await?;
        tracing::debug!(%command, count = fields.fields.len(), "loaded command fields");
        Ok(fields.fields)
    }

    /// Dispatch a command and return its id.
    ///
    /// The device id comes from the request, or else from the configured
    /// default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] without sending anything if the
    /// command name or device id is missing.
    pub async fn dispatch(&self, request: &CommandRequest) -> Result<CommandId> {
        let pairs = request
            .query_pairs(self.config.heatpump_id())
            .inspect_err(|e| tracing::error!(command = %request.command(), error = %e, "command not sent"))?;

        let mut url = self.endpoint(&["api", "command", request.command().as_str()])?;
        url.query_pairs_mut().extend_pairs(pairs.iter());

        let response: DispatchResponse = self.get_json(url).await?;
        let command_id = response.command_id().clone();
        tracing::info!(command = %request.command(), %command_id, "command dispatched");
        Ok(command_id)
    }

    /// Follow the progress of a dispatched command.
    ///
    /// The request is made by the stream's background task, so this returns
    /// immediately. Must be called within a tokio runtime.
    ///
    /// # Cancellation
    ///
    /// Dropping the returned [`ProgressStream`] closes the connection.
    pub fn stream_progress(&self, command_id: &CommandId) -> ProgressStream {
        let url = self.progress_url(command_id);
        let connect = open_body(self.http.clone(), url);
        ProgressStream::spawn(Some(command_id.clone()), connect, self.progress_options())
    }

    /// Dispatch a command and follow its progress.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use heatpump_console::display::WriterSurface;
    ///
    /// let stream = client.send(&CommandRequest::new("Ping")).await?;
    /// stream.render_to(&mut WriterSurface::stdout()).await;
    /// ```
    pub async fn send(&self, request: &CommandRequest) -> Result<ProgressStream> {
        let command_id = self.dispatch(request).await?;
        Ok(self.stream_progress(&command_id))
    }

    /// Dispatch a command and collect its whole progress log.
    ///
    /// Bounded by the configured timeout, if any.
    pub async fn send_and_collect(&self, request: &CommandRequest) -> Result<String> {
        let stream = self.send(request).await?;

        if let Some(timeout) = self.config.timeout() {
            with_timeout(timeout, stream.collect_text()).await
        } else {
            stream.collect_text().await
        }
    }

    /// Get a reference to the client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn progress_options(&self) -> ProgressOptions {
        ProgressOptions {
            trailing_line: self.config.trailing_line(),
            channel_capacity: self.config.channel_capacity(),
        }
    }

    /// `<base>/<segments...>`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let base = self.config.base_url();
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| Error::InvalidConfig(format!("base URL cannot be a base: {base}")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn progress_url(&self, command_id: &CommandId) -> Result<Url> {
        let mut url = self.endpoint(&["api", "progress", ""])?;
        url.query_pairs_mut().append_pair("command_id", command_id.as_str());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let timeout = self.config.timeout();
        let mut request = self.http.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let timed_out = |e: reqwest::Error| match timeout {
            Some(timeout) if e.is_timeout() => Error::Timeout(timeout),
            _ => Error::from(e),
        };
        let response = check_status(request.send().await.map_err(timed_out)?).await?;
        let body = response.text().await.map_err(timed_out)?;
        serde_json::from_str(&body).map_err(|e| Error::json_parse(e, &body))
    }
}

/// Request a progress body and hand back its chunks.
async fn open_body(http: reqwest::Client, url: Result<Url>) -> Result<ChunkStream> {
    let url = url?;
    tracing::debug!(%url, "opening progress stream");
    let response = check_status(http.get(url).send().await?).await?;
    Ok(response
        .bytes_stream()
        .map(|chunk| chunk.map_err(Error::from))
        .boxed())
}

/// Map a non-success status to [`Error::Http`], preferring the backend's
/// `{"error": ...}` text as the message.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(api_error) => api_error.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };
    tracing::warn!(status = status.as_u16(), %message, "backend returned an error");
    Err(Error::Http {
        status: status.as_u16(),
        message,
    })
}

/// Builder for [`HeatpumpClient`].
///
/// This wraps [`ClientConfigBuilder`] and builds directly into a [`HeatpumpClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    inner: ClientConfigBuilder,
}

impl ClientBuilder {
    /// Create a new client builder with default settings.
    pub fn new() -> Self {
        Self {
            inner: ClientConfigBuilder::default(),
        }
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No base URL can be resolved, or it is not `http`/`https`
    /// - A timeout or the channel capacity is zero
    pub fn build(self) -> Result<HeatpumpClient> {
        let config = self.inner.build()?;
        HeatpumpClient::with_config(config)
    }

    /// Set the backend base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.base_url(url);
        self
    }

    /// Set the default heat-pump id.
    pub fn heatpump_id(mut self, id: impl Into<String>) -> Self {
        self.inner = self.inner.heatpump_id(id);
        self
    }

    /// Timeout for requests.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.inner = self.inner.timeout(duration);
        self
    }

    /// TCP connect timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.inner = self.inner.connect_timeout(duration);
        self
    }

    /// Override the user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.inner = self.inner.user_agent(agent);
        self
    }

    /// Policy for an unterminated last progress line.
    pub fn trailing_line(mut self, policy: TrailingLine) -> Self {
        self.inner = self.inner.trailing_line(policy);
        self
    }

    /// Batches buffered per progress stream.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.inner = self.inner.channel_capacity(capacity);
        self
    }

    /// Whether to read the environment and config file.
    pub fn use_environment(mut self, enabled: bool) -> Self {
        self.inner = self.inner.use_environment(enabled);
        self
    }
}
