//! Client configuration and builder.
//!
//! This module provides the builder pattern for configuring the heat-pump client.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use heatpump_console::config::{ClientConfig, TrailingLine};
//!
//! let config = ClientConfig::builder()
//!     .base_url("http://grafana.local/heatpump/")
//!     .heatpump_id("hp-0001")
//!     .timeout(Duration::from_secs(30))
//!     .trailing_line(TrailingLine::Flush)
//!     .build()?;
//! ```

use std::time::Duration;

use url::Url;

use super::options::{HeatpumpId, TrailingLine};
use super::source::{
    config_path, process_env, resolve_setting, ConfigFile, ENV_BASE_URL, ENV_HEATPUMP_ID,
};
use crate::{Error, Result};

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("heatpump-console/", env!("CARGO_PKG_VERSION"));

/// Default number of progress batches buffered between the reader task and the consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Configuration for the heat-pump client.
///
/// Use [`ClientConfig::builder()`] to create a new configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) heatpump_id: Option<HeatpumpId>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) connect_timeout: Option<Duration>,
    pub(crate) user_agent: String,
    pub(crate) trailing_line: TrailingLine,
    pub(crate) channel_capacity: usize,
}

impl ClientConfig {
    /// Create a new builder for ClientConfig.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Get the backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the default heat-pump id if set.
    pub fn heatpump_id(&self) -> Option<&HeatpumpId> {
        self.heatpump_id.as_ref()
    }

    /// Get the timeout if set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Get the trailing line policy for progress streams.
    pub fn trailing_line(&self) -> TrailingLine {
        self.trailing_line
    }

    /// Get the progress channel capacity.
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }
}

/// Builder for [`ClientConfig`].
///
/// This builder validates the configuration when [`build()`](ClientConfigBuilder::build) is called,
/// ensuring that a usable base URL has been resolved.
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    heatpump_id: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    trailing_line: Option<TrailingLine>,
    channel_capacity: usize,
    use_environment: bool,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            heatpump_id: None,
            timeout: None,
            connect_timeout: None,
            user_agent: None,
            trailing_line: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            use_environment: true,
        }
    }
}

impl ClientConfigBuilder {
    /// Set the backend base URL (the directory that contains `api/`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the default heat-pump id used when a request doesn't carry one.
    pub fn heatpump_id(mut self, id: impl Into<String>) -> Self {
        self.heatpump_id = Some(id.into());
        self
    }

    /// Set the timeout for non-streaming requests and for `send_and_collect`.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the TCP connect timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Override the user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Choose what happens to an unterminated last line of a progress stream.
    pub fn trailing_line(mut self, policy: TrailingLine) -> Self {
        self.trailing_line = Some(policy);
        self
    }

    /// Set how many progress batches may queue up before the reader waits.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Whether to read `HEATPUMP_CONSOLE_*` variables and the config file (default: true).
    pub fn use_environment(mut self, enabled: bool) -> Self {
        self.use_environment = enabled;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No base URL can be resolved
    /// - The base URL is not an absolute `http`/`https` URL
    /// - The channel capacity or a timeout is zero
    pub fn build(self) -> Result<ClientConfig> {
        let file = if self.use_environment {
            ConfigFile::load()?.unwrap_or_default()
        } else {
            ConfigFile::default()
        };
        self.build_with(process_env, file)
    }

    pub(crate) fn build_with(
        self,
        env: impl Fn(&str) -> Option<String>,
        file: ConfigFile,
    ) -> Result<ClientConfig> {
        let enabled = self.use_environment;
        let env = |key: &str| if enabled { env(key) } else { None };

        let raw_url = resolve_setting(self.base_url.clone(), ENV_BASE_URL, env, file.base_url)
            .ok_or_else(|| Error::BaseUrlNotConfigured {
                path: config_path().display().to_string(),
            })?;
        let base_url = parse_base_url(&raw_url)?;

        let heatpump_id =
            resolve_setting(self.heatpump_id.clone(), ENV_HEATPUMP_ID, env, file.heatpump_id)
                .map(|id| HeatpumpId::new(id.trim()));

        let timeout = self
            .timeout
            .or_else(|| file.timeout_secs.map(Duration::from_secs));
        for (name, value) in [("timeout", timeout), ("connect_timeout", self.connect_timeout)] {
            if value.is_some_and(|d| d.is_zero()) {
                return Err(Error::InvalidConfig(format!("{name} must be greater than zero")));
            }
        }

        if self.channel_capacity == 0 {
            return Err(Error::InvalidConfig(
                "channel_capacity must be at least 1".to_string(),
            ));
        }

        Ok(ClientConfig {
            base_url,
            heatpump_id,
            timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            trailing_line: self
                .trailing_line
                .or(file.trailing_line)
                .unwrap_or_default(),
            channel_capacity: self.channel_capacity,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidConfig(format!(
            "base URL must use http or https, got {}",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(Error::InvalidConfig(format!("base URL cannot be a base: {url}")));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn build(builder: ClientConfigBuilder) -> Result<ClientConfig> {
        builder.build_with(no_env, ConfigFile::default())
    }

    #[test]
    fn builder_with_base_url() {
        let config = build(ClientConfig::builder().base_url("http://localhost:8080/app/")).unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8080/app/");
        assert!(config.heatpump_id().is_none());
        assert!(config.timeout().is_none());
        assert_eq!(config.trailing_line(), TrailingLine::Drop);
        assert_eq!(config.channel_capacity(), DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn builder_missing_base_url() {
        let result = build(ClientConfig::builder());
        assert!(matches!(result, Err(Error::BaseUrlNotConfigured { .. })));
    }

    #[test]
    fn builder_rejects_non_http_scheme() {
        let result = build(ClientConfig::builder().base_url("ftp://example.com/"));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result = build(ClientConfig::builder().base_url("not a url"));
        assert!(matches!(result, Err(Error::Url(_))));
    }

    #[test]
    fn builder_invalid_timeout() {
        let result = build(
            ClientConfig::builder()
                .base_url("http://localhost/")
                .timeout(Duration::ZERO),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn builder_invalid_capacity() {
        let result = build(
            ClientConfig::builder()
                .base_url("http://localhost/")
                .channel_capacity(0),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn environment_and_file_fill_gaps() {
        let file = ConfigFile {
            base_url: Some("http://file/".into()),
            heatpump_id: Some("hp-file".into()),
            timeout_secs: Some(7),
            trailing_line: Some(TrailingLine::Flush),
        };
        let env = |key: &str| (key == ENV_HEATPUMP_ID).then(|| " hp-env ".to_string());
        let config = ClientConfig::builder().build_with(env, file).unwrap();

        assert_eq!(config.base_url().as_str(), "http://file/");
        assert_eq!(config.heatpump_id().unwrap().as_str(), "hp-env");
        assert_eq!(config.timeout(), Some(Duration::from_secs(7)));
        assert_eq!(config.trailing_line(), TrailingLine::Flush);
    }

    #[test]
    fn environment_can_be_disabled() {
        let env = |_: &str| Some("http://env/".to_string());
        let result = ClientConfig::builder()
            .use_environment(false)
            .build_with(env, ConfigFile::default());
        assert!(matches!(result, Err(Error::BaseUrlNotConfigured { .. })));
    }

    #[test]
    fn explicit_settings_override_file() {
        let file = ConfigFile {
            timeout_secs: Some(7),
            trailing_line: Some(TrailingLine::Flush),
            ..Default::default()
        };
        let config = ClientConfig::builder()
            .base_url("https://example.com")
            .timeout(Duration::from_secs(2))
            .trailing_line(TrailingLine::Drop)
            .user_agent("test-agent")
            .build_with(no_env, file)
            .unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(2)));
        assert_eq!(config.trailing_line(), TrailingLine::Drop);
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientConfig>();
        assert_send_sync::<ClientConfigBuilder>();
    }
}
