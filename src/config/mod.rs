//! Configuration for the heat-pump client.
//!
//! This module provides:
//!
//! - [`ClientConfig`] and [`ClientConfigBuilder`] for configuring the client
//! - [`ConfigFile`] and the `HEATPUMP_CONSOLE_*` environment variables
//! - Type-safe identifiers like [`CommandName`], [`CommandId`], and [`HeatpumpId`]
//!
//! # Example
//!
//! ```ignore
//! use heatpump_console::config::ClientConfig;
//!
//! // Explicit settings
//! let config = ClientConfig::builder()
//!     .base_url("http://grafana.local/heatpump/")
//!     .heatpump_id("hp-0001")
//!     .build()?;
//!
//! // Resolve everything from HEATPUMP_CONSOLE_BASE_URL and the config file
//! let config = ClientConfig::builder().build()?;
//! ```

pub mod builder;
pub mod options;
pub mod source;

pub use builder::{ClientConfig, ClientConfigBuilder, DEFAULT_USER_AGENT};
pub use options::{CommandId, CommandName, HeatpumpId, TrailingLine};
pub use source::{config_path, ConfigFile, ENV_BASE_URL, ENV_HEATPUMP_ID};
