//! # heatpump-console
//!
//! Async client and headless models for a heat-pump command console and
//! status dashboard.
//!
//! This library provides:
//! - Command discovery and dispatch against the console backend
//! - Incremental, de-duplicated rendering of newline-delimited JSON progress streams
//! - The command picker and form behind the console
//! - Scene derivation for the SVG status dashboard
//!
//! ## Quick Start
//!
//! ```ignore
//! use heatpump_console::{CommandRequest, HeatpumpClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = HeatpumpClient::new()?;
//!     let request = CommandRequest::new("Ping").heatpump_id("hp-0001");
//!     let output = client.send_and_collect(&request).await?;
//!     print!("{output}");
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```ignore
//! use futures::StreamExt;
//!
//! let mut stream = client.send(&request).await?;
//! while let Some(batch) = stream.next().await {
//!     print!("{}", batch?.rendered());
//! }
//! ```
//!
//! ## Progress formatting
//!
//! ```
//! use heatpump_console::stream::format_progress_line;
//!
//! let line = r#"{"command_progress":{"time":"T1","command_id":"C1","status":"running"}}"#;
//! assert_eq!(format_progress_line(line), "T1: {\"status\":\"running\"}\n\n");
//! ```
//!
//! ## Configuration
//!
//! ```ignore
//! use heatpump_console::{HeatpumpClient, TrailingLine};
//!
//! let client = HeatpumpClient::builder()
//!     .base_url("http://localhost:8000/")
//!     .heatpump_id("hp-0001")
//!     .timeout(std::time::Duration::from_secs(60))
//!     .trailing_line(TrailingLine::Flush)
//!     .build()?;
//! ```

mod client;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod display;
mod error;
pub mod protocol;
pub mod stream;

pub use error::{Error, Result};

// Re-export the main client types at crate root
pub use client::{ClientBuilder, HeatpumpClient};

// Re-export commonly used config types at crate root
pub use config::{
    ClientConfig, ClientConfigBuilder, CommandId, CommandName, HeatpumpId, TrailingLine,
};

// Re-export commonly used console and protocol types at crate root
pub use console::{CommandForm, CommandPicker, CommandRequest};
pub use protocol::{CommandField, ProgressRecord};

// Re-export commonly used stream types at crate root
pub use display::DisplaySurface;
pub use stream::{ProgressBatch, ProgressProcessor, ProgressStream, StreamState};
