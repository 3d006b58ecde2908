//! JSON protocol types for the heat-pump command backend.
//!
//! # Endpoints
//!
//! - `GET api/get_commands` → [`CommandList`]
//! - `GET api/get_command_fields/<command>` → [`CommandFields`]
//! - `GET api/command/<command>?...&heatpump_id=<id>` → [`DispatchResponse`]
//! - `GET api/progress/?command_id=<id>` → newline-delimited [`ProgressRecord`] envelopes
//!
//! Failed requests carry an [`ApiErrorBody`].
//!
//! # Example
//!
//! ```
//! use heatpump_console::protocol::ProgressRecord;
//!
//! let line = r#"{"command_progress": {"time": "12:00:01", "command_id": "c1", "status": "running"}}"#;
//! let record = ProgressRecord::parse(line).unwrap();
//! assert_eq!(record.display_fields()["status"], "running");
//! ```

mod messages;
mod progress;

pub use messages::{
    ApiErrorBody, CommandField, CommandFields, CommandIdValue, CommandList, DispatchResponse,
};
pub use progress::{
    ProgressRecord, COMMAND_ID_KEY, ENVELOPE_KEY, RECEIVED_TIME_KEY, TIME_KEY,
};
