//! Headless model of the command console.
//!
//! - [`CommandPicker`] - the filterable command dropdown
//! - [`CommandForm`] - the inputs of the selected command
//! - [`CommandRequest`] - what gets dispatched

mod form;
mod picker;

pub use form::{CommandForm, CommandRequest, FormInput, HEATPUMP_ID_PARAM};
pub use picker::CommandPicker;
