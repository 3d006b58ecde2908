//! Command form and the dispatch request it produces.

use crate::config::{CommandName, HeatpumpId};
use crate::protocol::CommandField;
use crate::{Error, Result};

/// Query parameter carrying the target device.
pub const HEATPUMP_ID_PARAM: &str = "heatpump_id";

/// A command ready to be dispatched.
///
/// # Example
///
/// ```
/// use heatpump_console::console::CommandRequest;
///
/// let request = CommandRequest::new("SetTargetTemperature")
///     .field("zone_id", "1")
///     .field("target_temperature", " 21.5 ")
///     .heatpump_id("hp-0001");
///
/// let pairs = request.query_pairs(None).unwrap();
/// assert_eq!(pairs[1], ("target_temperature".to_string(), "21.5".to_string()));
/// assert_eq!(pairs[2], ("heatpump_id".to_string(), "hp-0001".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    command: CommandName,
    fields: Vec<(String, String)>,
    heatpump_id: Option<HeatpumpId>,
}

impl CommandRequest {
    /// Start a request for `command`.
    pub fn new(command: impl Into<CommandName>) -> Self {
        Self {
            command: command.into(),
            fields: Vec::new(),
            heatpump_id: None,
        }
    }

    /// Add a field value; a later value for the same name replaces the earlier one.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Target a specific heat pump.
    pub fn heatpump_id(mut self, id: impl Into<HeatpumpId>) -> Self {
        self.heatpump_id = Some(id.into());
        self
    }

    /// The command name.
    pub fn command(&self) -> &CommandName {
        &self.command
    }

    /// The field values in insertion order, untrimmed.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Query pairs for the dispatch URL.
    ///
    /// Field values are trimmed and `heatpump_id` comes last, taken from the
    /// request or else from `default_heatpump`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingParameter`] if the command name or device id is blank.
    pub fn query_pairs(&self, default_heatpump: Option<&HeatpumpId>) -> Result<Vec<(String, String)>> {
        if self.command.is_blank() {
            return Err(Error::MissingParameter { name: "command" });
        }
        let heatpump = self
            .heatpump_id
            .as_ref()
            .or(default_heatpump)
            .filter(|id| !id.is_blank())
            .ok_or(Error::MissingParameter { name: HEATPUMP_ID_PARAM })?;

        let mut pairs: Vec<(String, String)> = self
            .fields
            .iter()
            .filter(|(name, _)| name != HEATPUMP_ID_PARAM)
            .map(|(name, value)| (name.clone(), value.trim().to_string()))
            .collect();
        pairs.push((HEATPUMP_ID_PARAM.to_string(), heatpump.as_str().trim().to_string()));
        Ok(pairs)
    }
}

/// One labelled input of a [`CommandForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormInput {
    field: CommandField,
    value: String,
}

impl FormInput {
    /// The field name sent to the backend.
    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// The label shown next to the input.
    pub fn label(&self) -> String {
        self.field.label()
    }

    /// The current value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Inputs of the command currently selected in the console.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandForm {
    inputs: Vec<FormInput>,
}

impl CommandForm {
    /// Build a form with one empty input per field, in field order.
    pub fn from_fields(fields: impl IntoIterator<Item = CommandField>) -> Self {
        Self {
            inputs: fields
                .into_iter()
                .map(|field| FormInput {
                    field,
                    value: String::new(),
                })
                .collect(),
        }
    }

    /// The inputs.
    pub fn inputs(&self) -> &[FormInput] {
        &self.inputs
    }

    /// Whether the form has no inputs.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Set the value of the input named `name`; returns `false` if there is none.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.inputs.iter_mut().find(|input| input.name() == name) {
            Some(input) => {
                input.value = value.into();
                true
            }
            None => {
                tracing::warn!(field = name, "no such field on this command");
                false
            }
        }
    }

    /// Turn the form into a request; every input is sent, empty or not.
    pub fn into_request(self, command: CommandName, heatpump_id: Option<HeatpumpId>) -> CommandRequest {
        let mut request = self
            .inputs
            .into_iter()
            .fold(CommandRequest::new(command), |request, input| {
                request.field(input.field.name, input.value)
            });
        request.heatpump_id = heatpump_id;
        request
    }
}
