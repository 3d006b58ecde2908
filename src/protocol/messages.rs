//! Response bodies of the command backend endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{CommandId, CommandName};

/// Response of `GET api/get_commands`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandList {
    /// Names of all commands the backend accepts.
    pub commands: Vec<CommandName>,
}

/// Response of `GET api/get_command_fields/<command>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandFields {
    /// Echo of the requested command.
    #[serde(default)]
    pub command: Option<CommandName>,
    /// Inputs of the command, in form order.
    pub fields: Vec<CommandField>,
}

/// One input of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandField {
    /// Field name, sent as the query parameter name.
    pub name: String,
    /// Any other attributes the backend reports (type, default, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CommandField {
    /// Create a field with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Human-readable label: underscores become spaces, followed by a colon.
    pub fn label(&self) -> String {
        format!("{}:", self.name.replace('_', " "))
    }
}

/// Response of `GET api/command/<command>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResponse {
    /// Wrapped id of the dispatched command.
    pub command_id: CommandIdValue,
    /// Anything else the backend returns.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{ "value": <id> }` wrapper used by the dispatch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandIdValue {
    /// The command id.
    pub value: CommandId,
}

impl DispatchResponse {
    /// The id to poll progress with.
    pub fn command_id(&self) -> &CommandId {
        &self.command_id.value
    }
}

/// `{ "error": "..." }` body returned with 4xx statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Error description.
    pub error: String,
}
