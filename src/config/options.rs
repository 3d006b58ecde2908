//! Type-safe identifiers and options.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier from a string.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is empty after trimming whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Name of a backend command, e.g. `Ping`.
    CommandName
);

string_id!(
    /// Identifier of a dispatched command, used to poll its progress.
    CommandId
);

string_id!(
    /// Identifier of the heat-pump device a command targets.
    HeatpumpId
);

/// What to do with text left after the last newline when a progress stream ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrailingLine {
    /// Discard the unterminated tail.
    #[default]
    Drop,
    /// Process the unterminated tail as a final line.
    Flush,
}

impl fmt::Display for TrailingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailingLine::Drop => write!(f, "drop"),
            TrailingLine::Flush => write!(f, "flush"),
        }
    }
}

impl std::str::FromStr for TrailingLine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(TrailingLine::Drop),
            "flush" => Ok(TrailingLine::Flush),
            other => Err(format!("unknown trailing line policy: {other}")),
        }
    }
}
