use super::messages::ErrorMessages;
use crate::error::{ErrorContext, Result};
use crate::temporal::Kind;
use serde::{Deserialize, Serialize};

fn default_kind() -> Kind {
    Kind::DateTime
}

/// Per-check options, loadable from host configuration.
///
/// # Examples
///
/// ```rust
/// use timeliness::core::TimelinessOptions;
/// use timeliness::temporal::Kind;
///
/// # fn example() -> timeliness::error::Result<()> {
/// let options = TimelinessOptions::from_json(
///     r#"{"kind": "date", "allow_nil": true, "messages": {"blank": "is required"}}"#,
/// )?;
///
/// assert_eq!(options.kind, Kind::Date);
/// assert!(options.allow_nil);
/// assert!(!options.allow_blank);
/// assert_eq!(options.messages.blank, "is required");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinessOptions {
    /// Kind the attribute is parsed and compared as
    #[serde(default = "default_kind")]
    pub kind: Kind,
    /// Skip validation when the value is nil
    #[serde(default)]
    pub allow_nil: bool,
    /// Skip validation when the value is nil or whitespace-only
    #[serde(default)]
    pub allow_blank: bool,
    #[serde(default)]
    pub messages: ErrorMessages,
}

impl Default for TimelinessOptions {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            allow_nil: false,
            allow_blank: false,
            messages: ErrorMessages::default(),
        }
    }
}

impl TimelinessOptions {
    /// Creates default options for `kind`.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Loads options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse timeliness options")
    }

    /// Serializes the options to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize timeliness options")
    }
}
