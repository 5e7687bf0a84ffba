use crate::restrictions::RestrictionKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder substituted by a violation's parameter.
pub const PLACEHOLDER: &str = "%s";

/// Identifies what went wrong with an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKey {
    /// Nil or whitespace-only value where one is required
    Blank,
    /// The raw value did not parse as the attribute's kind
    InvalidDatetime,
    Before,
    After,
    OnOrBefore,
    OnOrAfter,
    /// A restriction operand raised an error while being resolved
    RestrictionInvalid,
}

impl ViolationKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKey::Blank => "blank",
            ViolationKey::InvalidDatetime => "invalid_datetime",
            ViolationKey::Before => "before",
            ViolationKey::After => "after",
            ViolationKey::OnOrBefore => "on_or_before",
            ViolationKey::OnOrAfter => "on_or_after",
            ViolationKey::RestrictionInvalid => "restriction_invalid",
        }
    }
}

impl fmt::Display for ViolationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RestrictionKind> for ViolationKey {
    fn from(kind: RestrictionKind) -> Self {
        match kind {
            RestrictionKind::Before => ViolationKey::Before,
            RestrictionKind::After => ViolationKey::After,
            RestrictionKind::OnOrBefore => ViolationKey::OnOrBefore,
            RestrictionKind::OnOrAfter => ViolationKey::OnOrAfter,
        }
    }
}

/// A single validation failure recorded against an attribute.
///
/// The message template is kept alongside its parameter so hosts can render
/// or translate it later; [`Violation::message`] performs the `%s`
/// substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub attribute: String,
    pub key: ViolationKey,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parameter: Option<String>,
}

impl Violation {
    pub fn new(
        attribute: &str,
        key: ViolationKey,
        template: &str,
        parameter: Option<String>,
    ) -> Self {
        Self {
            attribute: attribute.to_string(),
            key,
            template: template.to_string(),
            parameter,
        }
    }

    /// Renders the message, substituting the first `%s` with the parameter.
    pub fn message(&self) -> String {
        match &self.parameter {
            Some(parameter) => self.template.replacen(PLACEHOLDER, parameter, 1),
            None => self.template.clone(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.attribute, self.message())
    }
}
