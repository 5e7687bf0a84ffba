use super::violation::ViolationKey;
use serde::{Deserialize, Serialize};

fn default_blank() -> String {
    "can't be blank".to_string()
}

fn default_invalid_datetime() -> String {
    "is not a valid %s".to_string()
}

fn default_before() -> String {
    "must be before %s".to_string()
}

fn default_after() -> String {
    "must be after %s".to_string()
}

fn default_on_or_before() -> String {
    "must be on or before %s".to_string()
}

fn default_on_or_after() -> String {
    "must be on or after %s".to_string()
}

fn default_restriction_invalid() -> String {
    "restriction '%s' value was invalid".to_string()
}

/// Message templates per violation key.
///
/// Every template may contain a single `%s` placeholder. Missing fields fall
/// back to the defaults when deserialized, so a host only needs to list the
/// messages it overrides.
///
/// ```rust
/// use timeliness::core::{ErrorMessages, ViolationKey};
///
/// let messages: ErrorMessages =
///     serde_json::from_str(r#"{"before": "is too late, expected before %s"}"#).unwrap();
///
/// assert_eq!(messages.template(ViolationKey::Before), "is too late, expected before %s");
/// assert_eq!(messages.template(ViolationKey::After), "must be after %s");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessages {
    #[serde(default = "default_blank")]
    pub blank: String,
    #[serde(default = "default_invalid_datetime")]
    pub invalid_datetime: String,
    #[serde(default = "default_before")]
    pub before: String,
    #[serde(default = "default_after")]
    pub after: String,
    #[serde(default = "default_on_or_before")]
    pub on_or_before: String,
    #[serde(default = "default_on_or_after")]
    pub on_or_after: String,
    #[serde(default = "default_restriction_invalid")]
    pub restriction_invalid: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            blank: default_blank(),
            invalid_datetime: default_invalid_datetime(),
            before: default_before(),
            after: default_after(),
            on_or_before: default_on_or_before(),
            on_or_after: default_on_or_after(),
            restriction_invalid: default_restriction_invalid(),
        }
    }
}

impl ErrorMessages {
    /// Returns the template for `key`.
    pub fn template(&self, key: ViolationKey) -> &str {
        match key {
            ViolationKey::Blank => &self.blank,
            ViolationKey::InvalidDatetime => &self.invalid_datetime,
            ViolationKey::Before => &self.before,
            ViolationKey::After => &self.after,
            ViolationKey::OnOrBefore => &self.on_or_before,
            ViolationKey::OnOrAfter => &self.on_or_after,
            ViolationKey::RestrictionInvalid => &self.restriction_invalid,
        }
    }

    /// Overrides the template for `key`.
    pub fn with_message(mut self, key: ViolationKey, template: impl Into<String>) -> Self {
        let template = template.into();
        match key {
            ViolationKey::Blank => self.blank = template,
            ViolationKey::InvalidDatetime => self.invalid_datetime = template,
            ViolationKey::Before => self.before = template,
            ViolationKey::After => self.after = template,
            ViolationKey::OnOrBefore => self.on_or_before = template,
            ViolationKey::OnOrAfter => self.on_or_after = template,
            ViolationKey::RestrictionInvalid => self.restriction_invalid = template,
        }
        self
    }

    pub fn with_blank(self, template: impl Into<String>) -> Self {
        self.with_message(ViolationKey::Blank, template)
    }

    pub fn with_invalid_datetime(self, template: impl Into<String>) -> Self {
        self.with_message(ViolationKey::InvalidDatetime, template)
    }

    pub fn with_before(self, template: impl Into<String>) -> Self {
        self.with_message(ViolationKey::Before, template)
    }

    pub fn with_after(self, template: impl Into<String>) -> Self {
        self.with_message(ViolationKey::After, template)
    }

    pub fn with_on_or_before(self, template: impl Into<String>) -> Self {
        self.with_message(ViolationKey::OnOrBefore, template)
    }

    pub fn with_on_or_after(self, template: impl Into<String>) -> Self {
        self.with_message(ViolationKey::OnOrAfter, template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let messages = ErrorMessages::default();
        assert_eq!(messages.template(ViolationKey::Blank), "can't be blank");
        assert_eq!(
            messages.template(ViolationKey::InvalidDatetime),
            "is not a valid %s"
        );
        assert_eq!(
            messages.template(ViolationKey::OnOrAfter),
            "must be on or after %s"
        );
    }

    #[test]
    fn test_overrides() {
        let messages = ErrorMessages::default()
            .with_before("too late")
            .with_message(ViolationKey::RestrictionInvalid, "broken %s");
        assert_eq!(messages.template(ViolationKey::Before), "too late");
        assert_eq!(messages.template(ViolationKey::RestrictionInvalid), "broken %s");
        assert_eq!(messages.template(ViolationKey::After), "must be after %s");
    }

    #[test]
    fn test_deserialize_empty_object_is_default() {
        let messages: ErrorMessages = serde_json::from_str("{}").unwrap();
        assert_eq!(messages, ErrorMessages::default());
    }
}
