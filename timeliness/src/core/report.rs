use super::violation::{Violation, ViolationKey};
use serde::{Deserialize, Serialize};

/// Receives violations as they are produced.
pub trait ErrorSink {
    fn add(&mut self, violation: Violation);
}

impl ErrorSink for Vec<Violation> {
    fn add(&mut self, violation: Violation) {
        self.push(violation);
    }
}

/// Violations collected from one validation pass, in the order produced.
///
/// # Examples
///
/// ```rust
/// use timeliness::core::{ErrorSink, ValidationReport, Violation, ViolationKey};
///
/// let mut report = ValidationReport::new();
/// report.add(Violation::new("birth_date", ViolationKey::Blank, "can't be blank", None));
///
/// assert!(!report.is_valid());
/// assert_eq!(report.on("birth_date"), vec!["can't be blank"]);
/// assert!(report.on("birth_time").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no violation was recorded.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Rendered messages recorded against `attribute`.
    pub fn on(&self, attribute: &str) -> Vec<String> {
        self.violations_for(attribute)
            .map(Violation::message)
            .collect()
    }

    /// Violations recorded against `attribute`.
    pub fn violations_for<'a>(
        &'a self,
        attribute: &'a str,
    ) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |violation| violation.attribute == attribute)
    }

    /// Returns true if `attribute` has a violation with `key`.
    pub fn has(&self, attribute: &str, key: ViolationKey) -> bool {
        self.violations_for(attribute).any(|violation| violation.key == key)
    }

    /// Attributes with at least one violation, in first-seen order.
    pub fn attributes(&self) -> Vec<&str> {
        let mut attributes: Vec<&str> = Vec::new();
        for violation in &self.violations {
            if !attributes.contains(&violation.attribute.as_str()) {
                attributes.push(&violation.attribute);
            }
        }
        attributes
    }

    /// Appends every violation of `other`.
    pub fn merge(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }
}

impl ErrorSink for ValidationReport {
    fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

impl IntoIterator for ValidationReport {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}
