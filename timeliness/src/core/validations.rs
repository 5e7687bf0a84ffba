//! Ordered collections of timeliness checks.

use super::check::TimelinessCheck;
use super::record::Record;
use super::report::{ErrorSink, ValidationReport};
use std::sync::Arc;
use tracing::{debug, info_span};

/// The timeliness checks declared for a record type.
///
/// Checks run in declaration order against one record, so the violations of
/// the report appear in that order too.
///
/// # Examples
///
/// ```rust
/// use timeliness::core::{MemoryRecord, TimelinessCheck, Validations};
/// use timeliness::restrictions::Operand;
/// use timeliness::temporal::Kind;
///
/// let validations = Validations::builder("person")
///     .check(TimelinessCheck::date("birth_date").on_or_before(Operand::today()).build())
///     .check(TimelinessCheck::time("birth_time").build())
///     .build();
///
/// let mut record = MemoryRecord::new()
///     .declare("birth_date", Kind::Date)
///     .declare("birth_time", Kind::Time)
///     .with_value("birth_date", "1980-01-31")
///     .with_value("birth_time", "25:00");
///
/// let report = validations.validate(&mut record);
/// assert!(report.on("birth_date").is_empty());
/// assert_eq!(report.on("birth_time"), vec!["is not a valid time"]);
/// ```
#[derive(Debug, Clone)]
pub struct Validations {
    name: String,
    checks: Vec<Arc<TimelinessCheck>>,
}

impl Validations {
    /// Creates a builder for a named set of checks.
    pub fn builder(name: impl Into<String>) -> ValidationsBuilder {
        ValidationsBuilder::new(name)
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the checks in evaluation order.
    pub fn checks(&self) -> &[Arc<TimelinessCheck>] {
        &self.checks
    }

    /// Runs every check against `record`.
    pub fn validate(&self, record: &mut dyn Record) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_into(record, &mut report);
        report
    }

    /// Runs every check against `record`, adding violations to `sink`.
    pub fn validate_into(&self, record: &mut dyn Record, sink: &mut dyn ErrorSink) {
        let span = info_span!("timeliness.validations", name = %self.name, checks = self.checks.len());
        let _guard = span.enter();

        for check in &self.checks {
            check.validate_into(record, sink);
        }
        debug!("Validation pass complete");
    }
}

/// Builder for [`Validations`].
#[derive(Debug)]
pub struct ValidationsBuilder {
    name: String,
    checks: Vec<Arc<TimelinessCheck>>,
}

impl ValidationsBuilder {
    /// Creates an empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
        }
    }

    /// Adds a check.
    pub fn check(mut self, check: TimelinessCheck) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Adds multiple checks.
    pub fn checks<I>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = TimelinessCheck>,
    {
        self.checks.extend(checks.into_iter().map(Arc::new));
        self
    }

    /// Builds the validations.
    pub fn build(self) -> Validations {
        Validations {
            name: self.name,
            checks: self.checks,
        }
    }
}
