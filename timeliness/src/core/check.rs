//! A configured timeliness validation over one or more attributes.

use super::messages::ErrorMessages;
use super::options::TimelinessOptions;
use super::record::Record;
use super::report::{ErrorSink, ValidationReport};
use super::violation::{Violation, ViolationKey};
use crate::logging::{truncate_field, LogConfig};
use crate::parser::{DefaultResolver, TemporalResolver};
use crate::restrictions::{Operand, RestrictionEvaluator, RestrictionKind, RestrictionSpec};
use crate::temporal::{Kind, RawValue};
use crate::{log_restriction, perf_debug};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Validates that attributes hold parseable temporal values satisfying a set
/// of ordering restrictions.
///
/// For each attribute the check reads the raw value, applies the nil/blank
/// rules, parses the value strictly at the configured [`Kind`] and, when it
/// parses, evaluates the restrictions. A value that fails to parse is reset on
/// the record and reported as `invalid_datetime`.
///
/// # Examples
///
/// ```rust
/// use timeliness::core::{MemoryRecord, TimelinessCheck};
/// use timeliness::temporal::Kind;
///
/// let check = TimelinessCheck::date("birth_date")
///     .on_or_before("2008-12-31")
///     .build();
///
/// let mut record = MemoryRecord::new()
///     .declare("birth_date", Kind::Date)
///     .with_value("birth_date", "2009-01-01");
///
/// let report = check.validate(&mut record);
/// assert_eq!(report.on("birth_date"), vec!["must be on or before 2008-12-31"]);
/// ```
#[derive(Debug, Clone)]
pub struct TimelinessCheck {
    attributes: Vec<String>,
    restrictions: RestrictionSpec,
    options: TimelinessOptions,
    resolver: Arc<dyn TemporalResolver>,
    log_config: LogConfig,
}

impl TimelinessCheck {
    /// Creates a builder for a check of the given kind.
    pub fn builder(kind: Kind) -> TimelinessCheckBuilder {
        TimelinessCheckBuilder::new(kind)
    }

    /// A check that validates `attribute` as a date.
    pub fn date(attribute: impl Into<String>) -> TimelinessCheckBuilder {
        Self::builder(Kind::Date).attribute(attribute)
    }

    /// A check that validates `attribute` as a time of day.
    pub fn time(attribute: impl Into<String>) -> TimelinessCheckBuilder {
        Self::builder(Kind::Time).attribute(attribute)
    }

    /// A check that validates `attribute` as a date and time.
    pub fn datetime(attribute: impl Into<String>) -> TimelinessCheckBuilder {
        Self::builder(Kind::DateTime).attribute(attribute)
    }

    pub fn kind(&self) -> Kind {
        self.options.kind
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn restrictions(&self) -> &RestrictionSpec {
        &self.restrictions
    }

    pub fn options(&self) -> &TimelinessOptions {
        &self.options
    }

    /// Validates every configured attribute and collects the violations.
    pub fn validate(&self, record: &mut dyn Record) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_into(record, &mut report);
        report
    }

    /// Validates every configured attribute, adding violations to `sink`.
    #[instrument(skip_all, fields(kind = %self.options.kind, attributes = self.attributes.len()))]
    pub fn validate_into(&self, record: &mut dyn Record, sink: &mut dyn ErrorSink) {
        for attribute in &self.attributes {
            self.validate_attribute(attribute, record, sink);
        }
    }

    fn validate_attribute(&self, attribute: &str, record: &mut dyn Record, sink: &mut dyn ErrorSink) {
        let kind = self.options.kind;
        let messages = &self.options.messages;

        let raw = record.raw_value(attribute);
        let is_nil = raw.is_none();
        let is_blank = raw.as_ref().map_or(true, RawValue::is_blank);

        if (is_nil && self.options.allow_nil) || (is_blank && self.options.allow_blank) {
            perf_debug!(self.log_config, attribute, "Empty value allowed, skipping");
            return;
        }

        let raw = match raw {
            Some(raw) if !is_blank => raw,
            _ => {
                sink.add(Violation::new(
                    attribute,
                    ViolationKey::Blank,
                    messages.template(ViolationKey::Blank),
                    None,
                ));
                return;
            }
        };

        let Some(value) = self.resolver.resolve(&raw, kind, true) else {
            if let RawValue::Text(text) = &raw {
                debug!(
                    attribute,
                    kind = %kind,
                    value = %truncate_field(text, self.log_config.max_field_length),
                    "Value did not parse, resetting attribute"
                );
            }
            record.reset_value(attribute);
            sink.add(Violation::new(
                attribute,
                ViolationKey::InvalidDatetime,
                messages.template(ViolationKey::InvalidDatetime),
                Some(kind.to_string()),
            ));
            return;
        };

        if self.restrictions.is_empty() {
            return;
        }

        let evaluator = RestrictionEvaluator::new(self.resolver.as_ref(), messages);
        let violations = evaluator.evaluate(attribute, &value, kind, &*record, &self.restrictions);
        log_restriction!(
            self.log_config,
            attribute,
            restrictions = self.restrictions.len(),
            violations = violations.len(),
            "Evaluated restrictions"
        );
        for violation in violations {
            sink.add(violation);
        }
    }
}

/// Builder for [`TimelinessCheck`].
#[derive(Debug, Clone)]
pub struct TimelinessCheckBuilder {
    attributes: Vec<String>,
    restrictions: RestrictionSpec,
    options: TimelinessOptions,
    resolver: Option<Arc<dyn TemporalResolver>>,
    log_config: LogConfig,
}

impl TimelinessCheckBuilder {
    /// Creates a builder for a check of the given kind.
    pub fn new(kind: Kind) -> Self {
        Self {
            attributes: Vec::new(),
            restrictions: RestrictionSpec::new(),
            options: TimelinessOptions::new(kind),
            resolver: None,
            log_config: LogConfig::default(),
        }
    }

    /// Adds an attribute to validate.
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Adds several attributes to validate.
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Replaces all restrictions.
    pub fn restrictions(mut self, restrictions: RestrictionSpec) -> Self {
        self.restrictions = restrictions;
        self
    }

    /// Sets a single restriction.
    pub fn restriction(mut self, kind: RestrictionKind, operand: impl Into<Operand>) -> Self {
        self.restrictions = self.restrictions.with(kind, operand);
        self
    }

    /// Adds a `before` restriction.
    pub fn before(self, operand: impl Into<Operand>) -> Self {
        self.restriction(RestrictionKind::Before, operand)
    }

    /// Adds an `after` restriction.
    pub fn after(self, operand: impl Into<Operand>) -> Self {
        self.restriction(RestrictionKind::After, operand)
    }

    /// Adds an `on_or_before` restriction.
    pub fn on_or_before(self, operand: impl Into<Operand>) -> Self {
        self.restriction(RestrictionKind::OnOrBefore, operand)
    }

    /// Adds an `on_or_after` restriction.
    pub fn on_or_after(self, operand: impl Into<Operand>) -> Self {
        self.restriction(RestrictionKind::OnOrAfter, operand)
    }

    /// Skips attributes with no value at all.
    pub fn allow_nil(mut self, allow: bool) -> Self {
        self.options.allow_nil = allow;
        self
    }

    /// Skips attributes that are missing or whitespace-only.
    pub fn allow_blank(mut self, allow: bool) -> Self {
        self.options.allow_blank = allow;
        self
    }

    /// Replaces all message templates.
    pub fn messages(mut self, messages: ErrorMessages) -> Self {
        self.options.messages = messages;
        self
    }

    /// Overrides a single message template.
    pub fn message(mut self, key: ViolationKey, template: impl Into<String>) -> Self {
        self.options.messages = self.options.messages.with_message(key, template);
        self
    }

    /// Applies host options. The kind of the options replaces the builder's.
    pub fn options(mut self, options: TimelinessOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the resolver used for raw values and text operands.
    pub fn resolver(mut self, resolver: Arc<dyn TemporalResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Sets the logging configuration.
    pub fn log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// Builds the check.
    pub fn build(self) -> TimelinessCheck {
        TimelinessCheck {
            attributes: self.attributes,
            restrictions: self.restrictions,
            options: self.options,
            resolver: self
                .resolver
                .unwrap_or_else(|| Arc::new(DefaultResolver::new())),
            log_config: self.log_config,
        }
    }
}
