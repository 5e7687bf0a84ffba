//! The record abstraction validations run against.

use crate::error::BoxError;
use crate::parser::resolve;
use crate::temporal::{Kind, RawValue, Temporal};
use std::collections::BTreeMap;

/// A host record whose attributes are being validated.
///
/// The host distinguishes the value assigned during the current pass (the
/// pending value) from the last committed one. Field-reference restrictions
/// always read the pending value through [`Record::current_value`].
pub trait Record {
    /// The value as assigned, before any type casting.
    fn raw_value(&self, attribute: &str) -> Option<RawValue>;

    /// The pending, type-cast value of an attribute.
    ///
    /// Returns `Ok(None)` for an empty attribute and `Err` when the attribute
    /// cannot be read at all.
    fn current_value(&self, attribute: &str) -> std::result::Result<Option<Temporal>, BoxError>;

    /// The last committed value of an attribute.
    fn persisted_value(&self, attribute: &str) -> Option<Temporal> {
        let _ = attribute;
        None
    }

    /// Clears an attribute whose raw value failed to parse.
    fn reset_value(&mut self, attribute: &str) {
        let _ = attribute;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Attribute {
    kind: Option<Kind>,
    pending: Option<RawValue>,
    persisted: Option<RawValue>,
}

impl Attribute {
    fn cast(&self, raw: Option<&RawValue>) -> Option<Temporal> {
        resolve(raw?, self.kind.unwrap_or(Kind::DateTime), true)
    }
}

/// An in-memory [`Record`] keyed by attribute name.
///
/// Text values are type cast at the attribute's declared kind (datetime when
/// undeclared); a pending value that does not parse reads as empty.
///
/// # Examples
///
/// ```rust
/// use timeliness::core::{MemoryRecord, Record};
/// use timeliness::temporal::Kind;
///
/// let mut record = MemoryRecord::new().declare("birth_date", Kind::Date);
/// record.set("birth_date", "1980-01-31");
///
/// assert!(record.current_value("birth_date").unwrap().is_some());
/// assert!(record.persisted_value("birth_date").is_none());
///
/// record.commit();
/// assert!(record.persisted_value("birth_date").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRecord {
    attributes: BTreeMap<String, Attribute>,
}

impl MemoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an attribute and the kind it is type cast to.
    pub fn declare(mut self, attribute: impl Into<String>, kind: Kind) -> Self {
        self.attributes.entry(attribute.into()).or_default().kind = Some(kind);
        self
    }

    /// Builder form of [`MemoryRecord::set`].
    pub fn with_value(mut self, attribute: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Assigns a pending value.
    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<RawValue>) {
        self.attributes.entry(attribute.into()).or_default().pending = Some(value.into());
    }

    /// Clears the pending value of an attribute.
    pub fn clear(&mut self, attribute: &str) {
        if let Some(attr) = self.attributes.get_mut(attribute) {
            attr.pending = None;
        }
    }

    /// Commits every pending value.
    pub fn commit(&mut self) {
        for attr in self.attributes.values_mut() {
            attr.persisted = attr.pending.clone();
        }
    }

    /// Returns true if the attribute was declared or assigned.
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }
}

impl Record for MemoryRecord {
    fn raw_value(&self, attribute: &str) -> Option<RawValue> {
        self.attributes.get(attribute)?.pending.clone()
    }

    fn current_value(&self, attribute: &str) -> std::result::Result<Option<Temporal>, BoxError> {
        let attr = self
            .attributes
            .get(attribute)
            .ok_or_else(|| format!("unknown attribute '{attribute}'"))?;
        Ok(attr.cast(attr.pending.as_ref()))
    }

    fn persisted_value(&self, attribute: &str) -> Option<Temporal> {
        let attr = self.attributes.get(attribute)?;
        attr.cast(attr.persisted.as_ref())
    }

    fn reset_value(&mut self, attribute: &str) {
        self.clear(attribute);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_current_value_casts_at_declared_kind() {
        let record = MemoryRecord::new()
            .declare("birth_time", Kind::Time)
            .with_value("birth_time", "23:59");

        assert_eq!(
            record.current_value("birth_time").unwrap(),
            Some(Temporal::Time(NaiveTime::from_hms_opt(23, 59, 0).unwrap()))
        );
    }

    #[test]
    fn test_undeclared_attribute_defaults_to_datetime() {
        let record = MemoryRecord::new().with_value("seen_at", "2008-01-02 12:00:00");
        assert_eq!(
            record.current_value("seen_at").unwrap().map(|v| v.kind()),
            Some(Kind::DateTime)
        );
    }

    #[test]
    fn test_unparsable_pending_value_reads_as_empty() {
        let record = MemoryRecord::new()
            .declare("birth_date", Kind::Date)
            .with_value("birth_date", "1980-02-30");

        assert_eq!(record.current_value("birth_date").unwrap(), None);
        assert_eq!(
            record.raw_value("birth_date"),
            Some(RawValue::from("1980-02-30"))
        );
    }

    #[test]
    fn test_unknown_attribute_is_an_error() {
        let record = MemoryRecord::new();
        let err = record.current_value("nope").unwrap_err();
        assert_eq!(err.to_string(), "unknown attribute 'nope'");
        assert_eq!(record.raw_value("nope"), None);
    }

    #[test]
    fn test_pending_and_persisted_are_distinct() {
        let mut record = MemoryRecord::new()
            .declare("due_on", Kind::Date)
            .with_value("due_on", "2008-01-01");
        record.commit();
        record.set("due_on", "2008-02-01");

        let date = |m| Temporal::Date(NaiveDate::from_ymd_opt(2008, m, 1).unwrap());
        assert_eq!(record.current_value("due_on").unwrap(), Some(date(2)));
        assert_eq!(record.persisted_value("due_on"), Some(date(1)));
    }

    #[test]
    fn test_reset_value_clears_pending_only() {
        let mut record = MemoryRecord::new()
            .declare("due_on", Kind::Date)
            .with_value("due_on", "2008-01-01");
        record.commit();
        record.reset_value("due_on");

        assert_eq!(record.raw_value("due_on"), None);
        assert!(record.persisted_value("due_on").is_some());
        assert!(record.has_attribute("due_on"));
    }
}
