//! Restriction operands: the values a restriction compares against.

use crate::core::Record;
use crate::error::BoxError;
use crate::parser::TemporalResolver;
use crate::temporal::{Kind, RawValue, Temporal};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::sync::Arc;

/// Signature of a computed operand. It receives the record under validation.
pub type ComputeFn =
    dyn Fn(&dyn Record) -> std::result::Result<Option<Temporal>, BoxError> + Send + Sync;

/// The comparison target of a restriction.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use timeliness::restrictions::Operand;
///
/// let literal = Operand::from(NaiveDate::from_ymd_opt(2008, 1, 2).unwrap());
/// let sibling = Operand::field("starts_on");
/// let text = Operand::from("23:00");
/// let now = Operand::now();
/// # let _ = (literal, sibling, text, now);
/// ```
#[derive(Clone)]
pub enum Operand {
    /// A concrete temporal value
    Literal(Temporal),
    /// The pending value of another attribute on the same record
    Field(String),
    /// A value computed at validation time
    Computed(Arc<ComputeFn>),
    /// Text, parsed at the restricted attribute's kind without bounding
    Text(String),
}

impl Operand {
    /// A reference to another attribute on the same record.
    pub fn field(attribute: impl Into<String>) -> Self {
        Operand::Field(attribute.into())
    }

    /// A value computed from the record at validation time.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&dyn Record) -> std::result::Result<Option<Temporal>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Operand::Computed(Arc::new(f))
    }

    /// The local wall-clock time when the restriction is evaluated.
    pub fn now() -> Self {
        Self::computed(|_| Ok(Some(Temporal::DateTime(Local::now().naive_local()))))
    }

    /// The local calendar date when the restriction is evaluated.
    pub fn today() -> Self {
        Self::computed(|_| Ok(Some(Temporal::Date(Local::now().date_naive()))))
    }

    /// Resolves the operand to a value.
    ///
    /// `Ok(None)` means there is nothing to compare against (an empty field or
    /// unparsable text). `Err` means the host failed while producing the value.
    pub fn resolve(
        &self,
        kind: Kind,
        record: &dyn Record,
        resolver: &dyn TemporalResolver,
    ) -> std::result::Result<Option<Temporal>, BoxError> {
        match self {
            Operand::Literal(value) => Ok(Some(*value)),
            Operand::Field(attribute) => record.current_value(attribute),
            Operand::Computed(compute) => compute(record),
            Operand::Text(text) => Ok(resolver.resolve(&RawValue::Text(text.clone()), kind, false)),
        }
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Operand::Field(attribute) => f.debug_tuple("Field").field(attribute).finish(),
            Operand::Computed(_) => f.write_str("Computed(..)"),
            Operand::Text(text) => f.debug_tuple("Text").field(text).finish(),
        }
    }
}

impl From<Temporal> for Operand {
    fn from(value: Temporal) -> Self {
        Operand::Literal(value)
    }
}

impl From<NaiveDate> for Operand {
    fn from(date: NaiveDate) -> Self {
        Operand::Literal(date.into())
    }
}

impl From<NaiveTime> for Operand {
    fn from(time: NaiveTime) -> Self {
        Operand::Literal(time.into())
    }
}

impl From<NaiveDateTime> for Operand {
    fn from(datetime: NaiveDateTime) -> Self {
        Operand::Literal(datetime.into())
    }
}

impl From<&str> for Operand {
    fn from(text: &str) -> Self {
        Operand::Text(text.to_string())
    }
}

impl From<String> for Operand {
    fn from(text: String) -> Self {
        Operand::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryRecord;
    use crate::parser::DefaultResolver;

    #[test]
    fn test_literal_resolves_to_itself() {
        let date = NaiveDate::from_ymd_opt(2008, 1, 2).unwrap();
        let record = MemoryRecord::new();
        let resolved = Operand::from(date)
            .resolve(Kind::DateTime, &record, &DefaultResolver::new())
            .unwrap();
        assert_eq!(resolved, Some(Temporal::Date(date)));
    }

    #[test]
    fn test_text_is_parsed_unbounded_at_kind() {
        let record = MemoryRecord::new();
        let resolved = Operand::from("before 23:00")
            .resolve(Kind::Time, &record, &DefaultResolver::new())
            .unwrap();
        assert_eq!(
            resolved,
            Some(Temporal::Time(NaiveTime::from_hms_opt(23, 0, 0).unwrap()))
        );
    }

    #[test]
    fn test_unparsable_text_resolves_to_none() {
        let record = MemoryRecord::new();
        let resolved = Operand::from("whenever")
            .resolve(Kind::Date, &record, &DefaultResolver::new())
            .unwrap();
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_computed_receives_record() {
        let record = MemoryRecord::new()
            .declare("starts_on", Kind::Date)
            .with_value("starts_on", "2008-01-02");
        let operand = Operand::computed(|record| record.current_value("starts_on"));

        let resolved = operand
            .resolve(Kind::Date, &record, &DefaultResolver::new())
            .unwrap();
        assert_eq!(
            resolved,
            Some(Temporal::Date(NaiveDate::from_ymd_opt(2008, 1, 2).unwrap()))
        );
    }

    #[test]
    fn test_computed_errors_propagate() {
        let record = MemoryRecord::new();
        let operand = Operand::computed(|_| Err("clock unavailable".into()));
        assert!(operand
            .resolve(Kind::Date, &record, &DefaultResolver::new())
            .is_err());
    }

    #[test]
    fn test_debug_hides_closure() {
        assert_eq!(format!("{:?}", Operand::now()), "Computed(..)");
        assert_eq!(format!("{:?}", Operand::field("a")), "Field(\"a\")");
    }
}
