//! Temporal parser: raw text to component tuple to temporal value.
//!
//! Parsing happens in two steps. [`parse`] finds the first registered format
//! that matches the trimmed text and extracts a [`ComponentTuple`];
//! [`construct`] normalizes the tuple for the requested [`Kind`] and builds a
//! [`Temporal`], failing on impossible calendar dates or out-of-range times.
//! [`resolve`] combines both and collapses every failure to `None`.
//!
//! # Examples
//!
//! ```rust
//! use timeliness::parser::resolve;
//! use timeliness::temporal::{Kind, RawValue};
//!
//! let value = resolve(&RawValue::from("1980-02-29"), Kind::Date, true);
//! assert!(value.is_some());
//!
//! // 1981 is not a leap year
//! assert!(resolve(&RawValue::from("1981-02-29"), Kind::Date, true).is_none());
//!
//! // Bounded matching rejects trailing text
//! assert!(resolve(&RawValue::from("23:00 sharp"), Kind::Time, true).is_none());
//! assert!(resolve(&RawValue::from("23:00 sharp"), Kind::Time, false).is_some());
//! ```

use crate::error::{Result, TimelinessError};
use crate::formats::FormatRegistry;
use crate::temporal::{ComponentTuple, Kind, RawValue, Temporal};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, trace};

/// Resolves raw values into temporal values.
///
/// This is the seam for replacing the parsing algorithm: any implementation
/// is acceptable as long as it returns `None` for invalid input and a
/// constructed value of the requested kind's semantics otherwise.
pub trait TemporalResolver: Debug + Send + Sync {
    /// Resolves `raw` as a value of `kind`.
    ///
    /// `strict` requires the whole (trimmed) text to be consumed by a format.
    fn resolve(&self, raw: &RawValue, kind: Kind, strict: bool) -> Option<Temporal>;
}

#[derive(Debug, Clone)]
enum RegistrySource {
    Global,
    Custom(Arc<FormatRegistry>),
}

/// The built-in resolver, backed by a [`FormatRegistry`].
#[derive(Debug, Clone)]
pub struct DefaultResolver {
    source: RegistrySource,
}

impl Default for DefaultResolver {
    fn default() -> Self {
        Self {
            source: RegistrySource::Global,
        }
    }
}

impl DefaultResolver {
    /// Creates a resolver over the process-wide default registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver over a custom registry.
    pub fn with_registry(registry: Arc<FormatRegistry>) -> Self {
        Self {
            source: RegistrySource::Custom(registry),
        }
    }

    /// The registry this resolver matches against.
    pub fn registry(&self) -> &FormatRegistry {
        match &self.source {
            RegistrySource::Global => FormatRegistry::global(),
            RegistrySource::Custom(registry) => registry.as_ref(),
        }
    }

    /// Resolves `raw`, reporting why resolution failed.
    pub fn try_resolve(&self, raw: &RawValue, kind: Kind, strict: bool) -> Result<Temporal> {
        match raw {
            RawValue::Native(value) => Ok(*value),
            RawValue::Text(text) => {
                let tuple = parse_with(self.registry(), text, kind, strict).ok_or_else(|| {
                    TimelinessError::InvalidFormat {
                        kind,
                        value: text.trim().to_string(),
                    }
                })?;
                construct(tuple, kind)
            }
        }
    }
}

impl TemporalResolver for DefaultResolver {
    fn resolve(&self, raw: &RawValue, kind: Kind, strict: bool) -> Option<Temporal> {
        match self.try_resolve(raw, kind, strict) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(kind = %kind, strict, error = %e, "Value did not resolve");
                None
            }
        }
    }
}

/// Extracts a component tuple from `raw_text` using the default registry.
///
/// Returns `None` when no format qualifies; that is an expected outcome, not
/// an error.
pub fn parse(raw_text: &str, kind: Kind, bounded: bool) -> Option<ComponentTuple> {
    parse_with(FormatRegistry::global(), raw_text, kind, bounded)
}

/// Extracts a component tuple from `raw_text` using `registry`.
pub fn parse_with(
    registry: &FormatRegistry,
    raw_text: &str,
    kind: Kind,
    bounded: bool,
) -> Option<ComponentTuple> {
    let text = raw_text.trim();

    for spec in registry.patterns_for(kind) {
        if let Some(captures) = spec.find(text, bounded) {
            trace!(format = spec.format(), kind = %kind, "Matched format");
            return spec.extract(&captures);
        }
    }

    None
}

/// Builds a temporal value from a tuple, normalized for `kind`.
///
/// * time: the date slots are replaced by the dummy date and only the time
///   of day is validated;
/// * date: the time slots are zeroed and the calendar date is validated,
///   including days per month and leap years;
/// * datetime: both halves must be valid.
pub fn construct(tuple: ComponentTuple, kind: Kind) -> Result<Temporal> {
    let normalized = tuple.normalized(kind);
    let invalid = || TimelinessError::InvalidCalendar {
        kind,
        components: normalized.0,
    };

    match kind {
        Kind::Time => normalized.to_time().map(Temporal::Time).ok_or_else(invalid),
        Kind::Date => normalized.to_date().map(Temporal::Date).ok_or_else(invalid),
        Kind::DateTime => {
            let date = normalized.to_date().ok_or_else(invalid)?;
            let time = normalized.to_time().ok_or_else(invalid)?;
            Ok(Temporal::DateTime(date.and_time(time)))
        }
    }
}

/// Resolves `raw_value` with the default resolver; every failure is `None`.
pub fn resolve(raw_value: &RawValue, kind: Kind, strict: bool) -> Option<Temporal> {
    DefaultResolver::default().resolve(raw_value, kind, strict)
}
