//! Format registry for date, time and datetime values.
//!
//! The registry holds, per [`Kind`], an ordered list of compiled
//! [`FormatSpec`]s. Formats are tried in order and the first match wins, so
//! longer and more specific formats are listed before shorter ones that could
//! match a prefix of the same text.
//!
//! ## Format tokens
//!
//! | token  | meaning                           |
//! |--------|-----------------------------------|
//! | `yyyy` | four digit year                   |
//! | `yy`   | two digit year (< 30 is 20xx)     |
//! | `mmmm` | full month name                   |
//! | `mmm`  | abbreviated month name            |
//! | `mm`   | two digit month                   |
//! | `m`    | one or two digit month            |
//! | `dd`   | two digit day                     |
//! | `d`    | one or two digit day              |
//! | `hh`   | two digit hour                    |
//! | `h`    | one or two digit hour             |
//! | `nn`   | two digit minute                  |
//! | `ss`   | two digit second                  |
//! | `u`    | fraction of a second, 1-6 digits  |
//! | `ampm` | `am`/`pm` with optional dots      |
//! | space  | one or more whitespace characters |
//!
//! Every other character matches itself.
//!
//! ## Custom registries
//!
//! ```rust
//! use timeliness::formats::FormatRegistry;
//! use timeliness::temporal::Kind;
//!
//! # fn example() -> timeliness::error::Result<()> {
//! let registry = FormatRegistry::builder()
//!     .with_defaults()
//!     .prepend(Kind::Date, "dd/mm/yyyy")
//!     .build()?;
//!
//! assert_eq!(registry.patterns_for(Kind::Date)[0].format(), "dd/mm/yyyy");
//! # Ok(())
//! # }
//! ```

mod compiler;

pub use compiler::{Extractor, Field, FormatSpec, AMBIGUOUS_YEAR_THRESHOLD};

use crate::error::{Result, TimelinessError};
use crate::temporal::Kind;
use once_cell::sync::Lazy;
use tracing::debug;

/// Default time formats, most specific first.
pub const DEFAULT_TIME_FORMATS: &[&str] = &[
    "h:nn:ss.u",
    "h:nn:ssampm",
    "h:nnampm",
    "h.nnampm",
    "hampm",
    "h:nn:ss",
    "h:nn",
    "h.nn",
];

/// Default date formats, most specific first.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "yyyy-m-d",
    "yyyy/m/d",
    "m/d/yyyy",
    "d.m.yyyy",
    "d-m-yyyy",
    "d mmmm yyyy",
    "d mmm yyyy",
    "mmmm d yyyy",
    "mmm d yyyy",
    "m/d/yy",
    "d.m.yy",
];

/// Default datetime formats. The date formats are appended after these so a
/// bare date reads as midnight.
pub const DEFAULT_DATETIME_FORMATS: &[&str] = &[
    "yyyy-mm-ddTh:nn:ss.u",
    "yyyy-mm-dd h:nn:ss.u",
    "yyyy-mm-dd h:nn:ssampm",
    "yyyy-mm-dd h:nnampm",
    "yyyy-mm-ddTh:nn:ss",
    "yyyy-mm-dd h:nn:ss",
    "yyyy-mm-ddTh:nn",
    "yyyy-mm-dd h:nn",
    "yyyy/mm/dd h:nn:ss",
    "yyyy/mm/dd h:nn",
    "m/d/yyyy h:nn:ssampm",
    "m/d/yyyy h:nnampm",
    "m/d/yyyy h:nn:ss",
    "m/d/yyyy h:nn",
    "d.m.yyyy h:nn:ss",
    "d.m.yyyy h:nn",
];

static DEFAULT_REGISTRY: Lazy<FormatRegistry> = Lazy::new(|| {
    // The default format table is constant and covered by tests
    #[allow(clippy::expect_used)]
    FormatRegistry::builder()
        .with_defaults()
        .build()
        .expect("Default format table should compile")
});

/// Returns the formats of the process-wide default registry for `kind`.
pub fn patterns_for(kind: Kind) -> &'static [FormatSpec] {
    DEFAULT_REGISTRY.patterns_for(kind)
}

/// Ordered, immutable lists of compiled formats per kind.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    date: Vec<FormatSpec>,
    time: Vec<FormatSpec>,
    datetime: Vec<FormatSpec>,
}

impl FormatRegistry {
    /// Creates a builder for a custom registry.
    pub fn builder() -> FormatRegistryBuilder {
        FormatRegistryBuilder::default()
    }

    /// The process-wide registry built from the default format table.
    ///
    /// It is compiled on first use and shared read-only afterwards.
    pub fn global() -> &'static FormatRegistry {
        &DEFAULT_REGISTRY
    }

    /// Returns the ordered formats for `kind`.
    pub fn patterns_for(&self, kind: Kind) -> &[FormatSpec] {
        match kind {
            Kind::Date => &self.date,
            Kind::Time => &self.time,
            Kind::DateTime => &self.datetime,
        }
    }
}

/// Builder for [`FormatRegistry`].
///
/// Format strings are only compiled by [`FormatRegistryBuilder::build`], which
/// reports the first one that fails.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistryBuilder {
    date: Vec<String>,
    time: Vec<String>,
    datetime: Vec<String>,
}

impl FormatRegistryBuilder {
    fn list_mut(&mut self, kind: Kind) -> &mut Vec<String> {
        match kind {
            Kind::Date => &mut self.date,
            Kind::Time => &mut self.time,
            Kind::DateTime => &mut self.datetime,
        }
    }

    /// Adds the default format table.
    pub fn with_defaults(mut self) -> Self {
        self.time.extend(DEFAULT_TIME_FORMATS.iter().map(|f| f.to_string()));
        self.date.extend(DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()));
        self.datetime.extend(
            DEFAULT_DATETIME_FORMATS
                .iter()
                .chain(DEFAULT_DATE_FORMATS)
                .map(|f| f.to_string()),
        );
        self
    }

    /// Appends a format for `kind`; it is tried after the existing ones.
    pub fn format(mut self, kind: Kind, format: impl Into<String>) -> Self {
        self.list_mut(kind).push(format.into());
        self
    }

    /// Inserts a format for `kind` ahead of the existing ones.
    pub fn prepend(mut self, kind: Kind, format: impl Into<String>) -> Self {
        self.list_mut(kind).insert(0, format.into());
        self
    }

    /// Removes a format for `kind` if present.
    pub fn remove(mut self, kind: Kind, format: &str) -> Self {
        self.list_mut(kind).retain(|f| f != format);
        self
    }

    /// Compiles every format.
    ///
    /// Date formats must capture a year and time formats an hour; a datetime
    /// format needs at least a year.
    pub fn build(self) -> Result<FormatRegistry> {
        let registry = FormatRegistry {
            date: compile_all(Kind::Date, &self.date)?,
            time: compile_all(Kind::Time, &self.time)?,
            datetime: compile_all(Kind::DateTime, &self.datetime)?,
        };
        debug!(
            date_formats = registry.date.len(),
            time_formats = registry.time.len(),
            datetime_formats = registry.datetime.len(),
            "Compiled format registry"
        );
        Ok(registry)
    }
}

fn compile_all(kind: Kind, formats: &[String]) -> Result<Vec<FormatSpec>> {
    formats
        .iter()
        .map(|format| {
            let spec = FormatSpec::compile(format)?;
            let fits = match kind {
                Kind::Date | Kind::DateTime => spec.has_date(),
                Kind::Time => spec.has_time(),
            };
            if fits {
                Ok(spec)
            } else {
                Err(TimelinessError::invalid_format_spec(
                    format.as_str(),
                    format!("not usable as a {kind} format"),
                ))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats(kind: Kind) -> Vec<&'static str> {
        patterns_for(kind).iter().map(|spec| spec.format()).collect()
    }

    #[test]
    fn test_default_registry_compiles() {
        assert_eq!(formats(Kind::Time).len(), DEFAULT_TIME_FORMATS.len());
        assert_eq!(formats(Kind::Date).len(), DEFAULT_DATE_FORMATS.len());
        assert_eq!(
            formats(Kind::DateTime).len(),
            DEFAULT_DATETIME_FORMATS.len() + DEFAULT_DATE_FORMATS.len()
        );
    }

    #[test]
    fn test_datetime_formats_precede_date_formats() {
        let datetime = formats(Kind::DateTime);
        assert_eq!(datetime[0], "yyyy-mm-ddTh:nn:ss.u");
        assert_eq!(*datetime.last().unwrap(), "d.m.yy");
    }

    #[test]
    fn test_meridian_formats_precede_plain_time() {
        let time = formats(Kind::Time);
        let meridian = time.iter().position(|f| *f == "h:nnampm").unwrap();
        let plain = time.iter().position(|f| *f == "h:nn").unwrap();
        assert!(meridian < plain);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(FormatRegistry::global(), FormatRegistry::global()));
    }

    #[test]
    fn test_builder_prepend_and_remove() {
        let registry = FormatRegistry::builder()
            .with_defaults()
            .remove(Kind::Date, "m/d/yyyy")
            .prepend(Kind::Date, "dd/mm/yyyy")
            .build()
            .unwrap();

        let date: Vec<&str> = registry
            .patterns_for(Kind::Date)
            .iter()
            .map(|spec| spec.format())
            .collect();
        assert_eq!(date[0], "dd/mm/yyyy");
        assert!(!date.contains(&"m/d/yyyy"));
    }

    #[test]
    fn test_builder_rejects_mismatched_kind() {
        let result = FormatRegistry::builder()
            .format(Kind::Date, "hh:nn")
            .build();
        assert!(matches!(
            result,
            Err(TimelinessError::InvalidFormatSpec { .. })
        ));

        let result = FormatRegistry::builder()
            .format(Kind::Time, "yyyy-mm-dd")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_registry() {
        let registry = FormatRegistry::builder().build().unwrap();
        for kind in Kind::ALL {
            assert!(registry.patterns_for(kind).is_empty());
        }
    }
}
