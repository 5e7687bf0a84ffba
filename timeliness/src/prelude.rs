//! Commonly used types and traits.

pub use crate::core::{
    ErrorMessages, ErrorSink, MemoryRecord, Record, TimelinessCheck, TimelinessOptions,
    ValidationReport, Validations, Violation, ViolationKey,
};
pub use crate::error::{ErrorContext, Result, TimelinessError};
pub use crate::formatters::{FormatterConfig, ReportFormatter};
pub use crate::logging::LogConfig;
pub use crate::parser::{DefaultResolver, TemporalResolver};
pub use crate::restrictions::{Operand, RestrictionKind, RestrictionSpec};
pub use crate::temporal::{Kind, RawValue, Temporal};
