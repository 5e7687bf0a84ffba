//! Core validation types: records, checks, violations and reports.
//!
//! ## Overview
//!
//! - **[`Record`]**: the host record being validated, with pending and
//!   persisted values per attribute
//! - **[`TimelinessCheck`]**: one configuration (kind, attributes,
//!   restrictions, options) applied to a record
//! - **[`Validations`]**: the checks declared for a record type, run in order
//! - **[`Violation`]**: a single failure, keyed by [`ViolationKey`]
//! - **[`ValidationReport`]**: the violations of one validation pass
//!
//! ## Flow
//!
//! ```text
//! raw value ── nil/blank rules ── parse (strict) ── restrictions
//!                   │                   │                 │
//!                 blank          invalid_datetime   before/after/...
//! ```
//!
//! ## Example
//!
//! ```rust
//! use timeliness::core::{MemoryRecord, TimelinessCheck, Validations, ViolationKey};
//! use timeliness::restrictions::Operand;
//! use timeliness::temporal::Kind;
//!
//! let validations = Validations::builder("booking")
//!     .check(
//!         TimelinessCheck::datetime("checks_out_at")
//!             .after(Operand::field("checks_in_at"))
//!             .build(),
//!     )
//!     .build();
//!
//! let mut record = MemoryRecord::new()
//!     .declare("checks_in_at", Kind::DateTime)
//!     .declare("checks_out_at", Kind::DateTime)
//!     .with_value("checks_in_at", "2008-01-02 14:00")
//!     .with_value("checks_out_at", "2008-01-02 10:00");
//!
//! let report = validations.validate(&mut record);
//! assert!(report.has("checks_out_at", ViolationKey::After));
//! assert_eq!(
//!     report.on("checks_out_at"),
//!     vec!["must be after 2008-01-02 14:00:00"]
//! );
//! ```

mod check;
mod messages;
mod options;
mod record;
mod report;
mod validations;
mod violation;

pub use check::{TimelinessCheck, TimelinessCheckBuilder};
pub use messages::ErrorMessages;
pub use options::TimelinessOptions;
pub use record::{MemoryRecord, Record};
pub use report::{ErrorSink, ValidationReport};
pub use validations::{Validations, ValidationsBuilder};
pub use violation::{Violation, ViolationKey, PLACEHOLDER};
