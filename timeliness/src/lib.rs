//! # Timeliness - date and time validation for records
//!
//! Timeliness validates that record attributes hold real dates, times or
//! datetimes and that those values satisfy ordering restrictions such as
//! "before today" or "on or after the start date".
//!
//! ## Quick Start
//!
//! ```rust
//! use timeliness::prelude::*;
//!
//! let validations = Validations::builder("person")
//!     .check(
//!         TimelinessCheck::date("birth_date")
//!             .on_or_before(Operand::today())
//!             .after("1900-01-01")
//!             .build(),
//!     )
//!     .check(TimelinessCheck::time("birth_time").allow_nil(true).build())
//!     .build();
//!
//! let mut record = MemoryRecord::new()
//!     .declare("birth_date", Kind::Date)
//!     .declare("birth_time", Kind::Time)
//!     .with_value("birth_date", "1899-12-31");
//!
//! let report = validations.validate(&mut record);
//! assert_eq!(report.on("birth_date"), vec!["must be after 1900-01-01"]);
//! assert!(report.on("birth_time").is_empty());
//! ```
//!
//! ## How values are read
//!
//! Text is matched against an ordered list of formats for the requested
//! [`Kind`](temporal::Kind) (see [`formats`]). The first format that matches
//! the whole trimmed input wins; its captures become a seven-slot
//! [`ComponentTuple`](temporal::ComponentTuple) which is then checked against
//! the calendar. `1980-02-30` therefore matches `yyyy-m-d` but is still
//! rejected.
//!
//! Restrictions compare at the attribute's granularity: dates ignore the time
//! of day, times are placed on the dummy date 2000-01-01, and datetimes
//! compare exactly.
//!
//! ## Architecture
//!
//! - **`formats`**: format token compiler and the format registry
//! - **`parser`**: text to component tuple to temporal value, and the
//!   [`TemporalResolver`](parser::TemporalResolver) seam
//! - **`restrictions`**: operands, restriction kinds and their evaluator
//! - **`core`**: records, checks, violations and reports
//! - **`formatters`**: human and JSON rendering of reports
//! - **`logging`**: log verbosity and subscriber setup

pub mod core;
pub mod error;
pub mod formats;
pub mod formatters;
pub mod logging;
pub mod parser;
pub mod prelude;
pub mod restrictions;
pub mod temporal;
