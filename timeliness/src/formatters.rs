//! Rendering of validation reports.
//!
//! # Examples
//!
//! ```rust
//! use timeliness::core::{ErrorSink, ValidationReport, Violation, ViolationKey};
//! use timeliness::formatters::{HumanFormatter, JsonFormatter, ReportFormatter};
//!
//! let mut report = ValidationReport::new();
//! report.add(Violation::new("birth_date", ViolationKey::Blank, "can't be blank", None));
//!
//! let text = HumanFormatter::new().format(&report).unwrap();
//! assert!(text.contains("birth_date can't be blank"));
//!
//! let json = JsonFormatter::new().with_pretty(false).format(&report).unwrap();
//! assert!(json.contains("\"key\":\"blank\""));
//! ```

use crate::core::{ValidationReport, Violation};
use crate::error::Result;
use serde::Serialize;
use std::fmt::Write;

/// Options shared by the report formatters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Maximum number of violations to render (`None` for all)
    pub max_violations: Option<usize>,
    /// Whether to use ANSI colors (human formatter only)
    pub use_colors: bool,
    /// Whether to group violations under their attribute
    pub group_by_attribute: bool,
}

impl FormatterConfig {
    /// Settings for CI logs: capped and uncolored.
    pub fn ci() -> Self {
        Self {
            max_violations: Some(50),
            use_colors: false,
            group_by_attribute: true,
        }
    }

    pub fn with_max_violations(mut self, max: usize) -> Self {
        self.max_violations = Some(max);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_grouping(mut self, group: bool) -> Self {
        self.group_by_attribute = group;
        self
    }

    fn visible<'a>(&self, report: &'a ValidationReport) -> &'a [Violation] {
        let shown = self
            .max_violations
            .map_or(report.violations.len(), |max| max.min(report.violations.len()));
        &report.violations[..shown]
    }
}

/// Turns a [`ValidationReport`] into text.
pub trait ReportFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String>;
}

/// One line per violation, `<attribute> <message>`.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.config.use_colors {
            format!("\x1b[{color}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        let mut output = String::new();

        if report.is_valid() {
            let _ = writeln!(output, "{}", self.paint("Validation passed", "32"));
            return Ok(output);
        }

        let _ = writeln!(
            output,
            "{} ({} violation{})",
            self.paint("Validation failed", "31"),
            report.len(),
            if report.len() == 1 { "" } else { "s" }
        );

        let visible = self.config.visible(report);
        if self.config.group_by_attribute {
            for attribute in report.attributes() {
                let messages: Vec<String> = visible
                    .iter()
                    .filter(|v| v.attribute == attribute)
                    .map(Violation::message)
                    .collect();
                if messages.is_empty() {
                    continue;
                }
                let _ = writeln!(output, "  {attribute}:");
                for message in messages {
                    let _ = writeln!(output, "    - {message}");
                }
            }
        } else {
            for violation in visible {
                let _ = writeln!(output, "  - {violation}");
            }
        }

        let hidden = report.len() - visible.len();
        if hidden > 0 {
            let _ = writeln!(output, "  ... {hidden} more not shown");
        }

        Ok(output)
    }
}

#[derive(Serialize)]
struct JsonViolation<'a> {
    attribute: &'a str,
    key: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    valid: bool,
    total: usize,
    violations: Vec<JsonViolation<'a>>,
}

/// Renders a report as JSON with rendered messages.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        let document = JsonReport {
            valid: report.is_valid(),
            total: report.len(),
            violations: self
                .config
                .visible(report)
                .iter()
                .map(|violation| JsonViolation {
                    attribute: &violation.attribute,
                    key: violation.key.as_str(),
                    message: violation.message(),
                    parameter: violation.parameter.as_deref(),
                })
                .collect(),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(json)
    }
}
