//! Compilation of format strings into matchers and extractors.
//!
//! A format string such as `"yyyy-mm-dd hh:nn:ss"` is tokenized into field
//! tokens and literal characters. Each field token becomes one capture group in
//! the compiled regex, and the ordered list of fields becomes the extractor that
//! maps captured groups back into a [`ComponentTuple`].

use crate::error::{Result, TimelinessError};
use crate::temporal::{ComponentTuple, DUMMY_DATE};
use chrono::Datelike;
use regex::{Captures, Regex, RegexBuilder};

/// Two-digit years below this value land in the 2000s, the rest in the 1900s.
pub const AMBIGUOUS_YEAR_THRESHOLD: i64 = 30;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A field captured by a format token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    ShortYear,
    Month,
    MonthName,
    Day,
    Hour,
    Minute,
    Second,
    Fraction,
    Meridian,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Field(Field, &'static str),
    Whitespace,
    Literal(char),
}

// Longest tokens first so that `yyyy` never reads as two `yy`.
const FIELD_TOKENS: [(&str, Field, &str); 14] = [
    ("yyyy", Field::Year, r"(\d{4})"),
    ("yy", Field::ShortYear, r"(\d{2})"),
    (
        "mmmm",
        Field::MonthName,
        "(january|february|march|april|may|june|july|august|september|october|november|december)",
    ),
    (
        "mmm",
        Field::MonthName,
        "(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)",
    ),
    ("mm", Field::Month, r"(\d{2})"),
    ("m", Field::Month, r"(\d{1,2})"),
    ("dd", Field::Day, r"(\d{2})"),
    ("d", Field::Day, r"(\d{1,2})"),
    ("hh", Field::Hour, r"(\d{2})"),
    ("h", Field::Hour, r"(\d{1,2})"),
    ("nn", Field::Minute, r"(\d{2})"),
    ("ss", Field::Second, r"(\d{2})"),
    ("u", Field::Fraction, r"(\d{1,6})"),
    ("ampm", Field::Meridian, r"\s*([ap])\.?m\.?"),
];

fn tokenize(format: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = format;

    while let Some(c) = rest.chars().next() {
        if c == ' ' {
            tokens.push(Token::Whitespace);
            rest = &rest[1..];
            continue;
        }

        if let Some((token, field, pattern)) = FIELD_TOKENS
            .iter()
            .find(|(token, _, _)| rest.starts_with(token))
        {
            tokens.push(Token::Field(*field, *pattern));
            rest = &rest[token.len()..];
            continue;
        }

        if matches!(c, 'y' | 'n' | 's') {
            return Err(TimelinessError::invalid_format_spec(
                format,
                format!("dangling '{c}' is not a complete token"),
            ));
        }

        tokens.push(Token::Literal(c));
        rest = &rest[c.len_utf8()..];
    }

    Ok(tokens)
}

/// Maps captured groups to a component tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extractor {
    fields: Vec<Field>,
}

impl Extractor {
    /// The fields captured by this extractor, in group order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn has(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    /// Builds a tuple from the captured groups, one group per field.
    ///
    /// Absent groups fall back to neutral values: the dummy date for date
    /// slots, zero for time slots, and the 24-hour clock when no meridian was
    /// captured. Returns `None` only when a captured number cannot be read.
    pub fn extract(&self, groups: &[Option<&str>]) -> Option<ComponentTuple> {
        let mut tuple = ComponentTuple::new(
            i64::from(DUMMY_DATE.year()),
            i64::from(DUMMY_DATE.month()),
            i64::from(DUMMY_DATE.day()),
            0,
            0,
            0,
            0,
        );
        let mut meridian = None;

        for (field, group) in self.fields.iter().zip(groups) {
            let Some(text) = group else { continue };
            match field {
                Field::Year => tuple.0[ComponentTuple::YEAR] = text.parse().ok()?,
                Field::ShortYear => tuple.0[ComponentTuple::YEAR] = expand_year(text.parse().ok()?),
                Field::Month => tuple.0[ComponentTuple::MONTH] = text.parse().ok()?,
                Field::MonthName => tuple.0[ComponentTuple::MONTH] = month_from_name(text)?,
                Field::Day => tuple.0[ComponentTuple::DAY] = text.parse().ok()?,
                Field::Hour => tuple.0[ComponentTuple::HOUR] = text.parse().ok()?,
                Field::Minute => tuple.0[ComponentTuple::MINUTE] = text.parse().ok()?,
                Field::Second => tuple.0[ComponentTuple::SECOND] = text.parse().ok()?,
                Field::Fraction => tuple.0[ComponentTuple::FRACTION] = microseconds(text)?,
                Field::Meridian => meridian = text.chars().next().map(|c| c.to_ascii_lowercase()),
            }
        }

        if let Some(meridian) = meridian {
            tuple.0[ComponentTuple::HOUR] = twelve_hour(tuple.hour(), meridian == 'p');
        }

        Some(tuple)
    }
}

fn expand_year(year: i64) -> i64 {
    if year < AMBIGUOUS_YEAR_THRESHOLD {
        year + 2000
    } else {
        year + 1900
    }
}

fn month_from_name(name: &str) -> Option<i64> {
    let name = name.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|month| month.starts_with(&name))
        .map(|index| index as i64 + 1)
}

// ".5" is half a second: right-pad to six digits.
fn microseconds(digits: &str) -> Option<i64> {
    let value: i64 = digits.parse().ok()?;
    let scale = 6u32.checked_sub(digits.len() as u32)?;
    Some(value * 10i64.pow(scale))
}

// Hours outside 1..=12 are rejected by yielding an out-of-range hour.
fn twelve_hour(hour: i64, pm: bool) -> i64 {
    match (hour, pm) {
        (1..=11, true) => hour + 12,
        (12, false) => 0,
        (1..=12, _) => hour,
        _ => -1,
    }
}

/// A compiled format: matcher plus extractor.
///
/// `FormatSpec` is immutable once compiled and can be shared freely across
/// threads.
#[derive(Debug, Clone)]
pub struct FormatSpec {
    format: String,
    matcher: Regex,
    bounded_matcher: Regex,
    extractor: Extractor,
}

impl FormatSpec {
    /// Compiles a format string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use timeliness::formats::FormatSpec;
    ///
    /// let spec = FormatSpec::compile("yyyy-mm-dd").unwrap();
    /// assert!(spec.find("2008-01-02", true).is_some());
    /// assert!(spec.find("on 2008-01-02", true).is_none());
    /// assert!(spec.find("on 2008-01-02", false).is_some());
    /// ```
    pub fn compile(format: &str) -> Result<Self> {
        let tokens = tokenize(format)?;

        let mut pattern = String::new();
        let mut fields = Vec::new();
        for token in &tokens {
            match token {
                Token::Field(field, regex) => {
                    pattern.push_str(regex);
                    fields.push(*field);
                }
                Token::Whitespace => pattern.push_str(r"\s+"),
                Token::Literal(c) => pattern.push_str(&regex::escape(&c.to_string())),
            }
        }

        if fields.is_empty() {
            return Err(TimelinessError::invalid_format_spec(
                format,
                "format contains no date or time fields",
            ));
        }

        let build = |source: &str| {
            RegexBuilder::new(source)
                .case_insensitive(true)
                .build()
                .map_err(|e| TimelinessError::invalid_format_spec(format, e.to_string()))
        };

        Ok(Self {
            format: format.to_string(),
            matcher: build(&pattern)?,
            bounded_matcher: build(&format!("^(?:{pattern})$"))?,
            extractor: Extractor { fields },
        })
    }

    /// The format string this spec was compiled from.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The extractor for this format.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Returns true if the format captures any date field.
    pub fn has_date(&self) -> bool {
        self.extractor.has(Field::Year) || self.extractor.has(Field::ShortYear)
    }

    /// Returns true if the format captures the hour.
    pub fn has_time(&self) -> bool {
        self.extractor.has(Field::Hour)
    }

    /// Matches `text`; a bounded match must span the whole text.
    pub fn find<'t>(&self, text: &'t str, bounded: bool) -> Option<Captures<'t>> {
        if bounded {
            self.bounded_matcher.captures(text)
        } else {
            self.matcher.captures(text)
        }
    }

    /// Runs the extractor over a match produced by [`FormatSpec::find`].
    pub fn extract(&self, captures: &Captures<'_>) -> Option<ComponentTuple> {
        let groups: Vec<Option<&str>> = (1..captures.len())
            .map(|i| captures.get(i).map(|m| m.as_str()))
            .collect();
        self.extractor.extract(&groups)
    }
}
