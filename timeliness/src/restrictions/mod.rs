//! Ordering restrictions on parsed temporal values.
//!
//! A [`RestrictionSpec`] maps each [`RestrictionKind`] to an [`Operand`]. The
//! [`RestrictionEvaluator`] resolves every operand, converts both sides to the
//! comparison granularity of the attribute's [`Kind`], and reports a
//! [`Violation`] for each predicate that does not hold.
//!
//! # Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use timeliness::core::{ErrorMessages, MemoryRecord};
//! use timeliness::parser::DefaultResolver;
//! use timeliness::restrictions::{RestrictionEvaluator, RestrictionSpec};
//! use timeliness::temporal::{Kind, Temporal};
//!
//! let bound = NaiveDate::from_ymd_opt(2008, 1, 2).unwrap();
//! let restrictions = RestrictionSpec::new().before(bound).on_or_after("2008-01-01");
//!
//! let resolver = DefaultResolver::new();
//! let messages = ErrorMessages::default();
//! let evaluator = RestrictionEvaluator::new(&resolver, &messages);
//!
//! let value = Temporal::Date(bound);
//! let record = MemoryRecord::new();
//! let violations = evaluator.evaluate("due_on", &value, Kind::Date, &record, &restrictions);
//!
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].message(), "must be before 2008-01-02");
//! ```

mod operand;

pub use operand::{ComputeFn, Operand};

use crate::core::{ErrorMessages, Record, Violation, ViolationKey};
use crate::error::TimelinessError;
use crate::parser::TemporalResolver;
use crate::temporal::{Kind, Temporal};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument, warn};

/// A named ordering restriction.
///
/// The declaration order is the order in which restrictions are evaluated and
/// therefore the order of the violations they produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    /// The value must be strictly earlier than the operand
    Before,
    /// The value must be strictly later than the operand
    After,
    /// The value must be earlier than or equal to the operand
    OnOrBefore,
    /// The value must be later than or equal to the operand
    OnOrAfter,
}

impl RestrictionKind {
    /// All restrictions in evaluation order.
    pub const ALL: [RestrictionKind; 4] = [
        RestrictionKind::Before,
        RestrictionKind::After,
        RestrictionKind::OnOrBefore,
        RestrictionKind::OnOrAfter,
    ];

    /// Returns the restriction name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictionKind::Before => "before",
            RestrictionKind::After => "after",
            RestrictionKind::OnOrBefore => "on_or_before",
            RestrictionKind::OnOrAfter => "on_or_after",
        }
    }

    /// Evaluates the predicate for `value` against `bound`.
    pub fn holds(&self, value: &NaiveDateTime, bound: &NaiveDateTime) -> bool {
        match self {
            RestrictionKind::Before => value < bound,
            RestrictionKind::After => value > bound,
            RestrictionKind::OnOrBefore => value <= bound,
            RestrictionKind::OnOrAfter => value >= bound,
        }
    }
}

impl fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The restrictions configured for an attribute.
#[derive(Debug, Clone, Default)]
pub struct RestrictionSpec {
    restrictions: BTreeMap<RestrictionKind, Operand>,
}

impl RestrictionSpec {
    /// Creates an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operand for `kind`, replacing any previous one.
    pub fn with(mut self, kind: RestrictionKind, operand: impl Into<Operand>) -> Self {
        self.restrictions.insert(kind, operand.into());
        self
    }

    /// Requires the value to be strictly before `operand`.
    pub fn before(self, operand: impl Into<Operand>) -> Self {
        self.with(RestrictionKind::Before, operand)
    }

    /// Requires the value to be strictly after `operand`.
    pub fn after(self, operand: impl Into<Operand>) -> Self {
        self.with(RestrictionKind::After, operand)
    }

    /// Requires the value to be on or before `operand`.
    pub fn on_or_before(self, operand: impl Into<Operand>) -> Self {
        self.with(RestrictionKind::OnOrBefore, operand)
    }

    /// Requires the value to be on or after `operand`.
    pub fn on_or_after(self, operand: impl Into<Operand>) -> Self {
        self.with(RestrictionKind::OnOrAfter, operand)
    }

    /// Returns the operand configured for `kind`.
    pub fn get(&self, kind: RestrictionKind) -> Option<&Operand> {
        self.restrictions.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.restrictions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.restrictions.len()
    }

    /// Iterates configured restrictions in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (RestrictionKind, &Operand)> {
        self.restrictions.iter().map(|(kind, operand)| (*kind, operand))
    }
}

/// Checks a parsed value against a [`RestrictionSpec`].
///
/// The evaluator is stateless; it only borrows the resolver used for text
/// operands and the message templates.
#[derive(Debug, Clone, Copy)]
pub struct RestrictionEvaluator<'a> {
    resolver: &'a dyn TemporalResolver,
    messages: &'a ErrorMessages,
}

impl<'a> RestrictionEvaluator<'a> {
    pub fn new(resolver: &'a dyn TemporalResolver, messages: &'a ErrorMessages) -> Self {
        Self { resolver, messages }
    }

    /// Evaluates every configured restriction independently.
    ///
    /// Unresolvable operands are skipped. A host failure while resolving an
    /// operand yields a `restriction_invalid` violation for that restriction
    /// only.
    #[instrument(skip_all, fields(attribute = attribute, kind = %kind))]
    pub fn evaluate(
        &self,
        attribute: &str,
        value: &Temporal,
        kind: Kind,
        record: &dyn Record,
        restrictions: &RestrictionSpec,
    ) -> Vec<Violation> {
        let value = value.at_granularity(kind);
        let mut violations = Vec::new();

        for (restriction, operand) in restrictions.iter() {
            let bound = match operand.resolve(kind, record, self.resolver) {
                Ok(Some(bound)) => bound,
                Ok(None) => {
                    debug!(restriction = %restriction, "Restriction operand did not resolve, skipping");
                    continue;
                }
                Err(e) => {
                    let error =
                        TimelinessError::restriction_evaluation_with_source(restriction.as_str(), e);
                    warn!(error = %error, "Restriction operand failed");
                    violations.push(Violation::new(
                        attribute,
                        ViolationKey::RestrictionInvalid,
                        self.messages.template(ViolationKey::RestrictionInvalid),
                        Some(restriction.as_str().to_string()),
                    ));
                    continue;
                }
            };

            if !restriction.holds(&value, &bound.at_granularity(kind)) {
                let key = ViolationKey::from(restriction);
                debug!(restriction = %restriction, bound = %bound.display_as(kind), "Restriction violated");
                violations.push(Violation::new(
                    attribute,
                    key,
                    self.messages.template(key),
                    Some(bound.display_as(kind)),
                ));
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryRecord;
    use crate::parser::DefaultResolver;
    use chrono::{NaiveDate, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        date(y, mo, d).and_hms_opt(h, mi, s).unwrap()
    }

    fn evaluate(
        value: Temporal,
        kind: Kind,
        record: &MemoryRecord,
        restrictions: &RestrictionSpec,
    ) -> Vec<Violation> {
        let resolver = DefaultResolver::new();
        let messages = ErrorMessages::default();
        RestrictionEvaluator::new(&resolver, &messages).evaluate(
            "value",
            &value,
            kind,
            record,
            restrictions,
        )
    }

    fn keys(violations: &[Violation]) -> Vec<ViolationKey> {
        violations.iter().map(|v| v.key).collect()
    }

    #[test]
    fn test_predicates() {
        let earlier = datetime(2008, 1, 1, 0, 0, 0);
        let later = datetime(2008, 1, 2, 0, 0, 0);

        assert!(RestrictionKind::Before.holds(&earlier, &later));
        assert!(!RestrictionKind::Before.holds(&later, &later));
        assert!(RestrictionKind::OnOrBefore.holds(&later, &later));
        assert!(RestrictionKind::After.holds(&later, &earlier));
        assert!(!RestrictionKind::After.holds(&earlier, &earlier));
        assert!(RestrictionKind::OnOrAfter.holds(&earlier, &earlier));
    }

    #[test]
    fn test_equal_bound_boundaries() {
        let v = Temporal::DateTime(datetime(2008, 1, 1, 12, 0, 0));
        let record = MemoryRecord::new();

        let inclusive = RestrictionSpec::new().on_or_before(v).on_or_after(v);
        assert!(evaluate(v, Kind::DateTime, &record, &inclusive).is_empty());

        let exclusive = RestrictionSpec::new().before(v).after(v);
        assert_eq!(
            keys(&evaluate(v, Kind::DateTime, &record, &exclusive)),
            vec![ViolationKey::Before, ViolationKey::After]
        );
    }

    #[test]
    fn test_date_kind_discards_operand_time() {
        let record = MemoryRecord::new();
        let restrictions =
            RestrictionSpec::new().on_or_before(datetime(2008, 1, 2, 23, 59, 59));

        let violations = evaluate(
            Temporal::Date(date(2008, 1, 3)),
            Kind::Date,
            &record,
            &restrictions,
        );
        assert_eq!(keys(&violations), vec![ViolationKey::OnOrBefore]);
        assert_eq!(violations[0].message(), "must be on or before 2008-01-02");

        assert!(evaluate(
            Temporal::Date(date(2008, 1, 2)),
            Kind::Date,
            &record,
            &restrictions
        )
        .is_empty());
    }

    #[test]
    fn test_time_kind_compares_time_of_day_only() {
        let record = MemoryRecord::new();
        let restrictions = RestrictionSpec::new()
            .before(datetime(1999, 12, 31, 23, 0, 0))
            .after("06:00");

        let ok = Temporal::Time(NaiveTime::from_hms_opt(22, 59, 0).unwrap());
        assert!(evaluate(ok, Kind::Time, &record, &restrictions).is_empty());

        let late = Temporal::Time(NaiveTime::from_hms_opt(23, 0, 0).unwrap());
        let violations = evaluate(late, Kind::Time, &record, &restrictions);
        assert_eq!(keys(&violations), vec![ViolationKey::Before]);
        assert_eq!(violations[0].message(), "must be before 23:00:00");
    }

    #[test]
    fn test_multiple_failures_in_fixed_order() {
        let record = MemoryRecord::new();
        let restrictions = RestrictionSpec::new()
            .on_or_after("2008-01-10")
            .on_or_before("2008-01-01")
            .after("2008-01-09")
            .before("2008-01-02");

        let violations = evaluate(
            Temporal::Date(date(2008, 1, 5)),
            Kind::Date,
            &record,
            &restrictions,
        );
        assert_eq!(
            keys(&violations),
            vec![
                ViolationKey::Before,
                ViolationKey::After,
                ViolationKey::OnOrBefore,
                ViolationKey::OnOrAfter
            ]
        );
    }

    #[test]
    fn test_unresolvable_operands_are_skipped() {
        let record = MemoryRecord::new().declare("ends_on", Kind::Date);
        let restrictions = RestrictionSpec::new()
            .before("not a date")
            .after(Operand::field("ends_on"))
            .on_or_before(Operand::computed(|_| Ok(None)));

        assert!(evaluate(
            Temporal::Date(date(2008, 1, 5)),
            Kind::Date,
            &record,
            &restrictions
        )
        .is_empty());
    }

    #[test]
    fn test_operand_failure_is_scoped_to_its_restriction() {
        let record = MemoryRecord::new();
        let restrictions = RestrictionSpec::new()
            .before(Operand::computed(|_| Err("boom".into())))
            .after("2008-01-10");

        let violations = evaluate(
            Temporal::Date(date(2008, 1, 5)),
            Kind::Date,
            &record,
            &restrictions,
        );
        assert_eq!(
            keys(&violations),
            vec![ViolationKey::RestrictionInvalid, ViolationKey::After]
        );
        assert_eq!(
            violations[0].message(),
            "restriction 'before' value was invalid"
        );
    }

    #[test]
    fn test_unknown_field_is_an_operand_failure() {
        let record = MemoryRecord::new();
        let restrictions = RestrictionSpec::new().before(Operand::field("missing"));

        let violations = evaluate(
            Temporal::Date(date(2008, 1, 5)),
            Kind::Date,
            &record,
            &restrictions,
        );
        assert_eq!(keys(&violations), vec![ViolationKey::RestrictionInvalid]);
    }

    #[test]
    fn test_field_operand_reads_pending_value() {
        let mut record = MemoryRecord::new()
            .declare("starts_at", Kind::DateTime)
            .with_value("starts_at", "2008-01-01 00:00:00");
        record.commit();
        record.set("starts_at", "2008-01-02 12:00:00");

        let restrictions = RestrictionSpec::new().on_or_after(Operand::field("starts_at"));
        let violations = evaluate(
            Temporal::Date(date(2008, 1, 1)),
            Kind::Date,
            &record,
            &restrictions,
        );
        assert_eq!(keys(&violations), vec![ViolationKey::OnOrAfter]);
        assert_eq!(violations[0].parameter.as_deref(), Some("2008-01-02"));
    }

    #[test]
    fn test_spec_replaces_operands() {
        let spec = RestrictionSpec::new().before("2008-01-01").before("2009-01-01");
        assert_eq!(spec.len(), 1);
        assert!(matches!(
            spec.get(RestrictionKind::Before),
            Some(Operand::Text(text)) if text == "2009-01-01"
        ));
        assert!(spec.get(RestrictionKind::After).is_none());
    }
}
