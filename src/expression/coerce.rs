// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Value coercions shared by arithmetic, comparison and the functions.

use super::datetime::{epoch_to_instant, local_to_instant};
use super::splitter::is_number;
use crate::errors::ExpressionError;
use crate::record::Value;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// Numeric view of a value, if it has one.
pub(crate) fn try_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Decimal(d) => Some(*d),
        Value::Integer(i) => Some(Decimal::from(*i)),
        Value::Float(f) => Decimal::try_from(*f).ok(),
        Value::String(s) if is_number(s) => Decimal::from_str(s).ok(),
        _ => None,
    }
}

/// Arithmetic operand coercion. Null counts as zero.
pub(crate) fn to_decimal(value: &Value, expr: &str) -> Result<Decimal, ExpressionError> {
    if value.is_null() {
        return Ok(Decimal::ZERO);
    }
    try_decimal(value).ok_or_else(|| ExpressionError::NotANumber {
        expr: expr.to_string(),
        value: value.to_string(),
    })
}

/// Instant view of a value: timestamps, local datetimes, epoch numbers and
/// RFC 3339 or numeric strings. `None` when the value cannot be placed in time.
pub(crate) fn to_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::DateTime(local) => local_to_instant(local),
        Value::Integer(i) => epoch_to_instant(*i),
        Value::Decimal(d) => d.trunc().to_i64().and_then(epoch_to_instant),
        Value::Float(f) if f.is_finite() => epoch_to_instant(f.trunc() as i64),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                if is_number(s) {
                    Decimal::from_str(s)
                        .ok()
                        .and_then(|d| d.trunc().to_i64())
                        .and_then(epoch_to_instant)
                } else {
                    None
                }
            }),
        _ => None,
    }
}

/// Truthiness used by conditions and `IF`.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Integer(i) => *i != 0,
        Value::Decimal(d) => !d.is_zero(),
        Value::Float(f) => *f != 0.0,
        Value::String(s) => {
            s.eq_ignore_ascii_case("true") || s == "1" || s.eq_ignore_ascii_case("y")
        }
        Value::DateTime(_) | Value::Timestamp(_) => false,
    }
}

/// Outcome of [`compare_smart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    BothNull,
    /// Exactly one side is null: unequal, but unordered.
    OneNull,
    Ordered(Ordering),
}

/// Ordering used by the comparators: numeric first, then by instant, then by
/// text. Null is never ordered against anything.
pub fn compare_smart(left: &Value, right: &Value) -> Comparison {
    match (left.is_null(), right.is_null()) {
        (true, true) => return Comparison::BothNull,
        (true, false) | (false, true) => return Comparison::OneNull,
        (false, false) => {}
    }

    if let (Some(l), Some(r)) = (try_decimal(left), try_decimal(right)) {
        return Comparison::Ordered(l.cmp(&r));
    }

    if let (Some(l), Some(r)) = (to_instant(left), to_instant(right)) {
        return Comparison::Ordered(l.cmp(&r));
    }

    Comparison::Ordered(left.to_string().cmp(&right.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_to_boolean_table() {
        let cases = vec![
            (Value::Null, false),
            (Value::Bool(true), true),
            (Value::Bool(false), false),
            (Value::Integer(2), true),
            (Value::Integer(0), false),
            (Value::Decimal(Decimal::ZERO), false),
            (Value::Float(0.5), true),
            (Value::from("TRUE"), true),
            (Value::from("y"), true),
            (Value::from("1"), true),
            (Value::from("yes"), false),
            (Value::from("0"), false),
        ];
        for (value, expected) in cases {
            assert_eq!(to_boolean(&value), expected, "{value:?}");
        }
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(&Value::Null, "x").unwrap(), Decimal::ZERO);
        assert_eq!(to_decimal(&Value::from("12.5"), "x").unwrap(), Decimal::new(125, 1));
        assert_eq!(to_decimal(&Value::Integer(7), "x").unwrap(), Decimal::from(7));
        assert!(matches!(
            to_decimal(&Value::from("abc"), "x"),
            Err(ExpressionError::NotANumber { .. })
        ));
        assert!(matches!(
            to_decimal(&Value::Bool(true), "x"),
            Err(ExpressionError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_compare_numeric_before_text() {
        // "10" > "9" numerically even though it sorts lower as text
        assert_eq!(
            compare_smart(&Value::from("10"), &Value::from("9")),
            Comparison::Ordered(Ordering::Greater)
        );
        assert_eq!(
            compare_smart(&Value::Integer(5), &Value::from("5.0")),
            Comparison::Ordered(Ordering::Equal)
        );
    }

    #[test]
    fn test_compare_instants() {
        let local = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(
            compare_smart(&Value::DateTime(local), &Value::from("2024-01-01T00:00:00Z")),
            Comparison::Ordered(Ordering::Equal)
        );
    }

    #[test]
    fn test_compare_falls_back_to_text() {
        assert_eq!(
            compare_smart(&Value::from("abc"), &Value::from("abd")),
            Comparison::Ordered(Ordering::Less)
        );
    }

    #[test]
    fn test_compare_null_is_unordered() {
        assert_eq!(compare_smart(&Value::Null, &Value::Null), Comparison::BothNull);
        assert_eq!(compare_smart(&Value::Null, &Value::Integer(1)), Comparison::OneNull);
        assert_eq!(compare_smart(&Value::from("a"), &Value::Null), Comparison::OneNull);
    }

    #[test]
    fn test_to_instant_epoch_strings() {
        let a = to_instant(&Value::from("1700000000")).unwrap();
        let b = to_instant(&Value::Integer(1_700_000_000_000)).unwrap();
        assert_eq!(a, b);
        assert_eq!(to_instant(&Value::from("yesterday")), None);
    }
}
