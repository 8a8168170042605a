// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::LookupError;
use crate::expression::{epoch_to_instant, instant_to_local};
use crate::record::{Record, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    String,
    Integer,
    Long,
    Float,
    Double,
    SqlDatetime,
    Timestamp,
    JavaDatetime,
}

/// A typed result column of a DB_QUERY step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// Convert one raw column value to its declared type. Null stays null.
    pub fn extract(&self, raw: &Value) -> Result<Value, LookupError> {
        if raw.is_null() {
            return Ok(Value::Null);
        }

        match self.field_type {
            FieldType::String => Ok(raw
                .to_text()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map_or(Value::Null, Value::String)),
            FieldType::Integer => {
                let v = self.integral(raw)?;
                i32::try_from(v)
                    .map(|v| Value::Integer(v.into()))
                    .map_err(|_| self.conversion(raw, "out of INTEGER range"))
            }
            FieldType::Long => self.integral(raw).map(Value::Integer),
            FieldType::Float => self.floating(raw).map(|v| Value::Float(v as f32 as f64)),
            FieldType::Double => self.floating(raw).map(Value::Float),
            FieldType::SqlDatetime | FieldType::Timestamp => self.local_datetime(raw),
            FieldType::JavaDatetime => Ok(raw.clone()),
        }
    }

    fn integral(&self, raw: &Value) -> Result<i64, LookupError> {
        let parsed = match raw {
            Value::Integer(i) => Some(*i),
            Value::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        };
        parsed.ok_or_else(|| self.conversion(raw, "not an integral number"))
    }

    fn floating(&self, raw: &Value) -> Result<f64, LookupError> {
        let parsed = match raw {
            Value::Integer(i) => Some(*i as f64),
            Value::Decimal(d) => d.to_f64(),
            Value::Float(f) => Some(*f),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.conversion(raw, "not a number"))
    }

    fn local_datetime(&self, raw: &Value) -> Result<Value, LookupError> {
        let parsed = match raw {
            Value::DateTime(dt) => Some(*dt),
            Value::Timestamp(ts) => instant_to_local(ts),
            Value::Integer(i) => epoch_to_instant(*i).and_then(|ts| instant_to_local(&ts)),
            Value::Decimal(d) => d
                .trunc()
                .to_i64()
                .and_then(epoch_to_instant)
                .and_then(|ts| instant_to_local(&ts)),
            Value::String(s) => parse_sql_datetime(s.trim()),
            _ => None,
        };
        parsed
            .map(Value::DateTime)
            .ok_or_else(|| self.conversion(raw, "not a datetime"))
    }

    fn conversion(&self, raw: &Value, reason: &str) -> LookupError {
        LookupError::Conversion {
            field: self.name.clone(),
            field_type: self.field_type,
            reason: format!("{reason}: {raw}"),
        }
    }
}

fn parse_sql_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .and_then(|dt| instant_to_local(&dt.with_timezone(&Utc)))
        })
        .or_else(|| {
            Decimal::from_str(s)
                .ok()
                .and_then(|d| d.trunc().to_i64())
                .and_then(epoch_to_instant)
                .and_then(|ts| instant_to_local(&ts))
        })
}

/// Project one result row through the declared specs, in spec order.
/// Columns the row lacks come out as null.
pub fn project_row(specs: &[FieldSpec], row: &Record) -> Result<Record, LookupError> {
    specs
        .iter()
        .map(|spec| {
            let raw = row.get(&spec.name).unwrap_or(&Value::Null);
            spec.extract(raw).map(|v| (spec.name.clone(), v))
        })
        .collect()
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldType::String => "STRING",
            FieldType::Integer => "INTEGER",
            FieldType::Long => "LONG",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
            FieldType::SqlDatetime => "SQL_DATETIME",
            FieldType::Timestamp => "TIMESTAMP",
            FieldType::JavaDatetime => "JAVA_DATETIME",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use chrono::NaiveDate;

    #[test]
    fn test_string_is_trimmed_and_blank_is_null() {
        let spec = FieldSpec::new("grade", FieldType::String);
        assert_eq!(spec.extract(&Value::from("  A1 ")).unwrap(), Value::from("A1"));
        assert_eq!(spec.extract(&Value::from("   ")).unwrap(), Value::Null);
        assert_eq!(spec.extract(&Value::Integer(7)).unwrap(), Value::from("7"));
    }

    #[test]
    fn test_numeric_types() {
        let int = FieldSpec::new("cnt", FieldType::Integer);
        assert_eq!(int.extract(&Value::from("42")).unwrap(), Value::Integer(42));
        assert!(int.extract(&Value::Integer(i64::MAX)).is_err());
        assert!(int.extract(&Value::from("4.2")).is_err());

        let long = FieldSpec::new("amt", FieldType::Long);
        assert_eq!(
            long.extract(&Value::Decimal(Decimal::from(10_000_000_000_i64))).unwrap(),
            Value::Integer(10_000_000_000)
        );

        let double = FieldSpec::new("ratio", FieldType::Double);
        assert_eq!(double.extract(&Value::from("0.25")).unwrap(), Value::Float(0.25));

        let float = FieldSpec::new("ratio", FieldType::Float);
        assert_eq!(float.extract(&Value::Float(0.5)).unwrap(), Value::Float(0.5));
    }

    #[test]
    fn test_datetime_types() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let spec = FieldSpec::new("last_tx_at", FieldType::SqlDatetime);
        assert_eq!(
            spec.extract(&Value::from("2024-03-01 09:05:00")).unwrap(),
            Value::DateTime(expected)
        );
        assert_eq!(
            spec.extract(&Value::from("2024-03-01T00:05:00Z")).unwrap(),
            Value::DateTime(expected)
        );
        assert!(spec.extract(&Value::from("soon")).is_err());
    }

    #[test]
    fn test_null_passes_through_every_type() {
        for field_type in [FieldType::String, FieldType::Long, FieldType::Timestamp] {
            let spec = FieldSpec::new("x", field_type);
            assert_eq!(spec.extract(&Value::Null).unwrap(), Value::Null);
        }
    }

    #[test]
    fn test_project_row_follows_spec_order() {
        let specs = vec![
            FieldSpec::new("b", FieldType::Long),
            FieldSpec::new("a", FieldType::String),
            FieldSpec::new("missing", FieldType::String),
        ];
        let row = record! { "a" => " x ", "b" => "5", "extra" => 1 };
        let projected = project_row(&specs, &row).unwrap();
        let keys: Vec<&str> = projected.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "missing"]);
        assert_eq!(projected.get("b"), Some(&Value::Integer(5)));
        assert_eq!(projected.get("missing"), Some(&Value::Null));
    }

    #[test]
    fn test_conversion_error_names_field() {
        let spec = FieldSpec::new("cnt", FieldType::Long);
        match spec.extract(&Value::from("many")) {
            Err(LookupError::Conversion { field, field_type, .. }) => {
                assert_eq!(field, "cnt");
                assert_eq!(field_type, FieldType::Long);
            }
            other => panic!("expected conversion error, got {other:?}"),
        }
    }
}
