// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::coerce::{to_instant, try_decimal};
use super::datetime::{epoch_to_instant, instant_to_local, parse_local, to_chrono_format};
use super::evaluator::{evaluate, evaluate_condition};
use crate::errors::ExpressionError;
use crate::record::{Record, Value};
use rust_decimal::prelude::ToPrimitive;

/// The fixed function set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Function {
    Concat,
    TimeDiff,
    ToLocalDateTime,
    If,
    Nvl,
    Coalesce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    fn parse(unit: &str) -> Result<Self, ExpressionError> {
        match unit.to_ascii_uppercase().as_str() {
            "SECOND" | "SECONDS" => Ok(TimeUnit::Second),
            "MINUTE" | "MINUTES" => Ok(TimeUnit::Minute),
            "HOUR" | "HOURS" => Ok(TimeUnit::Hour),
            "DAY" | "DAYS" => Ok(TimeUnit::Day),
            _ => Err(ExpressionError::UnknownTimeUnit {
                unit: unit.to_string(),
            }),
        }
    }
}

impl Function {
    /// Case-insensitive lookup of a call name.
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "CONCAT" => Some(Function::Concat),
            "TIMEDIFF" => Some(Function::TimeDiff),
            "TO_LOCAL_DATETIME" => Some(Function::ToLocalDateTime),
            "IF" => Some(Function::If),
            "NVL" => Some(Function::Nvl),
            "COALESCE" => Some(Function::Coalesce),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Function::Concat => "CONCAT",
            Function::TimeDiff => "TIMEDIFF",
            Function::ToLocalDateTime => "TO_LOCAL_DATETIME",
            Function::If => "IF",
            Function::Nvl => "NVL",
            Function::Coalesce => "COALESCE",
        }
    }

    /// Evaluate the call. Arguments arrive unevaluated so that `IF`, `NVL`
    /// and `COALESCE` only evaluate what they need.
    pub(crate) fn call(self, args: &[&str], record: &Record) -> Result<Value, ExpressionError> {
        match self {
            Function::Concat => {
                let mut out = String::new();
                for arg in args {
                    if let Some(text) = evaluate(arg, record)?.to_text() {
                        out.push_str(&text);
                    }
                }
                Ok(Value::String(out))
            }
            Function::TimeDiff => {
                self.expect_arity(args, 3, "3")?;
                let unit = TimeUnit::parse(&unit_text(args[2], record)?)?;
                let later = to_instant(&evaluate(args[0], record)?);
                let earlier = to_instant(&evaluate(args[1], record)?);
                let (Some(later), Some(earlier)) = (later, earlier) else {
                    return Ok(Value::Null);
                };
                let delta = later - earlier;
                let amount = match unit {
                    TimeUnit::Second => delta.num_seconds(),
                    TimeUnit::Minute => delta.num_minutes(),
                    TimeUnit::Hour => delta.num_hours(),
                    TimeUnit::Day => delta.num_days(),
                };
                Ok(Value::Integer(amount))
            }
            Function::ToLocalDateTime => {
                self.expect_arity(args, 2, "2")?;
                let raw = evaluate(args[0], record)?;
                let pattern = evaluate(args[1], record)?
                    .to_text()
                    .unwrap_or_else(|| "null".to_string());
                to_chrono_format(&pattern)?;
                to_local_datetime(raw, &pattern)
            }
            Function::If => {
                self.expect_arity(args, 3, "3")?;
                if evaluate_condition(args[0], record)? {
                    evaluate(args[1], record)
                } else {
                    evaluate(args[2], record)
                }
            }
            Function::Nvl => {
                self.expect_arity(args, 2, "2")?;
                match evaluate(args[0], record)? {
                    Value::Null => evaluate(args[1], record),
                    value => Ok(value),
                }
            }
            Function::Coalesce => {
                if args.is_empty() {
                    return Err(self.arity_error(args, "at least 1"));
                }
                for arg in args {
                    let value = evaluate(arg, record)?;
                    if !value.is_null() {
                        return Ok(value);
                    }
                }
                Ok(Value::Null)
            }
        }
    }

    fn expect_arity(self, args: &[&str], n: usize, expected: &'static str) -> Result<(), ExpressionError> {
        if args.len() == n {
            Ok(())
        } else {
            Err(self.arity_error(args, expected))
        }
    }

    fn arity_error(self, args: &[&str], expected: &'static str) -> ExpressionError {
        ExpressionError::Arity {
            function: self.name(),
            expected,
            found: args.len(),
        }
    }
}

/// A bare word like `MINUTE` names the unit directly; anything else is evaluated.
fn unit_text(arg: &str, record: &Record) -> Result<String, ExpressionError> {
    if !arg.is_empty() && arg.chars().all(|c| c.is_ascii_alphabetic()) && !arg.eq_ignore_ascii_case("null") {
        return Ok(arg.to_string());
    }
    Ok(evaluate(arg, record)?
        .to_text()
        .unwrap_or_else(|| "null".to_string()))
}

fn to_local_datetime(raw: Value, pattern: &str) -> Result<Value, ExpressionError> {
    let raw_text = raw.to_string();
    let local = match raw {
        Value::Null => return Ok(Value::Null),
        Value::DateTime(local) => Some(local),
        Value::Timestamp(ts) => instant_to_local(&ts),
        Value::String(s) => Some(parse_local(&s, pattern)?),
        Value::Integer(i) => epoch_to_instant(i).and_then(|ts| instant_to_local(&ts)),
        number @ (Value::Decimal(_) | Value::Float(_)) => try_decimal(&number)
            .and_then(|d| d.trunc().to_i64())
            .and_then(epoch_to_instant)
            .and_then(|ts| instant_to_local(&ts)),
        other => {
            return Err(ExpressionError::UnsupportedType {
                function: Function::ToLocalDateTime.name(),
                type_name: other.type_name(),
            })
        }
    };

    local.map(Value::DateTime).ok_or_else(|| ExpressionError::DateTimeParse {
        value: raw_text,
        pattern: pattern.to_string(),
    })
}
