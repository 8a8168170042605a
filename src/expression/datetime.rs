// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Local-zone conversions and `TO_LOCAL_DATETIME` pattern handling.
//!
//! The engine's local zone is Asia/Seoul, which has kept a fixed +09:00 offset
//! with no daylight saving since 1988, so a constant offset is used.

use crate::errors::ExpressionError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

const LOCAL_OFFSET_HOURS: i64 = 9;

/// Epoch values with at least this many characters are milliseconds.
const EPOCH_MILLIS_MIN_LEN: usize = 13;

pub(crate) fn local_to_instant(local: &NaiveDateTime) -> Option<DateTime<Utc>> {
    local
        .checked_sub_signed(Duration::hours(LOCAL_OFFSET_HOURS))
        .map(|utc| Utc.from_utc_datetime(&utc))
}

pub(crate) fn instant_to_local(instant: &DateTime<Utc>) -> Option<NaiveDateTime> {
    instant
        .naive_utc()
        .checked_add_signed(Duration::hours(LOCAL_OFFSET_HOURS))
}

/// Interpret an integer as epoch seconds, or epoch millis when its decimal
/// form (sign included) has 13 or more characters.
pub(crate) fn epoch_to_instant(value: i64) -> Option<DateTime<Utc>> {
    if value.to_string().len() >= EPOCH_MILLIS_MIN_LEN {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

/// Parse `value` with a `yyyy-MM-dd HH:mm:ss`-style pattern. Date-only
/// patterns resolve to midnight.
pub(crate) fn parse_local(value: &str, pattern: &str) -> Result<NaiveDateTime, ExpressionError> {
    let format = to_chrono_format(pattern)?;
    NaiveDateTime::parse_from_str(value, &format)
        .or_else(|_| {
            NaiveDate::parse_from_str(value, &format).map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|_| ExpressionError::DateTimeParse {
            value: value.to_string(),
            pattern: pattern.to_string(),
        })
}

/// Translate a `yyyy-MM-dd'T'HH:mm:ss.SSS` style pattern into a chrono format string.
pub(crate) fn to_chrono_format(pattern: &str) -> Result<String, ExpressionError> {
    let unsupported = || ExpressionError::UnsupportedPattern {
        pattern: pattern.to_string(),
    };

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' is a literal quote, otherwise copy until the closing quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            let close = chars[i + 1..]
                .iter()
                .position(|&q| q == '\'')
                .ok_or_else(unsupported)?;
            for &lit in &chars[i + 1..i + 1 + close] {
                push_literal(&mut out, lit);
            }
            i += close + 2;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&r| r == c).count();
        let spec = match (c, run) {
            ('y' | 'u', 2) => "%y",
            ('y' | 'u', _) => "%Y",
            ('M', 1 | 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1 | 2) => "%d",
            ('H', 1 | 2) => "%H",
            ('h', 1 | 2) => "%I",
            ('m', 1 | 2) => "%M",
            ('s', 1 | 2) => "%S",
            ('S', 3) => "%3f",
            ('S', 6) => "%6f",
            ('S', 9) => "%9f",
            ('a', 1) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            _ => return Err(unsupported()),
        };
        out.push_str(spec);
        i += run;
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
