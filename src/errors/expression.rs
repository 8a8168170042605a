// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while evaluating an expression against one record.

use thiserror::Error;

/// Every variant names the offending expression, function, or value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("Unsupported expression: {expr}")]
    Unsupported { expr: String },

    #[error("Malformed expression '{expr}': {reason}")]
    Malformed { expr: String, reason: String },

    #[error("{function} expects {expected} argument(s), got {found}")]
    Arity {
        function: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("Not a number in '{expr}': {value}")]
    NotANumber { expr: String, value: String },

    #[error("Unsupported time unit: {unit}")]
    UnknownTimeUnit { unit: String },

    #[error("Cannot parse '{value}' with pattern '{pattern}'")]
    DateTimeParse { value: String, pattern: String },

    #[error("Unsupported datetime pattern: {pattern}")]
    UnsupportedPattern { pattern: String },

    #[error("{function} does not accept a {type_name} value")]
    UnsupportedType {
        function: &'static str,
        type_name: &'static str,
    },

    #[error("Arithmetic overflow in '{expr}'")]
    Overflow { expr: String },
}

impl ExpressionError {
    pub(crate) fn unsupported(expr: &str) -> Self {
        ExpressionError::Unsupported {
            expr: expr.to_string(),
        }
    }

    pub(crate) fn malformed(expr: &str, reason: impl Into<String>) -> Self {
        ExpressionError::Malformed {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}
