// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::coerce::{compare_smart, to_boolean, to_decimal, Comparison};
use super::functions::Function;
use super::like::like;
use super::splitter::{
    find_comparator, find_word_op, is_number, is_quoted, matching_close, split_args,
    split_by_word, split_plus_minus, strip_outer_parens, unquote, ArithOp,
};
use crate::errors::ExpressionError;
use crate::record::{Record, Value};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// Symbolic comparators, longest first so `!=`, `>=` and `<=` are never
/// mistaken for `=`, `>` or `<`.
const COMPARATORS: [&str; 6] = ["!=", ">=", "<=", "=", ">", "<"];

/// Evaluate a value expression against one record.
///
/// A top-level `+`/`-` chain yields a decimal; otherwise the single term is a
/// literal, a `:field` reference or a function call.
pub fn evaluate(expr: &str, record: &Record) -> Result<Value, ExpressionError> {
    let expr = expr.trim();
    let terms = split_plus_minus(expr);

    if terms.len() == 1 {
        return resolve_term(terms[0].text, record);
    }

    let mut acc = Decimal::ZERO;
    for term in terms {
        if term.text.is_empty() {
            return Err(ExpressionError::malformed(expr, "missing operand"));
        }
        let operand = to_decimal(&resolve_term(term.text, record)?, expr)?;
        let next = match term.op {
            ArithOp::Add => acc.checked_add(operand),
            ArithOp::Sub => acc.checked_sub(operand),
        };
        acc = next.ok_or_else(|| ExpressionError::Overflow {
            expr: expr.to_string(),
        })?;
    }
    Ok(Value::Decimal(acc))
}

/// Evaluate a condition. A blank condition matches every record.
pub fn matches(condition: &str, record: &Record) -> Result<bool, ExpressionError> {
    if condition.trim().is_empty() {
        return Ok(true);
    }
    evaluate_condition(condition, record)
}

/// Keep the records that match `condition`, in order. Stops at the first error.
pub fn filter(records: Vec<Record>, condition: &str) -> Result<Vec<Record>, ExpressionError> {
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if matches(condition, &record)? {
            kept.push(record);
        }
    }
    Ok(kept)
}

pub(crate) fn evaluate_condition(condition: &str, record: &Record) -> Result<bool, ExpressionError> {
    let cond = strip_outer_parens(condition);

    let any = split_by_word(cond, "OR");
    if any.len() > 1 {
        for clause in any {
            if evaluate_condition(clause, record)? {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    let all = split_by_word(cond, "AND");
    if all.len() > 1 {
        for clause in all {
            if !evaluate_condition(clause, record)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    for op in COMPARATORS {
        if let Some(idx) = find_comparator(cond, op).filter(|&i| i > 0) {
            let left = evaluate(&cond[..idx], record)?;
            let right = evaluate(&cond[idx + op.len()..], record)?;
            return Ok(compare(op, compare_smart(&left, &right)));
        }
    }

    if let Some((start, end)) = find_word_op(cond, "NOT LIKE").filter(|&(i, _)| i > 0) {
        let left = evaluate(&cond[..start], record)?;
        let right = evaluate(&cond[end..], record)?;
        return Ok(!like(&left, &right)?);
    }

    if let Some((start, end)) = find_word_op(cond, "LIKE").filter(|&(i, _)| i > 0) {
        let left = evaluate(&cond[..start], record)?;
        let right = evaluate(&cond[end..], record)?;
        return like(&left, &right);
    }

    for (op, wants_null) in [("IS NOT NULL", false), ("IS NULL", true)] {
        if let Some((start, end)) = find_word_op(cond, op).filter(|&(i, _)| i > 0) {
            if !cond[end..].trim().is_empty() {
                return Err(ExpressionError::malformed(cond, format!("unexpected text after {op}")));
            }
            let value = evaluate(&cond[..start], record)?;
            return Ok(value.is_null() == wants_null);
        }
    }

    Ok(to_boolean(&evaluate(cond, record)?))
}

/// Null never satisfies an ordering or `=`; null against a value is `!=`.
fn compare(op: &str, comparison: Comparison) -> bool {
    let ordering = match comparison {
        Comparison::Ordered(ordering) => ordering,
        Comparison::OneNull => return op == "!=",
        Comparison::BothNull => return false,
    };
    match op {
        "=" => ordering == Ordering::Equal,
        "!=" => ordering != Ordering::Equal,
        ">" => ordering == Ordering::Greater,
        "<" => ordering == Ordering::Less,
        ">=" => ordering != Ordering::Less,
        "<=" => ordering != Ordering::Greater,
        _ => false,
    }
}

/// One operand: literal, field reference, parenthesised expression, signed
/// term, keyword or function call.
fn resolve_term(term: &str, record: &Record) -> Result<Value, ExpressionError> {
    let term = term.trim();

    if term.is_empty() {
        return Err(ExpressionError::malformed(term, "missing operand"));
    }

    if is_quoted(term) {
        return Ok(Value::String(unquote(term)));
    }

    if is_number(term) {
        return Decimal::from_str(term)
            .map(Value::Decimal)
            .map_err(|e| ExpressionError::malformed(term, e.to_string()));
    }

    if let Some(field) = term.strip_prefix(':') {
        if field.is_empty() {
            return Err(ExpressionError::malformed(term, "missing field name"));
        }
        if !field.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
            return Err(ExpressionError::malformed(term, "invalid field name"));
        }
        return Ok(record.get(field).cloned().unwrap_or(Value::Null));
    }

    if term.starts_with('(') && matching_close(term, 0) == Some(term.len() - 1) {
        return evaluate(&term[1..term.len() - 1], record);
    }

    if let Some(rest) = term.strip_prefix(&['+', '-'][..]) {
        let value = resolve_term(rest, record)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        let magnitude = to_decimal(&value, term)?;
        return Ok(Value::Decimal(if term.starts_with('-') { -magnitude } else { magnitude }));
    }

    if term.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }
    if term.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if term.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }

    if let Some(open) = term.find('(') {
        if let Some(function) = Function::from_name(&term[..open]) {
            if matching_close(term, open) != Some(term.len() - 1) {
                return Err(ExpressionError::malformed(term, "unbalanced call parentheses"));
            }
            let args = split_args(&term[open + 1..term.len() - 1]);
            return function.call(&args, record);
        }
    }

    Err(ExpressionError::unsupported(term))
}
