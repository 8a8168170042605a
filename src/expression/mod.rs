// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The embedded expression language used by OPERATOR steps.
//!
//! Expressions are re-scanned on every evaluation; there is no AST. Value
//! expressions support literals (`'text'`, `12`, `-3.5`, `NULL`, `TRUE`),
//! `:field` references, top-level `+`/`-` and the functions `CONCAT`,
//! `TIMEDIFF`, `TO_LOCAL_DATETIME`, `IF`, `NVL` and `COALESCE`.
//!
//! Conditions add `OR`, `AND`, the comparators `!= >= <= = > <`, `LIKE`,
//! `NOT LIKE`, `IS NULL` and `IS NOT NULL`. Comparators are false when either
//! side is null.

mod coerce;
mod datetime;
mod evaluator;
mod functions;
mod like;
mod splitter;

pub use coerce::{compare_smart, to_boolean, Comparison};
pub(crate) use datetime::{epoch_to_instant, instant_to_local};
pub use evaluator::{evaluate, filter, matches};
