// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::ProcessError;
use crate::expression::{evaluate, matches};
use crate::record::Record;
use crate::traits::ProcessHandler;

/// Sets `record[alias]` for each pair in order. Later pairs see earlier results.
pub struct DerivedOperatorHandler {
    assignments: Vec<(String, String)>,
}

impl DerivedOperatorHandler {
    /// `assignments` are `(expression, alias)` pairs.
    pub fn new(assignments: Vec<(String, String)>) -> Self {
        Self { assignments }
    }
}

#[async_trait]
impl ProcessHandler for DerivedOperatorHandler {
    async fn handle(&self, mut record: Record) -> Result<Option<Record>, ProcessError> {
        for (expr, alias) in &self.assignments {
            let value = evaluate(expr, &record)?;
            record.insert(alias.as_str(), value);
        }
        Ok(Some(record))
    }

    fn name(&self) -> &'static str {
        "derived_operator"
    }
}

/// Keeps the record only when every condition matches.
pub struct FilterOperatorHandler {
    conditions: Vec<String>,
}

impl FilterOperatorHandler {
    pub fn new(conditions: Vec<String>) -> Self {
        Self { conditions }
    }
}

#[async_trait]
impl ProcessHandler for FilterOperatorHandler {
    async fn handle(&self, record: Record) -> Result<Option<Record>, ProcessError> {
        for condition in &self.conditions {
            if !matches(condition, &record)? {
                return Ok(None);
            }
        }
        Ok(Some(record))
    }

    fn name(&self) -> &'static str {
        "filter_operator"
    }
}
