// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Boundaries to the relational backends and the scoring service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{LookupError, ScoringError, StoreError};
use crate::flow::{Database, FieldSpec};
use crate::record::Record;

/// One parameterised query. The record's fields are the named parameters.
#[derive(Debug, Clone, Copy)]
pub struct LookupQuery<'a> {
    pub database: Database,
    pub sql: &'a str,
    pub field_specs: &'a [FieldSpec],
    pub params: &'a Record,
}

#[async_trait]
pub trait RelationalLookup: Send + Sync {
    /// First result row projected through the query's field specs, `None` when empty.
    async fn load_one(&self, query: LookupQuery<'_>) -> Result<Option<Record>, LookupError>;

    /// Boolean result of the query, `None` when it returns no row.
    async fn load_bool(&self, query: LookupQuery<'_>) -> Result<Option<bool>, LookupError>;
}

#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// Bulk insert. Returns rows affected, 0 for an empty slice.
    async fn store(&self, statement: &str, rows: &[Record]) -> Result<u64, StoreError>;
}

/// Feature set for one record, keyed by its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringInput {
    pub uuid: String,
    pub features: Record,
}

/// Model verdict for one record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringOutput {
    pub uuid: String,
    pub probability: f64,
    pub prediction: i64,
    pub threshold: f64,
    pub model_name: String,
    pub model_version: String,
}

#[async_trait]
pub trait ScoringPort: Send + Sync {
    /// Score a whole micro-batch in one call. Any failure covers every input.
    async fn score(&self, inputs: &[ScoringInput]) -> Result<Vec<ScoringOutput>, ScoringError>;
}
