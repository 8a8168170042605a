// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-memory collaborators for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::{BatchError, LookupError, ScoringError, StoreError};
use crate::flow::project_row;
use crate::record::Record;
use crate::traits::{
    BatchReport, BatchSink, LookupQuery, RelationalLookup, RelationalStore, ScoringInput,
    ScoringOutput, ScoringPort,
};

/// Lookup answering every query with the same row and verdict.
#[derive(Default)]
pub struct StaticLookup {
    row: Option<Record>,
    verdict: Option<bool>,
    fail: bool,
    calls: AtomicUsize,
    last_params: Mutex<Option<Record>>,
}

impl StaticLookup {
    /// No row and no verdict.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_row(row: Record) -> Self {
        Self {
            row: Some(row),
            ..Self::default()
        }
    }

    pub fn with_bool(verdict: bool) -> Self {
        Self {
            verdict: Some(verdict),
            ..Self::default()
        }
    }

    pub fn and_bool(mut self, verdict: bool) -> Self {
        self.verdict = Some(verdict);
        self
    }

    /// Every call fails with a query error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<Record> {
        self.last_params.lock().unwrap().clone()
    }

    fn observe(&self, query: &LookupQuery<'_>) -> Result<(), LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = Some(query.params.clone());
        if self.fail {
            return Err(LookupError::Query {
                database: query.database,
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RelationalLookup for StaticLookup {
    /// The raw row goes through the query's field specs like a driver's would.
    async fn load_one(&self, query: LookupQuery<'_>) -> Result<Option<Record>, LookupError> {
        self.observe(&query)?;
        match &self.row {
            Some(row) if !query.field_specs.is_empty() => project_row(query.field_specs, row).map(Some),
            other => Ok(other.clone()),
        }
    }

    async fn load_bool(&self, query: LookupQuery<'_>) -> Result<Option<bool>, LookupError> {
        self.observe(&query)?;
        Ok(self.verdict)
    }
}

/// Store keeping every statement and its rows.
#[derive(Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<(String, Vec<Record>)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<(String, Vec<Record>)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RelationalStore for RecordingStore {
    async fn store(&self, statement: &str, rows: &[Record]) -> Result<u64, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push((statement.to_string(), rows.to_vec()));
        Ok(rows.len() as u64)
    }
}

/// Scoring service giving every input the same verdict.
pub struct StaticScoring {
    probability: f64,
    prediction: i64,
    extra: Vec<String>,
    calls: AtomicUsize,
    last_inputs: Mutex<Vec<ScoringInput>>,
}

impl StaticScoring {
    pub fn new(probability: f64, prediction: i64) -> Self {
        Self {
            probability,
            prediction,
            extra: Vec::new(),
            calls: AtomicUsize::new(0),
            last_inputs: Mutex::new(Vec::new()),
        }
    }

    /// Also answer for an id that was never requested.
    pub fn with_extra_output(mut self, uuid: &str) -> Self {
        self.extra.push(uuid.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_inputs(&self) -> Vec<ScoringInput> {
        self.last_inputs.lock().unwrap().clone()
    }

    fn output(&self, uuid: &str) -> ScoringOutput {
        ScoringOutput {
            uuid: uuid.to_string(),
            probability: self.probability,
            prediction: self.prediction,
            threshold: 0.5,
            model_name: "fds-xgb".to_string(),
            model_version: "1.0.0".to_string(),
        }
    }
}

#[async_trait]
impl ScoringPort for StaticScoring {
    async fn score(&self, inputs: &[ScoringInput]) -> Result<Vec<ScoringOutput>, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_inputs.lock().unwrap() = inputs.to_vec();
        Ok(inputs
            .iter()
            .map(|i| i.uuid.as_str())
            .chain(self.extra.iter().map(String::as_str))
            .map(|uuid| self.output(uuid))
            .collect())
    }
}

/// Scoring service that is always down.
pub struct FailingScoring;

#[async_trait]
impl ScoringPort for FailingScoring {
    async fn score(&self, _inputs: &[ScoringInput]) -> Result<Vec<ScoringOutput>, ScoringError> {
        Err(ScoringError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

/// Sink keeping every micro-batch it was handed.
#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<Record>>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the batch, then fails it.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<Record>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchSink for RecordingSink {
    async fn accept(&self, batch: Vec<Record>) -> Result<BatchReport, BatchError> {
        let scored = batch.len();
        self.batches.lock().unwrap().push(batch);
        if self.fail {
            return Err(BatchError::Store(StoreError::Rejected("disk full".to_string())));
        }
        Ok(BatchReport {
            scored,
            stored: scored as u64,
        })
    }
}
