// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runtime errors: per-record pipeline failures, collaborator failures, and
//! whole-micro-batch failures.

use crate::errors::ExpressionError;
use crate::flow::{Database, FieldType, ProcessEngine, ProcessKind};
use thiserror::Error;

/// Failure of the relational lookup collaborator.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No relational backend configured for database {0}")]
    Unavailable(Database),

    #[error("Query against {database} failed: {message}")]
    Query { database: Database, message: String },

    #[error("Failed to convert column '{field}' to {field_type}: {reason}")]
    Conversion {
        field: String,
        field_type: FieldType,
        reason: String,
    },
}

/// Failure of the relational store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize row: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store rejected statement: {0}")]
    Rejected(String),
}

/// Failure of the scoring collaborator. Always covers the whole request.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Scoring request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Scoring service returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Why a single step failed for a single record.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// A step failure attributed to its flow and position. Isolated at the record boundary.
#[derive(Debug, Error)]
#[error("Flow '{flow}' step {step} ({kind}/{engine}) failed: {source}")]
pub struct PipelineError {
    pub flow: String,
    pub step: usize,
    pub kind: ProcessKind,
    pub engine: ProcessEngine,
    #[source]
    pub source: ProcessError,
}

/// A downstream failure covering an entire micro-batch. Never retried by the engine.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Scoring failed for micro-batch: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Storing micro-batch results failed: {0}")]
    Store(#[from] StoreError),
}
