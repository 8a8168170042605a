// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for flow and process construction. All of them are fatal for the flow being built.

use crate::flow::ProcessEngine;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid flow spec for '{flow}': {source}")]
    InvalidSpec {
        flow: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid attribute for step {step} of flow '{flow}': {reason}")]
    InvalidAttribute {
        flow: String,
        step: usize,
        reason: String,
    },

    #[error("Engine '{engine}' is not implemented (flow '{flow}', step {step})")]
    EngineNotImplemented {
        flow: String,
        step: usize,
        engine: ProcessEngine,
    },

    #[error("Flow '{0}' is not registered")]
    UnknownFlow(String),
}
