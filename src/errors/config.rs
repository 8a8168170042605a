// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the application configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation failed:\n{}", format_all(.0))]
    Invalid(Vec<ValidationError>),
}

/// A single configuration rule violation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A sizing option must be at least one
    #[error("'{option}' must be at least 1")]
    ZeroSized { option: &'static str },

    /// A micro-batch can never be larger than the queue feeding it
    #[error("micro_batch_size ({batch}) exceeds queue_capacity ({capacity})")]
    BatchExceedsQueue { batch: usize, capacity: usize },

    /// The flow records are routed to is not in the flow list
    #[error("target flow '{flow}' is not listed in the flow list")]
    UnknownTargetFlow { flow: String },

    /// A required option is empty
    #[error("'{option}' must not be empty")]
    MissingValue { option: &'static str },
}

fn format_all(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
