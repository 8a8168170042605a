// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod construction;
mod execution;
mod expression;

pub use config::{ConfigError, ValidationError};
pub use construction::ConstructionError;
pub use execution::{BatchError, LookupError, PipelineError, ProcessError, ScoringError, StoreError};
pub use expression::ExpressionError;
