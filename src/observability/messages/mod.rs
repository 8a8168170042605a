// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message is a small struct implementing `Display` for the human-readable
//! line and [`StructuredLog`] for emitting it through `tracing` at its level,
//! with the identifying context attached as fields.
//!
//! * `config` - configuration load and validation
//! * `flow` - flow construction and per-record outcomes
//! * `ingestion` - source reading, tombstones, queue shedding
//! * `scheduler` - micro-batch lifecycle
//! * `detection` - scoring and storage of a micro-batch
//!
//! ```rust
//! use feature_stream_engine::observability::messages::{flow::FlowBuilt, StructuredLog};
//!
//! FlowBuilt { flow: "feature-stream", steps: 3 }.log();
//! ```

use tracing::Span;

pub mod config;
pub mod detection;
pub mod flow;
pub mod ingestion;
pub mod scheduler;

/// Emit a message as a structured `tracing` event at its designated level.
pub trait StructuredLog {
    fn log(&self);

    /// Span carrying the same fields, for work done on behalf of this event.
    fn span(&self, name: &str) -> Span;
}
