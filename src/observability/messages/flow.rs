// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Flow construction and per-record outcome events.
//!
//! Record-level events carry the stream position and record id so a dropped
//! record can be traced back to its source.

use std::fmt::{Display, Formatter};
use tracing::Span;

use crate::engine::SourcePosition;
use crate::errors::PipelineError;
use crate::observability::messages::StructuredLog;

/// Flow built from its spec and registered.
///
/// # Log Level
/// `info!`
pub struct FlowBuilt<'a> {
    pub flow: &'a str,
    pub steps: usize,
}

impl Display for FlowBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Flow '{}' built with {} step(s)", self.flow, self.steps)
    }
}

impl StructuredLog for FlowBuilt<'_> {
    fn log(&self) {
        tracing::info!(flow = self.flow, steps = self.steps, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("flow", span_name = name, flow = self.flow)
    }
}

/// A FILTER step dropped the record.
///
/// # Log Level
/// `debug!`
pub struct RecordFiltered<'a> {
    pub flow: &'a str,
    pub position: &'a SourcePosition,
    pub record_id: Option<&'a str>,
}

impl Display for RecordFiltered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Record {} at {} filtered out by flow '{}'",
            self.record_id.unwrap_or("<no id>"),
            self.position,
            self.flow
        )
    }
}

impl StructuredLog for RecordFiltered<'_> {
    fn log(&self) {
        tracing::debug!(
            flow = self.flow,
            topic = %self.position.topic,
            partition = self.position.partition,
            offset = self.position.offset,
            record_id = self.record_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("record", span_name = name, flow = self.flow, offset = self.position.offset)
    }
}

/// A step failed for the record; the record is dropped.
///
/// # Log Level
/// `warn!`
pub struct RecordFailed<'a> {
    pub position: &'a SourcePosition,
    pub record_id: Option<&'a str>,
    pub error: &'a PipelineError,
}

impl Display for RecordFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropping record {} at {}: {}",
            self.record_id.unwrap_or("<no id>"),
            self.position,
            self.error
        )
    }
}

impl StructuredLog for RecordFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            flow = %self.error.flow,
            step = self.error.step,
            engine = %self.error.engine,
            topic = %self.position.topic,
            partition = self.position.partition,
            offset = self.position.offset,
            key = self.position.key.as_deref(),
            record_id = self.record_id,
            error = %self.error.source,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("record", span_name = name, flow = %self.error.flow, offset = self.position.offset)
    }
}

/// Running the flow panicked for the record; the record is dropped.
///
/// # Log Level
/// `error!`
pub struct RecordPanicked<'a> {
    pub flow: &'a str,
    pub position: &'a SourcePosition,
    pub record_id: Option<&'a str>,
    pub message: &'a str,
}

impl Display for RecordPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Flow '{}' panicked on record {} at {}: {}",
            self.flow,
            self.record_id.unwrap_or("<no id>"),
            self.position,
            self.message
        )
    }
}

impl StructuredLog for RecordPanicked<'_> {
    fn log(&self) {
        tracing::error!(
            flow = self.flow,
            topic = %self.position.topic,
            partition = self.position.partition,
            offset = self.position.offset,
            key = self.position.key.as_deref(),
            record_id = self.record_id,
            panic = self.message,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("record", span_name = name, flow = self.flow, offset = self.position.offset)
    }
}
