// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Micro-batch lifecycle events.

use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

use crate::errors::BatchError;
use crate::observability::messages::StructuredLog;

/// Scheduler task started draining the queue.
///
/// # Log Level
/// `info!`
pub struct SchedulerStarted<'a> {
    pub flow: &'a str,
    pub micro_batch_size: usize,
    pub workers: usize,
    pub drain_interval: Duration,
}

impl Display for SchedulerStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Scheduler started for flow '{}': micro_batch_size={}, workers={}, drain_interval={:?}",
            self.flow, self.micro_batch_size, self.workers, self.drain_interval
        )
    }
}

impl StructuredLog for SchedulerStarted<'_> {
    fn log(&self) {
        tracing::info!(
            flow = self.flow,
            micro_batch_size = self.micro_batch_size,
            workers = self.workers,
            drain_interval_ms = self.drain_interval.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("scheduler", span_name = name, flow = self.flow)
    }
}

/// Scheduler task stopped, either cancelled or because the queue closed.
///
/// # Log Level
/// `info!`
pub struct SchedulerStopped {
    pub batches: u64,
    pub cancelled: bool,
}

impl Display for SchedulerStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let reason = if self.cancelled { "cancelled" } else { "queue closed" };
        write!(
            f,
            "Scheduler stopped ({}) after {} micro-batch(es)",
            reason, self.batches
        )
    }
}

impl StructuredLog for SchedulerStopped {
    fn log(&self) {
        tracing::info!(batches = self.batches, cancelled = self.cancelled, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("scheduler", span_name = name)
    }
}

/// A micro-batch was drained and handed to the worker pool.
///
/// # Log Level
/// `debug!`
pub struct BatchDispatched {
    pub batch: u64,
    pub size: usize,
    pub first_offset: u64,
    pub last_offset: u64,
}

impl Display for BatchDispatched {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatching micro-batch #{}: {} record(s), offsets {}..={}",
            self.batch, self.size, self.first_offset, self.last_offset
        )
    }
}

impl StructuredLog for BatchDispatched {
    fn log(&self) {
        tracing::debug!(
            batch = self.batch,
            size = self.size,
            first_offset = self.first_offset,
            last_offset = self.last_offset,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "micro_batch",
            span_name = name,
            batch = self.batch,
            size = self.size,
            first_offset = self.first_offset,
            last_offset = self.last_offset,
        )
    }
}

/// A micro-batch went through the flow and the downstream stage.
///
/// # Log Level
/// `info!`
pub struct BatchCompleted {
    pub batch: u64,
    pub input: usize,
    pub surviving: usize,
    pub scored: usize,
    pub stored: u64,
    pub duration: Duration,
}

impl Display for BatchCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Micro-batch #{} completed: input={}, surviving={}, scored={}, stored={}, duration={:?}",
            self.batch, self.input, self.surviving, self.scored, self.stored, self.duration
        )
    }
}

impl StructuredLog for BatchCompleted {
    fn log(&self) {
        tracing::info!(
            batch = self.batch,
            input = self.input,
            surviving = self.surviving,
            scored = self.scored,
            stored = self.stored,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("micro_batch", span_name = name, batch = self.batch)
    }
}

/// The downstream stage failed for the whole micro-batch. Not retried.
///
/// # Log Level
/// `error!`
pub struct BatchFailed<'a> {
    pub batch: u64,
    pub size: usize,
    pub first_offset: u64,
    pub last_offset: u64,
    pub error: &'a BatchError,
}

impl Display for BatchFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Micro-batch #{} ({} record(s), offsets {}..={}) failed: {}",
            self.batch, self.size, self.first_offset, self.last_offset, self.error
        )
    }
}

impl StructuredLog for BatchFailed<'_> {
    fn log(&self) {
        tracing::error!(
            batch = self.batch,
            size = self.size,
            first_offset = self.first_offset,
            last_offset = self.last_offset,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("micro_batch", span_name = name, batch = self.batch)
    }
}
