// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::{Display, Formatter};
use tracing::Span;

use crate::engine::SourcePosition;
use crate::observability::messages::StructuredLog;

/// The queue stayed full for the whole wait; the item is dropped, never retried.
///
/// # Log Level
/// `warn!`
pub struct ItemShed<'a> {
    pub position: &'a SourcePosition,
    pub wait_ms: u64,
}

impl Display for ItemShed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Queue full for {}ms, dropping item at {}",
            self.wait_ms, self.position
        )
    }
}

impl StructuredLog for ItemShed<'_> {
    fn log(&self) {
        tracing::warn!(
            topic = %self.position.topic,
            partition = self.position.partition,
            offset = self.position.offset,
            key = self.position.key.as_deref(),
            wait_ms = self.wait_ms,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("ingestion", span_name = name, offset = self.position.offset)
    }
}

/// A null (tombstone) value was discarded before reaching the engine.
///
/// # Log Level
/// `warn!`
pub struct TombstoneDiscarded<'a> {
    pub position: &'a SourcePosition,
}

impl Display for TombstoneDiscarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Discarding tombstone at {}", self.position)
    }
}

impl StructuredLog for TombstoneDiscarded<'_> {
    fn log(&self) {
        tracing::warn!(
            topic = %self.position.topic,
            partition = self.position.partition,
            offset = self.position.offset,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("ingestion", span_name = name, offset = self.position.offset)
    }
}

/// An input line could not be read as a record.
///
/// # Log Level
/// `warn!`
pub struct MalformedInput<'a> {
    pub position: &'a SourcePosition,
    pub error: &'a dyn std::error::Error,
}

impl Display for MalformedInput<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Skipping malformed input at {}: {}", self.position, self.error)
    }
}

impl StructuredLog for MalformedInput<'_> {
    fn log(&self) {
        tracing::warn!(
            topic = %self.position.topic,
            offset = self.position.offset,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("ingestion", span_name = name, offset = self.position.offset)
    }
}

/// The source reached its end.
///
/// # Log Level
/// `info!`
pub struct IngestionFinished<'a> {
    pub source: &'a str,
    pub read: u64,
    pub accepted: u64,
    pub shed: u64,
    pub skipped: u64,
}

impl Display for IngestionFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Finished reading '{}': read={}, accepted={}, shed={}, skipped={}",
            self.source, self.read, self.accepted, self.shed, self.skipped
        )
    }
}

impl StructuredLog for IngestionFinished<'_> {
    fn log(&self) {
        tracing::info!(
            source = self.source,
            read = self.read,
            accepted = self.accepted,
            shed = self.shed,
            skipped = self.skipped,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("ingestion", span_name = name, source = self.source)
    }
}
