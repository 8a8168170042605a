// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::{Display, Formatter};
use tracing::Span;

use crate::observability::messages::StructuredLog;

/// The scoring service answered for an id that was not in the request.
///
/// # Log Level
/// `warn!`
pub struct UnknownScoringId<'a> {
    pub uuid: &'a str,
}

impl Display for UnknownScoringId<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Scoring output for unknown id '{}' ignored", self.uuid)
    }
}

impl StructuredLog for UnknownScoringId<'_> {
    fn log(&self) {
        tracing::warn!(uuid = self.uuid, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("detection", span_name = name, uuid = self.uuid)
    }
}

/// A surviving record has no id and cannot be scored.
///
/// # Log Level
/// `warn!`
pub struct RecordWithoutId<'a> {
    pub id_field: &'a str,
}

impl Display for RecordWithoutId<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Record without '{}' skipped before scoring", self.id_field)
    }
}

impl StructuredLog for RecordWithoutId<'_> {
    fn log(&self) {
        tracing::warn!(id_field = self.id_field, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("detection", span_name = name)
    }
}

/// Scores were received and stored for a micro-batch.
///
/// # Log Level
/// `debug!`
pub struct ScoresStored<'a> {
    pub requested: usize,
    pub scored: usize,
    pub stored: u64,
    pub table: &'a str,
}

impl Display for ScoresStored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stored {} row(s) into {} ({} scored of {} requested)",
            self.stored, self.table, self.scored, self.requested
        )
    }
}

impl StructuredLog for ScoresStored<'_> {
    fn log(&self) {
        tracing::debug!(
            requested = self.requested,
            scored = self.scored,
            stored = self.stored,
            table = self.table,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("detection", span_name = name, table = self.table)
    }
}
