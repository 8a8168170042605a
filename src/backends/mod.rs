// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Thin adapters behind the engine's collaborator ports.
//!
//! - **HTTP scoring**: [`HttpScoringClient`] implements `ScoringPort`
//! - **JSON-lines source**: [`JsonLinesSource`] feeds the ingest queue from a file or stdin
//! - **JSON-lines store**: [`JsonLinesStore`] implements `RelationalStore` for local runs
//! - **Unconfigured lookup**: [`UnconfiguredLookup`] fails every relational lookup
//!
//! The `stub` module (test builds only) holds in-memory versions of every port.

pub mod file_store;
pub mod http_scoring;
pub mod json_lines;
#[cfg(test)]
pub mod stub;
pub mod unconfigured;

pub use file_store::JsonLinesStore;
pub use http_scoring::HttpScoringClient;
pub use json_lines::{IngestStats, JsonLinesSource, ParsedLine};
pub use unconfigured::UnconfiguredLookup;
