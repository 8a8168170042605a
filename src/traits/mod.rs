// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod handler;
pub mod ports;
pub mod sink;

pub use handler::ProcessHandler;
pub use ports::{
    LookupQuery, RelationalLookup, RelationalStore, ScoringInput, ScoringOutput, ScoringPort,
};
pub use sink::{BatchReport, BatchSink};
