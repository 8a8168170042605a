// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::BatchError;
use crate::record::Record;

/// What the downstream stage did with one micro-batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub scored: usize,
    pub stored: u64,
}

/// Consumer of a micro-batch's surviving records, taken as a single unit.
#[async_trait]
pub trait BatchSink: Send + Sync {
    async fn accept(&self, batch: Vec<Record>) -> Result<BatchReport, BatchError>;
}
