// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::ProcessError;
use crate::record::Record;

/// One pipeline step's behavior.
///
/// A handler takes ownership of the record and either hands it back, possibly
/// mutated, or returns `None` to drop it. Handlers hold no per-record state,
/// so one instance serves many records concurrently.
#[async_trait]
pub trait ProcessHandler: Send + Sync {
    async fn handle(&self, record: Record) -> Result<Option<Record>, ProcessError>;

    fn name(&self) -> &'static str;
}
