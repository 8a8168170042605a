// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::LookupError;
use crate::record::Record;
use crate::traits::{LookupQuery, RelationalLookup};

/// Lookup used when no database driver is wired in. Every call fails, so a
/// DB_QUERY step drops its record with a logged error instead of guessing.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredLookup;

#[async_trait]
impl RelationalLookup for UnconfiguredLookup {
    async fn load_one(&self, query: LookupQuery<'_>) -> Result<Option<Record>, LookupError> {
        Err(LookupError::Unavailable(query.database))
    }

    async fn load_bool(&self, query: LookupQuery<'_>) -> Result<Option<bool>, LookupError> {
        Err(LookupError::Unavailable(query.database))
    }
}
