// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One handler per `(kind, engine)` pairing, chosen once when a step is built.

mod db_query;
mod operator;

pub use db_query::{DbQuery, DerivedQueryHandler, FilterQueryHandler};
pub use operator::{DerivedOperatorHandler, FilterOperatorHandler};

use async_trait::async_trait;

use crate::errors::ProcessError;
use crate::record::Record;
use crate::traits::ProcessHandler;

/// The closed set of step behaviors.
pub enum Handler {
    DerivedQuery(DerivedQueryHandler),
    FilterQuery(FilterQueryHandler),
    DerivedOperator(DerivedOperatorHandler),
    FilterOperator(FilterOperatorHandler),
}

#[async_trait]
impl ProcessHandler for Handler {
    async fn handle(&self, record: Record) -> Result<Option<Record>, ProcessError> {
        match self {
            Handler::DerivedQuery(h) => h.handle(record).await,
            Handler::FilterQuery(h) => h.handle(record).await,
            Handler::DerivedOperator(h) => h.handle(record).await,
            Handler::FilterOperator(h) => h.handle(record).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Handler::DerivedQuery(h) => h.name(),
            Handler::FilterQuery(h) => h.name(),
            Handler::DerivedOperator(h) => h.name(),
            Handler::FilterOperator(h) => h.name(),
        }
    }
}
