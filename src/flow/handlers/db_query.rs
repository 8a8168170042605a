// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::ProcessError;
use crate::flow::{Database, FieldSpec, OnEmpty};
use crate::record::Record;
use crate::traits::{LookupQuery, ProcessHandler, RelationalLookup};

/// A loaded query bound to its target database.
#[derive(Debug, Clone, PartialEq)]
pub struct DbQuery {
    pub database: Database,
    pub sql: String,
    pub field_specs: Vec<FieldSpec>,
}

impl DbQuery {
    fn bind<'a>(&'a self, params: &'a Record) -> LookupQuery<'a> {
        LookupQuery {
            database: self.database,
            sql: &self.sql,
            field_specs: &self.field_specs,
            params,
        }
    }
}

/// Merges the first result row into the record. No row leaves it unchanged.
pub struct DerivedQueryHandler {
    query: DbQuery,
    lookup: Arc<dyn RelationalLookup>,
}

impl DerivedQueryHandler {
    pub fn new(query: DbQuery, lookup: Arc<dyn RelationalLookup>) -> Self {
        Self { query, lookup }
    }
}

#[async_trait]
impl ProcessHandler for DerivedQueryHandler {
    async fn handle(&self, mut record: Record) -> Result<Option<Record>, ProcessError> {
        let row = self.lookup.load_one(self.query.bind(&record)).await?;
        if let Some(row) = row.filter(|r| !r.is_empty()) {
            record.merge(row);
        }
        Ok(Some(record))
    }

    fn name(&self) -> &'static str {
        "derived_db_query"
    }
}

/// Keeps the record when the boolean query says so.
///
/// A lookup failure is an error for the record, so it is dropped and logged
/// rather than waved through. A query with no row follows `on_empty`.
pub struct FilterQueryHandler {
    query: DbQuery,
    on_empty: OnEmpty,
    lookup: Arc<dyn RelationalLookup>,
}

impl FilterQueryHandler {
    pub fn new(query: DbQuery, on_empty: OnEmpty, lookup: Arc<dyn RelationalLookup>) -> Self {
        Self {
            query,
            on_empty,
            lookup,
        }
    }
}

#[async_trait]
impl ProcessHandler for FilterQueryHandler {
    async fn handle(&self, record: Record) -> Result<Option<Record>, ProcessError> {
        let keep = match self.lookup.load_bool(self.query.bind(&record)).await? {
            Some(verdict) => verdict,
            None => self.on_empty == OnEmpty::Keep,
        };
        Ok(keep.then_some(record))
    }

    fn name(&self) -> &'static str {
        "filter_db_query"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::StaticLookup;
    use crate::errors::LookupError;
    use crate::flow::FieldType;
    use crate::record::Value;
    use crate::record;

    fn query() -> DbQuery {
        DbQuery {
            database: Database::Singlestore,
            sql: "SELECT grade FROM cust WHERE cust_id = :cust_id".to_string(),
            field_specs: vec![
                FieldSpec::new("grade", FieldType::String),
                FieldSpec::new("cust_id", FieldType::String),
            ],
        }
    }

    #[tokio::test]
    async fn test_derived_merges_row() {
        let lookup = Arc::new(StaticLookup::with_row(record! { "grade" => "VIP", "cust_id" => "C9" }));
        let handler = DerivedQueryHandler::new(query(), lookup.clone());

        let out = handler
            .handle(record! { "cust_id" => "C1", "amt" => 10 })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(out.get("grade"), Some(&Value::from("VIP")));
        // row fields overwrite existing keys
        assert_eq!(out.get("cust_id"), Some(&Value::from("C9")));
        assert_eq!(out.len(), 3);
        assert_eq!(lookup.calls(), 1);
        assert_eq!(lookup.last_params().and_then(|p| p.text("amt")).as_deref(), Some("10"));
    }

    #[tokio::test]
    async fn test_derived_without_row_passes_through() {
        let handler = DerivedQueryHandler::new(query(), Arc::new(StaticLookup::empty()));
        let input = record! { "cust_id" => "C1" };
        let out = handler.handle(input.clone()).await.unwrap();
        assert_eq!(out, Some(input));
    }

    #[tokio::test]
    async fn test_filter_follows_verdict() {
        let keep = FilterQueryHandler::new(query(), OnEmpty::Keep, Arc::new(StaticLookup::with_bool(true)));
        assert!(keep.handle(record! { "x" => 1 }).await.unwrap().is_some());

        let drop = FilterQueryHandler::new(query(), OnEmpty::Keep, Arc::new(StaticLookup::with_bool(false)));
        assert!(drop.handle(record! { "x" => 1 }).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filter_on_empty_policy() {
        let keep = FilterQueryHandler::new(query(), OnEmpty::Keep, Arc::new(StaticLookup::empty()));
        assert!(keep.handle(record! { "x" => 1 }).await.unwrap().is_some());

        let drop = FilterQueryHandler::new(query(), OnEmpty::Drop, Arc::new(StaticLookup::empty()));
        assert!(drop.handle(record! { "x" => 1 }).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_is_an_error_not_a_pass() {
        let handler = FilterQueryHandler::new(query(), OnEmpty::Keep, Arc::new(StaticLookup::failing()));
        let err = handler.handle(record! { "x" => 1 }).await.unwrap_err();
        assert!(matches!(err, ProcessError::Lookup(LookupError::Query { .. })));
    }
}
