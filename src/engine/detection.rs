// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Detection stage: feature selection, scoring and result storage for the
//! surviving records of a micro-batch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{BatchError, StoreError};
use crate::observability::messages::detection::{RecordWithoutId, ScoresStored, UnknownScoringId};
use crate::observability::messages::StructuredLog;
use crate::record::{Record, Value};
use crate::traits::{BatchReport, BatchSink, RelationalStore, ScoringInput, ScoringOutput, ScoringPort};

pub const RESULT_TABLE: &str = "fraud_scoring_result";

/// Columns of the result table, in insert order. Each row carries one field per column.
pub const RESULT_COLUMNS: [&str; 12] = [
    "created_at",
    "uuid",
    "event_name",
    "dt",
    "cust_id",
    "acct_nbr",
    "model_name",
    "model_version",
    "prediction",
    "probability",
    "threshold",
    "features",
];

/// Bulk insert statement with one named parameter per column.
pub fn insert_statement() -> String {
    let params = RESULT_COLUMNS
        .iter()
        .map(|c| format!(":{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {RESULT_TABLE} ({}) VALUES ({params})",
        RESULT_COLUMNS.join(", ")
    )
}

/// Record fields copied onto the stored result.
#[derive(Debug, Clone, PartialEq, Default)]
struct Identifiers {
    dt: Option<String>,
    cust_id: Option<String>,
    acct_nbr: Option<String>,
}

impl Identifiers {
    fn of(record: &Record) -> Self {
        Self {
            dt: record.text("dt"),
            cust_id: record.text("cust_id"),
            acct_nbr: record.text("acct_nbr"),
        }
    }
}

/// Scores each micro-batch with one call and stores every verdict with one bulk insert.
pub struct DetectionService {
    scoring: Arc<dyn ScoringPort>,
    store: Arc<dyn RelationalStore>,
    excluded: Vec<String>,
    id_field: String,
    event_name: String,
    statement: String,
}

impl DetectionService {
    pub fn new(
        scoring: Arc<dyn ScoringPort>,
        store: Arc<dyn RelationalStore>,
        excluded: Vec<String>,
        id_field: impl Into<String>,
        event_name: impl Into<String>,
    ) -> Self {
        Self {
            scoring,
            store,
            excluded,
            id_field: id_field.into(),
            event_name: event_name.into(),
            statement: insert_statement(),
        }
    }

    /// Split the batch into scoring inputs and the identifiers to store with each.
    fn select_features(&self, batch: Vec<Record>) -> (Vec<ScoringInput>, HashMap<String, Identifiers>) {
        let mut inputs = Vec::with_capacity(batch.len());
        let mut identifiers = HashMap::with_capacity(batch.len());

        for record in batch {
            let Some(uuid) = record.text(&self.id_field) else {
                RecordWithoutId {
                    id_field: &self.id_field,
                }
                .log();
                continue;
            };
            identifiers.insert(uuid.clone(), Identifiers::of(&record));
            inputs.push(ScoringInput {
                uuid,
                features: record.without(&self.excluded),
            });
        }

        (inputs, identifiers)
    }

    fn result_row(
        &self,
        created_at: DateTime<Utc>,
        output: ScoringOutput,
        identifiers: &Identifiers,
        features: &Record,
    ) -> Result<Record, StoreError> {
        let mut row = Record::new();
        row.insert("created_at", created_at);
        row.insert("uuid", output.uuid);
        row.insert("event_name", self.event_name.as_str());
        row.insert("dt", identifiers.dt.clone());
        row.insert("cust_id", identifiers.cust_id.clone());
        row.insert("acct_nbr", identifiers.acct_nbr.clone());
        row.insert("model_name", output.model_name);
        row.insert("model_version", output.model_version);
        row.insert("prediction", output.prediction.to_string());
        row.insert("probability", output.probability);
        row.insert("threshold", output.threshold);
        row.insert("features", Value::String(serde_json::to_string(features)?));
        Ok(row)
    }
}

#[async_trait]
impl BatchSink for DetectionService {
    async fn accept(&self, batch: Vec<Record>) -> Result<BatchReport, BatchError> {
        let (inputs, identifiers) = self.select_features(batch);
        if inputs.is_empty() {
            return Ok(BatchReport::default());
        }

        let outputs = self.scoring.score(&inputs).await?;

        let features: HashMap<&str, &Record> = inputs
            .iter()
            .map(|i| (i.uuid.as_str(), &i.features))
            .collect();

        let created_at = Utc::now();
        let mut rows = Vec::with_capacity(outputs.len());
        for output in outputs {
            let (Some(ids), Some(scored)) = (
                identifiers.get(&output.uuid),
                features.get(output.uuid.as_str()),
            ) else {
                UnknownScoringId { uuid: &output.uuid }.log();
                continue;
            };
            rows.push(self.result_row(created_at, output, ids, scored)?);
        }

        if rows.is_empty() {
            return Ok(BatchReport::default());
        }

        let stored = self.store.store(&self.statement, &rows).await?;
        ScoresStored {
            requested: inputs.len(),
            scored: rows.len(),
            stored,
            table: RESULT_TABLE,
        }
        .log();

        Ok(BatchReport {
            scored: rows.len(),
            stored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{FailingScoring, RecordingStore, StaticScoring};
    use crate::record;

    fn service(scoring: Arc<dyn ScoringPort>, store: Arc<RecordingStore>) -> DetectionService {
        DetectionService::new(
            scoring,
            store,
            vec!["uuid".to_string(), "dt".to_string()],
            "uuid",
            "raw-tx-log",
        )
    }

    fn tx(uuid: &str) -> Record {
        record! {
            "uuid" => uuid,
            "dt" => "20240301",
            "cust_id" => "C1",
            "acct_nbr" => "A1",
            "tx_amt" => 10000,
            "is_match" => "1",
        }
    }

    #[test]
    fn test_insert_statement_lists_every_column() {
        let sql = insert_statement();
        assert!(sql.starts_with("INSERT INTO fraud_scoring_result (created_at, uuid, event_name,"));
        assert!(sql.ends_with(":threshold, :features)"));
    }

    #[tokio::test]
    async fn test_empty_batch_calls_nothing() {
        let scoring = Arc::new(StaticScoring::new(0.9, 1));
        let store = Arc::new(RecordingStore::new());
        let report = service(scoring.clone(), store.clone()).accept(Vec::new()).await.unwrap();

        assert_eq!(report, BatchReport::default());
        assert_eq!(scoring.calls(), 0);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_scores_and_stores_with_features_excluded() {
        let scoring = Arc::new(StaticScoring::new(0.75, 1));
        let store = Arc::new(RecordingStore::new());
        let report = service(scoring.clone(), store.clone())
            .accept(vec![tx("u1"), tx("u2")])
            .await
            .unwrap();

        assert_eq!(report, BatchReport { scored: 2, stored: 2 });
        assert_eq!(scoring.calls(), 1);

        let inputs = scoring.last_inputs();
        assert_eq!(inputs.len(), 2);
        let keys: Vec<&str> = inputs[0].features.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["cust_id", "acct_nbr", "tx_amt", "is_match"]);

        let (statement, rows) = store.last().unwrap();
        assert_eq!(statement, insert_statement());
        let row = &rows[0];
        assert_eq!(row.keys().map(String::as_str).collect::<Vec<_>>(), RESULT_COLUMNS.to_vec());
        assert_eq!(row.get("event_name"), Some(&Value::from("raw-tx-log")));
        assert_eq!(row.get("dt"), Some(&Value::from("20240301")));
        assert_eq!(row.get("prediction"), Some(&Value::from("1")));
        assert_eq!(row.get("probability"), Some(&Value::Float(0.75)));
        assert_eq!(
            row.text("features").as_deref(),
            Some(r#"{"cust_id":"C1","acct_nbr":"A1","tx_amt":10000,"is_match":"1"}"#)
        );
    }

    #[tokio::test]
    async fn test_batch_rows_share_created_at() {
        let store = Arc::new(RecordingStore::new());
        service(Arc::new(StaticScoring::new(0.2, 0)), store.clone())
            .accept(vec![tx("u1"), tx("u2"), tx("u3")])
            .await
            .unwrap();

        let (_, rows) = store.last().unwrap();
        let first = rows[0].get("created_at").cloned();
        assert!(matches!(first, Some(Value::Timestamp(_))));
        assert!(rows.iter().all(|row| row.get("created_at").cloned() == first));
    }

    #[tokio::test]
    async fn test_records_without_id_are_not_scored() {
        let scoring = Arc::new(StaticScoring::new(0.1, 0));
        let store = Arc::new(RecordingStore::new());
        let report = service(scoring.clone(), store.clone())
            .accept(vec![record! { "tx_amt" => 5 }, tx("u1")])
            .await
            .unwrap();

        assert_eq!(report.scored, 1);
        assert_eq!(scoring.last_inputs().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_scoring_ids_are_skipped() {
        let scoring = Arc::new(StaticScoring::new(0.5, 1).with_extra_output("ghost"));
        let store = Arc::new(RecordingStore::new());
        let report = service(scoring, store.clone()).accept(vec![tx("u1")]).await.unwrap();

        assert_eq!(report.scored, 1);
        assert_eq!(store.last().map(|(_, rows)| rows.len()), Some(1));
    }

    #[tokio::test]
    async fn test_scoring_failure_fails_batch_without_storing() {
        let store = Arc::new(RecordingStore::new());
        let err = service(Arc::new(FailingScoring), store.clone())
            .accept(vec![tx("u1")])
            .await
            .unwrap_err();

        assert!(matches!(err, BatchError::Scoring(_)));
        assert_eq!(store.calls(), 0);
    }
}
