// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declarative flow description as read from `spec.json`.
//!
//! ```json
//! {
//!   "name": "feature-stream",
//!   "processes": [
//!     { "type": "DERIVED", "detailType": "OPERATOR",
//!       "attribute": { "exprs": [ { "expr": "CONCAT(:cust_id, :acct_nbr)", "as": "key" } ] } },
//!     { "type": "FILTER", "detailType": "DB_QUERY",
//!       "attribute": { "database": "SINGLESTORE", "queryFilePath": "is_target.sql" } }
//!   ]
//! }
//! ```
//!
//! Attribute blocks stay as raw JSON here and are typed per engine when the
//! step is built, so an error can name the failing step.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::FieldSpec;

#[derive(Debug, Clone, Deserialize)]
pub struct FlowSpec {
    pub name: String,
    #[serde(default)]
    pub processes: Vec<ProcessSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSpec {
    #[serde(rename = "type")]
    pub kind: ProcessKind,
    pub detail_type: ProcessEngine,
    #[serde(default)]
    pub attribute: serde_json::Value,
}

/// DERIVED steps mutate and always continue; FILTER steps keep or drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessKind {
    Derived,
    Filter,
}

/// Where a step's decision or mutation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessEngine {
    DbQuery,
    /// Recognised in specs but not implemented; rejected at construction.
    ReqApi,
    Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Database {
    Singlestore,
    Goldilocks,
}

/// What a boolean query step does when the query returns no row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnEmpty {
    #[default]
    Keep,
    Drop,
}

/// One `(expression, alias)` pair of an OPERATOR step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Expr {
    pub expr: String,
    #[serde(rename = "as", default)]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperatorAttribute {
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbQueryAttribute {
    pub database: Database,
    pub query_file_path: String,
    #[serde(default)]
    pub field_specs: Vec<FieldSpec>,
    #[serde(default)]
    pub on_empty: OnEmpty,
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProcessKind::Derived => "DERIVED",
            ProcessKind::Filter => "FILTER",
        })
    }
}

impl fmt::Display for ProcessEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProcessEngine::DbQuery => "DB_QUERY",
            ProcessEngine::ReqApi => "REQ_API",
            ProcessEngine::Operator => "OPERATOR",
        })
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Database::Singlestore => "SINGLESTORE",
            Database::Goldilocks => "GOLDILOCKS",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_flow_spec() {
        let spec: FlowSpec = serde_json::from_value(json!({
            "name": "feature-stream",
            "processes": [
                { "type": "DERIVED", "detailType": "OPERATOR",
                  "attribute": { "exprs": [ { "expr": "1 + 1", "as": "two" } ] } },
                { "type": "FILTER", "detailType": "DB_QUERY",
                  "attribute": { "database": "GOLDILOCKS", "queryFilePath": "q.sql" } }
            ]
        }))
        .unwrap();

        assert_eq!(spec.name, "feature-stream");
        assert_eq!(spec.processes.len(), 2);
        assert_eq!(spec.processes[0].kind, ProcessKind::Derived);
        assert_eq!(spec.processes[1].detail_type, ProcessEngine::DbQuery);

        let attr: DbQueryAttribute =
            serde_json::from_value(spec.processes[1].attribute.clone()).unwrap();
        assert_eq!(attr.database, Database::Goldilocks);
        assert_eq!(attr.on_empty, OnEmpty::Keep);
        assert!(attr.field_specs.is_empty());
    }

    #[test]
    fn test_missing_processes_is_empty_flow() {
        let spec: FlowSpec = serde_json::from_value(json!({ "name": "noop" })).unwrap();
        assert!(spec.processes.is_empty());
    }

    #[test]
    fn test_unknown_enum_values_are_rejected() {
        let bad_kind = serde_json::from_value::<ProcessSpec>(json!({
            "type": "MUTATE", "detailType": "OPERATOR", "attribute": {}
        }));
        assert!(bad_kind.is_err());

        let bad_db = serde_json::from_value::<DbQueryAttribute>(json!({
            "database": "ORACLE", "queryFilePath": "q.sql"
        }));
        assert!(bad_db.is_err());
    }

    #[test]
    fn test_display_matches_wire_names() {
        assert_eq!(ProcessEngine::ReqApi.to_string(), "REQ_API");
        assert_eq!(
            serde_json::to_value(ProcessEngine::DbQuery).unwrap(),
            json!("DB_QUERY")
        );
        assert_eq!(Database::Singlestore.to_string(), "SINGLESTORE");
    }
}
