// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

use super::handlers::{
    DbQuery, DerivedOperatorHandler, DerivedQueryHandler, FilterOperatorHandler,
    FilterQueryHandler, Handler,
};
use super::spec::{DbQueryAttribute, OperatorAttribute, ProcessEngine, ProcessKind, ProcessSpec};
use crate::errors::{ConstructionError, ProcessError};
use crate::record::Record;
use crate::traits::{ProcessHandler, RelationalLookup};

/// Where a step is being built, for error reporting and file resolution.
pub(crate) struct StepContext<'a> {
    pub flow: &'a str,
    pub step: usize,
    pub base_dir: &'a Path,
    pub lookup: &'a Arc<dyn RelationalLookup>,
}

/// One immutable pipeline step.
pub struct Process {
    kind: ProcessKind,
    engine: ProcessEngine,
    handler: Handler,
}

impl Process {
    pub fn new(kind: ProcessKind, engine: ProcessEngine, handler: Handler) -> Self {
        Self {
            kind,
            engine,
            handler,
        }
    }

    pub fn kind(&self) -> ProcessKind {
        self.kind
    }

    pub fn engine(&self) -> ProcessEngine {
        self.engine
    }

    pub fn handler_name(&self) -> &'static str {
        self.handler.name()
    }

    pub async fn handle(&self, record: Record) -> Result<Option<Record>, ProcessError> {
        self.handler.handle(record).await
    }

    /// Type the attribute block for the step's engine and pick its handler.
    pub(crate) fn build(spec: &ProcessSpec, ctx: &StepContext<'_>) -> Result<Self, ConstructionError> {
        let handler = match spec.detail_type {
            ProcessEngine::Operator => {
                let attr: OperatorAttribute = parse_attribute(spec, ctx)?;
                operator_handler(spec.kind, attr, ctx)?
            }
            ProcessEngine::DbQuery => {
                let attr: DbQueryAttribute = parse_attribute(spec, ctx)?;
                db_query_handler(spec.kind, attr, ctx)?
            }
            ProcessEngine::ReqApi => {
                return Err(ConstructionError::EngineNotImplemented {
                    flow: ctx.flow.to_string(),
                    step: ctx.step,
                    engine: spec.detail_type,
                })
            }
        };

        Ok(Self::new(spec.kind, spec.detail_type, handler))
    }
}

fn parse_attribute<T: DeserializeOwned>(
    spec: &ProcessSpec,
    ctx: &StepContext<'_>,
) -> Result<T, ConstructionError> {
    serde_json::from_value(spec.attribute.clone()).map_err(|e| invalid(ctx, e.to_string()))
}

fn operator_handler(
    kind: ProcessKind,
    attr: OperatorAttribute,
    ctx: &StepContext<'_>,
) -> Result<Handler, ConstructionError> {
    match kind {
        ProcessKind::Derived => {
            let assignments = attr
                .exprs
                .into_iter()
                .enumerate()
                .map(|(i, e)| match e.alias {
                    Some(alias) if !alias.trim().is_empty() => Ok((e.expr, alias)),
                    _ => Err(invalid(ctx, format!("exprs[{i}] is missing 'as'"))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Handler::DerivedOperator(DerivedOperatorHandler::new(assignments)))
        }
        ProcessKind::Filter => {
            let conditions = attr.exprs.into_iter().map(|e| e.expr).collect();
            Ok(Handler::FilterOperator(FilterOperatorHandler::new(conditions)))
        }
    }
}

fn db_query_handler(
    kind: ProcessKind,
    attr: DbQueryAttribute,
    ctx: &StepContext<'_>,
) -> Result<Handler, ConstructionError> {
    let path = ctx.base_dir.join(&attr.query_file_path);
    let sql = std::fs::read_to_string(&path).map_err(|source| ConstructionError::Io {
        path: path.clone(),
        source,
    })?;
    if sql.trim().is_empty() {
        return Err(invalid(ctx, format!("query file '{}' is empty", path.display())));
    }

    let query = DbQuery {
        database: attr.database,
        sql: sql.trim().to_string(),
        field_specs: attr.field_specs,
    };
    let lookup = Arc::clone(ctx.lookup);

    match kind {
        ProcessKind::Derived => {
            if query.field_specs.is_empty() {
                return Err(invalid(ctx, "DERIVED query needs 'fieldSpecs'".to_string()));
            }
            Ok(Handler::DerivedQuery(DerivedQueryHandler::new(query, lookup)))
        }
        ProcessKind::Filter => Ok(Handler::FilterQuery(FilterQueryHandler::new(
            query,
            attr.on_empty,
            lookup,
        ))),
    }
}

fn invalid(ctx: &StepContext<'_>, reason: String) -> ConstructionError {
    ConstructionError::InvalidAttribute {
        flow: ctx.flow.to_string(),
        step: ctx.step,
        reason,
    }
}
