// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::WorkItem;
use crate::flow::Flow;
use crate::observability::messages::flow::{RecordFailed, RecordFiltered, RecordPanicked};
use crate::observability::messages::StructuredLog;
use crate::record::Record;

/// Runs every record of a micro-batch through a flow in parallel.
///
/// At most `workers` records are in flight at once. Each record is isolated:
/// an error or a panic while running it is logged with its position and id
/// and only that record is lost.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: usize,
    id_field: Arc<str>,
}

impl WorkerPool {
    pub fn new(workers: usize, id_field: impl Into<Arc<str>>) -> Self {
        Self {
            workers: workers.max(1),
            id_field: id_field.into(),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Map the batch through `flow` and return the surviving records.
    ///
    /// Returns once every record has finished. Output order is not the input order.
    pub async fn run_batch(&self, flow: &Arc<Flow>, items: Vec<WorkItem>) -> Vec<Record> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for item in items {
            let flow = Arc::clone(flow);
            let semaphore = Arc::clone(&semaphore);
            let id_field = Arc::clone(&self.id_field);

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                run_isolated(&flow, &id_field, item).await
            });
        }

        let mut surviving = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(record)) => surviving.push(record),
                Ok(None) => {}
                Err(e) => tracing::error!(error = %e, "Worker task did not complete"),
            }
        }
        surviving
    }
}

async fn run_isolated(flow: &Flow, id_field: &str, item: WorkItem) -> Option<Record> {
    let WorkItem { position, record } = item;
    let record_id = record.text(id_field);

    match AssertUnwindSafe(flow.run(record)).catch_unwind().await {
        Ok(Ok(Some(record))) => Some(record),
        Ok(Ok(None)) => {
            RecordFiltered {
                flow: flow.name(),
                position: &position,
                record_id: record_id.as_deref(),
            }
            .log();
            None
        }
        Ok(Err(error)) => {
            RecordFailed {
                position: &position,
                record_id: record_id.as_deref(),
                error: &error,
            }
            .log();
            None
        }
        Err(payload) => {
            RecordPanicked {
                flow: flow.name(),
                position: &position,
                record_id: record_id.as_deref(),
                message: &panic_message(payload.as_ref()),
            }
            .log();
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let p: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(p.as_ref()), "boom");
        let p: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(p.as_ref()), "bang");
        let p: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(p.as_ref()), "unknown panic");
    }

    #[test]
    fn test_zero_workers_is_one() {
        assert_eq!(WorkerPool::new(0, "uuid").workers(), 1);
    }
}
