// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::{WorkItem, WorkerPool};
use crate::errors::BatchError;
use crate::flow::Flow;
use crate::observability::messages::scheduler::{
    BatchCompleted, BatchDispatched, BatchFailed, SchedulerStarted, SchedulerStopped,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{BatchReport, BatchSink};

/// Timing and sizing of the drain cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub micro_batch_size: usize,
    /// How long one cycle waits for the first item of a batch.
    pub poll_wait: Duration,
    /// Period of the drain cycle.
    pub drain_interval: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            micro_batch_size: 100,
            poll_wait: Duration::from_millis(1000),
            drain_interval: Duration::from_millis(10),
        }
    }
}

/// Result of one drain attempt.
#[derive(Debug)]
pub enum Drained {
    Batch(Vec<WorkItem>),
    /// Nothing arrived within the poll wait.
    Idle,
    /// Every producer is gone and the queue is empty.
    Closed,
}

/// Single consumer of the ingest queue.
///
/// Each cycle drains one micro-batch, runs it through the flow on the worker
/// pool, and hands the survivors to the sink. Batches are handled one after
/// another; the next drain starts only after the previous batch's sink call
/// has returned.
pub struct MicroBatchScheduler {
    flow: Arc<Flow>,
    pool: WorkerPool,
    sink: Arc<dyn BatchSink>,
    settings: SchedulerSettings,
}

impl MicroBatchScheduler {
    pub fn new(
        flow: Arc<Flow>,
        pool: WorkerPool,
        sink: Arc<dyn BatchSink>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            flow,
            pool,
            sink,
            settings,
        }
    }

    /// Wait briefly for one item, then take up to `micro_batch_size - 1`
    /// more that are already queued.
    pub async fn drain(&self, receiver: &mut mpsc::Receiver<WorkItem>) -> Drained {
        let first = match tokio::time::timeout(self.settings.poll_wait, receiver.recv()).await {
            Err(_) => return Drained::Idle,
            Ok(None) => return Drained::Closed,
            Ok(Some(item)) => item,
        };

        let limit = self.settings.micro_batch_size.max(1);
        let mut batch = Vec::with_capacity(limit);
        batch.push(first);
        while batch.len() < limit {
            match receiver.try_recv() {
                Ok(item) => batch.push(item),
                Err(_) => break,
            }
        }
        Drained::Batch(batch)
    }

    /// Run one micro-batch through the flow and the sink.
    pub async fn process(&self, items: Vec<WorkItem>) -> Result<(usize, BatchReport), BatchError> {
        let surviving = self.pool.run_batch(&self.flow, items).await;
        let count = surviving.len();
        let report = self.sink.accept(surviving).await?;
        Ok((count, report))
    }

    /// Drain until the queue closes or `cancel` fires. Returns the number of
    /// micro-batches dispatched.
    ///
    /// Cancellation is only observed between batches, so a batch already
    /// drained always runs to completion. Items still queued are abandoned.
    pub async fn run(self, mut receiver: mpsc::Receiver<WorkItem>, cancel: CancellationToken) -> u64 {
        SchedulerStarted {
            flow: self.flow.name(),
            micro_batch_size: self.settings.micro_batch_size,
            workers: self.pool.workers(),
            drain_interval: self.settings.drain_interval,
        }
        .log();

        let mut ticker = tokio::time::interval(self.settings.drain_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut batches = 0u64;
        let cancelled = loop {
            tokio::select! {
                _ = cancel.cancelled() => break true,
                _ = ticker.tick() => {}
            }

            let drained = tokio::select! {
                _ = cancel.cancelled() => break true,
                drained = self.drain(&mut receiver) => drained,
            };

            match drained {
                Drained::Idle => continue,
                Drained::Closed => break false,
                Drained::Batch(items) => {
                    batches += 1;
                    self.dispatch(batches, items).await;
                }
            }
        };

        SchedulerStopped { batches, cancelled }.log();
        batches
    }

    async fn dispatch(&self, batch: u64, items: Vec<WorkItem>) {
        let size = items.len();
        let first_offset = items.first().map(|i| i.position.offset).unwrap_or_default();
        let last_offset = items.last().map(|i| i.position.offset).unwrap_or_default();

        let dispatched = BatchDispatched {
            batch,
            size,
            first_offset,
            last_offset,
        };
        dispatched.log();
        let span = dispatched.span("dispatch");

        let started = Instant::now();
        match self.process(items).instrument(span).await {
            Ok((surviving, report)) => BatchCompleted {
                batch,
                input: size,
                surviving,
                scored: report.scored,
                stored: report.stored,
                duration: started.elapsed(),
            }
            .log(),
            Err(error) => BatchFailed {
                batch,
                size,
                first_offset,
                last_offset,
                error: &error,
            }
            .log(),
        }
    }
}
