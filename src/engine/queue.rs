// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;

use crate::observability::messages::ingestion::ItemShed;
use crate::observability::messages::StructuredLog;
use crate::record::Record;

/// Where a record came from in its source stream. Used for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub topic: Arc<str>,
    pub partition: i32,
    pub offset: u64,
    pub key: Option<String>,
}

impl SourcePosition {
    pub fn new(topic: impl Into<Arc<str>>, partition: i32, offset: u64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
            key: None,
        }
    }

    pub fn with_key(mut self, key: Option<String>) -> Self {
        self.key = key;
        self
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}@{}", self.topic, self.partition, self.offset)?;
        if let Some(key) = &self.key {
            write!(f, " (key {})", key)?;
        }
        Ok(())
    }
}

/// One ingested record with its stream position.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub position: SourcePosition,
    pub record: Record,
}

impl WorkItem {
    pub fn new(position: SourcePosition, record: Record) -> Self {
        Self { position, record }
    }
}

/// Producer side of the bounded FIFO between ingestion and the scheduler.
///
/// Cloning gives another producer for the same queue. The scheduler sees the
/// queue as closed once every producer is dropped and the queue is empty.
#[derive(Debug, Clone)]
pub struct IngestQueue {
    sender: mpsc::Sender<WorkItem>,
    enqueue_wait: Duration,
}

impl IngestQueue {
    /// A queue holding at most `capacity` items. Capacity must be at least 1.
    pub fn bounded(capacity: usize, enqueue_wait: Duration) -> (Self, mpsc::Receiver<WorkItem>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            Self {
                sender,
                enqueue_wait,
            },
            receiver,
        )
    }

    /// Offer one item, waiting up to the configured time for space.
    ///
    /// Returns `false` when the queue stayed full for the whole wait or the
    /// scheduler is gone. A rejected item is logged and never retried.
    pub async fn enqueue(&self, item: WorkItem) -> bool {
        match self.sender.send_timeout(item, self.enqueue_wait).await {
            Ok(()) => true,
            Err(SendTimeoutError::Timeout(item)) | Err(SendTimeoutError::Closed(item)) => {
                ItemShed {
                    position: &item.position,
                    wait_ms: self.enqueue_wait.as_millis() as u64,
                }
                .log();
                false
            }
        }
    }
}
