// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ingestion scheduling and the detection stage.
//!
//! ```text
//! source ──enqueue──▶ IngestQueue ──drain──▶ MicroBatchScheduler
//!                                                │
//!                                     WorkerPool (flow per record)
//!                                                │
//!                                     BatchSink (DetectionService)
//! ```

pub mod detection;
pub mod queue;
pub mod scheduler;
pub mod worker_pool;


pub use detection::DetectionService;
pub use queue::{IngestQueue, SourcePosition, WorkItem};
pub use scheduler::{Drained, MicroBatchScheduler, SchedulerSettings};
pub use worker_pool::WorkerPool;
