// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Directory holding `flow/<name>/spec.json` and the query files
pub const DEFAULT_CONFIG_DIR: &str = "./conf";
pub const DEFAULT_FLOW_LIST_PATH: &str = "./conf/flow-list.txt";
/// Flow every ingested record is run through
pub const DEFAULT_TARGET_FLOW: &str = "feature-stream";
pub const DEFAULT_EXCLUDE_FROM_FEATURES: &str = "uuid,dt";
pub const DEFAULT_ID_FIELD: &str = "uuid";
pub const DEFAULT_EVENT_NAME: &str = "raw-tx-log";

/// Maximum number of records buffered between ingestion and the scheduler
pub const DEFAULT_QUEUE_CAPACITY: usize = 500_000;
pub const DEFAULT_MICRO_BATCH_SIZE: usize = 100;
/// How long `enqueue` waits for space before shedding (ms)
pub const DEFAULT_ENQUEUE_WAIT_MS: u64 = 1000;
/// How long a drain cycle waits for the first item of a batch (ms)
pub const DEFAULT_POLL_WAIT_MS: u64 = 1000;
pub const DEFAULT_DRAIN_INTERVAL_MS: u64 = 10;
pub const DEFAULT_WORKERS: usize = 4;

pub const DEFAULT_SCORING_CONTEXT_PATH: &str = "/predict";
/// Connect and request timeout of the scoring call (ms)
pub const DEFAULT_SCORING_TIMEOUT_MS: u64 = 1000;

pub const DEFAULT_OUTPUT_PATH: &str = "./out/fraud_scoring_result.jsonl";

pub const DEFAULT_LOG_LEVEL: &str = "info";
