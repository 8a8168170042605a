// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Startup validation of the application config against its flow list.
//!
//! Every rule runs and every violation is reported together, so one failed
//! start shows everything that needs fixing:
//!
//! 1. **Sizing**: `workers`, `micro_batch_size` and `queue_capacity` are at least 1
//! 2. **Batch fits queue**: `micro_batch_size <= queue_capacity`
//! 3. **Routing**: `target_flow` appears in the flow list
//! 4. **Required values**: `scoring.base_url` and `engine.id_field` are not blank

use crate::config::AppConfig;
use crate::errors::ValidationError;

pub fn validate_config<S: AsRef<str>>(cfg: &AppConfig, flows: &[S]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let scheduler = &cfg.scheduler;

    for (option, value) in [
        ("scheduler.workers", scheduler.workers),
        ("scheduler.micro_batch_size", scheduler.micro_batch_size),
        ("scheduler.queue_capacity", scheduler.queue_capacity),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroSized { option });
        }
    }

    if scheduler.queue_capacity > 0 && scheduler.micro_batch_size > scheduler.queue_capacity {
        errors.push(ValidationError::BatchExceedsQueue {
            batch: scheduler.micro_batch_size,
            capacity: scheduler.queue_capacity,
        });
    }

    let target = cfg.engine.target_flow.as_str();
    if !flows.iter().any(|f| f.as_ref() == target) {
        errors.push(ValidationError::UnknownTargetFlow {
            flow: target.to_string(),
        });
    }

    if cfg.scoring.base_url.trim().is_empty() {
        errors.push(ValidationError::MissingValue {
            option: "scoring.base_url",
        });
    }
    if cfg.engine.id_field.trim().is_empty() {
        errors.push(ValidationError::MissingValue {
            option: "engine.id_field",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
