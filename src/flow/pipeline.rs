// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::Process;
use crate::errors::PipelineError;
use crate::record::Record;

/// A named, ordered chain of steps. Immutable once built and shared
/// read-only by every record that runs through it.
pub struct Flow {
    name: String,
    processes: Vec<Process>,
}

impl Flow {
    pub fn new(name: impl Into<String>, processes: Vec<Process>) -> Self {
        Self {
            name: name.into(),
            processes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Fold the record through every step in order.
    ///
    /// Returns `Ok(None)` as soon as a step drops the record; later steps never
    /// see it. A step failure is attributed to this flow and the step's index.
    pub async fn run(&self, record: Record) -> Result<Option<Record>, PipelineError> {
        let mut current = record;
        for (step, process) in self.processes.iter().enumerate() {
            let outcome = process
                .handle(current)
                .await
                .map_err(|source| PipelineError {
                    flow: self.name.clone(),
                    step,
                    kind: process.kind(),
                    engine: process.engine(),
                    source,
                })?;
            match outcome {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

impl std::fmt::Debug for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.name)
            .field(
                "processes",
                &self
                    .processes
                    .iter()
                    .map(Process::handler_name)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
