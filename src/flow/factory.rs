// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::process::StepContext;
use super::{Flow, FlowSpec, Process};
use crate::errors::ConstructionError;
use crate::observability::messages::flow::FlowBuilt;
use crate::observability::messages::StructuredLog;
use crate::traits::RelationalLookup;

/// File name of a flow's spec inside its base directory.
pub const SPEC_FILE: &str = "spec.json";

/// Builds flows from `<config_dir>/flow/<name>/spec.json`.
///
/// DB_QUERY steps resolve their query files against the same per-flow
/// directory and share the one lookup collaborator handed in here.
pub struct FlowFactory {
    config_dir: PathBuf,
    lookup: Arc<dyn RelationalLookup>,
}

impl FlowFactory {
    pub fn new(config_dir: impl Into<PathBuf>, lookup: Arc<dyn RelationalLookup>) -> Self {
        Self {
            config_dir: config_dir.into(),
            lookup,
        }
    }

    /// Directory holding the spec and query files of flow `name`.
    pub fn base_dir(&self, name: &str) -> PathBuf {
        self.config_dir.join("flow").join(name)
    }

    /// Read and build the flow called `name`. Fails fast on the first bad step.
    pub fn create(&self, name: &str) -> Result<Flow, ConstructionError> {
        let base_dir = self.base_dir(name);
        let path = base_dir.join(SPEC_FILE);
        let text = std::fs::read_to_string(&path).map_err(|source| ConstructionError::Io {
            path: path.clone(),
            source,
        })?;
        let spec: FlowSpec =
            serde_json::from_str(&text).map_err(|source| ConstructionError::InvalidSpec {
                flow: name.to_string(),
                source,
            })?;

        self.build(name, &spec, &base_dir)
    }

    /// Build a flow from an already-parsed spec.
    ///
    /// The flow is registered under `name` (the flow list entry), which wins
    /// over the `name` inside the spec when the two differ.
    pub fn build(&self, name: &str, spec: &FlowSpec, base_dir: &Path) -> Result<Flow, ConstructionError> {
        let processes = spec
            .processes
            .iter()
            .enumerate()
            .map(|(step, process)| {
                let ctx = StepContext {
                    flow: name,
                    step,
                    base_dir,
                    lookup: &self.lookup,
                };
                Process::build(process, &ctx)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let flow = Flow::new(name, processes);
        FlowBuilt {
            flow: flow.name(),
            steps: flow.processes().len(),
        }
        .log();
        Ok(flow)
    }
}
