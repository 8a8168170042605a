// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;
use std::sync::Arc;

use super::{Flow, FlowFactory};
use crate::errors::ConstructionError;

/// Every flow loaded at startup, by name.
///
/// Populated once and then shared behind an `Arc`; there is no way to add or
/// replace a flow afterwards, so readers never lock.
#[derive(Debug, Default)]
pub struct FlowRegistry {
    flows: IndexMap<String, Arc<Flow>>,
}

impl FlowRegistry {
    /// Build every listed flow in order. A later duplicate name replaces the
    /// earlier flow. The first construction error aborts the load.
    pub fn load<S: AsRef<str>>(factory: &FlowFactory, names: &[S]) -> Result<Self, ConstructionError> {
        let mut flows = IndexMap::new();
        for name in names {
            let name = name.as_ref();
            let flow = factory.create(name)?;
            flows.insert(name.to_string(), Arc::new(flow));
        }
        Ok(Self { flows })
    }

    pub fn from_flows(flows: impl IntoIterator<Item = Flow>) -> Self {
        Self {
            flows: flows
                .into_iter()
                .map(|f| (f.name().to_string(), Arc::new(f)))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Flow>> {
        self.flows.get(name).cloned()
    }

    pub fn require(&self, name: &str) -> Result<Arc<Flow>, ConstructionError> {
        self.get(name)
            .ok_or_else(|| ConstructionError::UnknownFlow(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flows.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}
