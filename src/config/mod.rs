// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod flow_list;
mod loader;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use flow_list::{load_flow_list, parse_flow_list};
pub use loader::{
    load_and_validate_config, load_config, validate_loaded_config, AppConfig, EngineConfig,
    LogFormat, LoggingConfig, SchedulerConfig, ScoringConfig, StoreConfig,
};
pub use validation::validate_config;
