// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::consts::*;
use crate::config::flow_list::load_flow_list;
use crate::config::validation::validate_config;
use crate::engine::SchedulerSettings;
use crate::errors::ConfigError;
use crate::observability::messages::config::{ConfigLoaded, ConfigValidationFailed};
use crate::observability::messages::StructuredLog;

/// Application configuration, loaded from YAML.
///
/// Every section and every field has a default, so an empty file is a valid
/// (if not very useful) configuration.
///
/// # Example
/// ```yaml
/// engine:
///   config_dir: ./conf
///   flow_list_path: ./conf/flow-list.txt
///   target_flow: feature-stream
///   exclude_from_features: "uuid,dt"
/// scheduler:
///   queue_capacity: 500000
///   micro_batch_size: 100
///   workers: 4
/// scoring:
///   base_url: http://localhost:8000
///   context_path: /predict
///   timeout_ms: 1000
/// store:
///   output_path: ./out/fraud_scoring_result.jsonl
/// logging:
///   level: info
///   format: json
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub scheduler: SchedulerConfig,
    pub scoring: ScoringConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Where flows come from and how records are identified.
///
/// # Fields
/// * `config_dir` - Root of `flow/<name>/spec.json` and the query files
/// * `flow_list_path` - Flow names to build at startup, one per line
/// * `target_flow` - Flow every ingested record is run through
/// * `exclude_from_features` - Comma-separated fields removed before scoring
/// * `id_field` - Record field used as the scoring id and in log context
/// * `event_name` - Event name stored with every result
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub config_dir: PathBuf,
    pub flow_list_path: PathBuf,
    pub target_flow: String,
    pub exclude_from_features: String,
    pub id_field: String,
    pub event_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            flow_list_path: PathBuf::from(DEFAULT_FLOW_LIST_PATH),
            target_flow: DEFAULT_TARGET_FLOW.to_string(),
            exclude_from_features: DEFAULT_EXCLUDE_FROM_FEATURES.to_string(),
            id_field: DEFAULT_ID_FIELD.to_string(),
            event_name: DEFAULT_EVENT_NAME.to_string(),
        }
    }
}

impl EngineConfig {
    /// The exclusion list: split on commas, trimmed, blanks dropped.
    pub fn exclusions(&self) -> Vec<String> {
        self.exclude_from_features
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Queue sizing and drain timing. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub queue_capacity: usize,
    pub micro_batch_size: usize,
    pub enqueue_wait_ms: u64,
    pub poll_wait_ms: u64,
    pub drain_interval_ms: u64,
    pub workers: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            micro_batch_size: DEFAULT_MICRO_BATCH_SIZE,
            enqueue_wait_ms: DEFAULT_ENQUEUE_WAIT_MS,
            poll_wait_ms: DEFAULT_POLL_WAIT_MS,
            drain_interval_ms: DEFAULT_DRAIN_INTERVAL_MS,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl SchedulerConfig {
    pub fn enqueue_wait(&self) -> Duration {
        Duration::from_millis(self.enqueue_wait_ms)
    }

    pub fn settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            micro_batch_size: self.micro_batch_size,
            poll_wait: Duration::from_millis(self.poll_wait_ms),
            drain_interval: Duration::from_millis(self.drain_interval_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_url: String,
    pub context_path: String,
    pub timeout_ms: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            context_path: DEFAULT_SCORING_CONTEXT_PATH.to_string(),
            timeout_ms: DEFAULT_SCORING_TIMEOUT_MS,
        }
    }
}

impl ScoringConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub output_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` overrides it.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Load the config and its flow list, then validate both together.
///
/// Returns the config and the flow names in list order.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let path = path.as_ref();
    let cfg = load_config(path)?;
    validate_loaded_config(path, cfg)
}

/// Read the flow list of an already-loaded config and validate both.
///
/// `path` is the config file the values came from, for logging.
pub fn validate_loaded_config(path: &Path, cfg: AppConfig) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let flows = load_flow_list(&cfg.engine.flow_list_path)?;

    if let Err(errors) = validate_config(&cfg, &flows) {
        ConfigValidationFailed {
            path,
            error_count: errors.len(),
        }
        .log();
        return Err(ConfigError::Invalid(errors));
    }

    ConfigLoaded {
        path,
        flows: flows.len(),
        target_flow: &cfg.engine.target_flow,
    }
    .log();
    Ok((cfg, flows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_all_defaults() {
        let cfg: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.scheduler.queue_capacity, 500_000);
        assert_eq!(cfg.scheduler.settings().drain_interval, Duration::from_millis(10));
        assert_eq!(cfg.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let yaml = r#"
scheduler:
  micro_batch_size: 7
logging:
  format: json
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.scheduler.micro_batch_size, 7);
        assert_eq!(cfg.scheduler.workers, 4);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_exclusions_are_trimmed() {
        let engine = EngineConfig {
            exclude_from_features: " uuid , dt,, cust_id ,".to_string(),
            ..EngineConfig::default()
        };
        assert_eq!(engine.exclusions(), vec!["uuid", "dt", "cust_id"]);
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let result: Result<AppConfig, _> = serde_yaml::from_str("logging:\n  format: xml\n");
        assert!(result.is_err());
    }
}
