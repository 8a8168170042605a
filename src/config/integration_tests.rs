// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::backends::UnconfiguredLookup;
    use crate::config::{load_and_validate_config, load_config, LogFormat};
    use crate::errors::{ConfigError, ValidationError};
    use crate::flow::{FlowFactory, FlowRegistry};

    fn write(path: &Path, text: &str) {
        std::fs::write(path, text).unwrap();
    }

    /// The sample configuration shipped in `conf/` loads, validates and builds
    #[test]
    fn test_sample_config_builds_every_listed_flow() {
        let (cfg, flows) = load_and_validate_config("conf/app.yaml").unwrap();

        assert_eq!(cfg.engine.target_flow, "feature-stream");
        assert_eq!(cfg.logging.format, LogFormat::Pretty);
        assert_eq!(flows, vec!["feature-stream", "customer-grade"]);

        let factory = FlowFactory::new(&cfg.engine.config_dir, Arc::new(UnconfiguredLookup));
        let registry = FlowRegistry::load(&factory, &flows).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.require(&cfg.engine.target_flow).is_ok());
    }

    /// Validation sees the flow list referenced by the config
    #[test]
    fn test_target_flow_must_be_listed() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("flow-list.txt");
        write(&list, "other-flow\n");
        let cfg_path = dir.path().join("app.yaml");
        write(
            &cfg_path,
            &format!(
                "engine:\n  flow_list_path: {}\nscoring:\n  base_url: http://localhost:8000\n",
                list.display()
            ),
        );

        match load_and_validate_config(&cfg_path) {
            Err(ConfigError::Invalid(errors)) => assert_eq!(
                errors,
                vec![ValidationError::UnknownTargetFlow {
                    flow: "feature-stream".to_string()
                }]
            ),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_files_report_their_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(load_config(&missing), Err(ConfigError::Io { path, .. }) if path == missing));

        let cfg_path = dir.path().join("app.yaml");
        let list = dir.path().join("absent.txt");
        write(&cfg_path, &format!("engine:\n  flow_list_path: {}\n", list.display()));
        assert!(matches!(
            load_and_validate_config(&cfg_path),
            Err(ConfigError::Io { path, .. }) if path == list
        ));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let cfg_path = dir.path().join("app.yaml");
        write(&cfg_path, "scheduler:\n  workers: many\n");
        assert!(matches!(load_config(&cfg_path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_empty_file_is_default_config() {
        let dir = TempDir::new().unwrap();
        let cfg_path = dir.path().join("app.yaml");
        write(&cfg_path, "\n");
        let cfg = load_config(&cfg_path).unwrap();
        assert_eq!(cfg.scheduler.micro_batch_size, 100);
    }
}
