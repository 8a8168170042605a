// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

use crate::observability::messages::StructuredLog;

/// Configuration parsed and validated.
///
/// # Log Level
/// `info!`
pub struct ConfigLoaded<'a> {
    pub path: &'a Path,
    pub flows: usize,
    pub target_flow: &'a str,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded configuration from {}: {} flow(s) listed, target flow '{}'",
            self.path.display(),
            self.flows,
            self.target_flow
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = %self.path.display(),
            flows = self.flows,
            target_flow = self.target_flow,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("config", span_name = name, path = %self.path.display())
    }
}

/// Configuration rejected by validation.
///
/// # Log Level
/// `error!`
pub struct ConfigValidationFailed<'a> {
    pub path: &'a Path,
    pub error_count: usize,
}

impl Display for ConfigValidationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration {} failed validation with {} error(s)",
            self.path.display(),
            self.error_count
        )
    }
}

impl StructuredLog for ConfigValidationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            path = %self.path.display(),
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("config", span_name = name, path = %self.path.display())
    }
}
