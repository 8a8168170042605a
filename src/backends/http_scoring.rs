// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::errors::ScoringError;
use crate::traits::{ScoringInput, ScoringOutput, ScoringPort};

/// Scoring service reached over HTTP.
///
/// One POST per micro-batch with a JSON array of `{uuid, features}`; the
/// response is a JSON array of verdicts. The same timeout bounds connecting
/// and the whole request.
pub struct HttpScoringClient {
    client: Client,
    endpoint: String,
}

impl HttpScoringClient {
    pub fn new(base_url: &str, context_path: &str, timeout: Duration) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: join_url(base_url, context_path),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ScoringPort for HttpScoringClient {
    async fn score(&self, inputs: &[ScoringInput]) -> Result<Vec<ScoringOutput>, ScoringError> {
        let response = self.client.post(&self.endpoint).json(inputs).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScoringError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Vec<ScoringOutput>>().await?)
    }
}

fn join_url(base_url: &str, context_path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = context_path.trim();
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
