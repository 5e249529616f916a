//! Push gateway client.
//!
//! Delivers alarm payloads to the mobile push gateway over HTTP. Transient
//! failures (timeouts, 5xx, 429) are retried with exponential backoff;
//! anything else fails the dispatch immediately.

use std::time::Duration;

use async_trait::async_trait;
use domain::models::AlarmPayload;
use domain::services::{PushError, PushService};
use serde::Serialize;

use crate::config::PushConfig;

/// Request body posted to the push gateway.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PushRequest<'a> {
    device_ids: &'a [String],
    payload: &'a AlarmPayload,
}

/// HTTP client for the push gateway.
pub struct HttpPushService {
    client: reqwest::Client,
    url: String,
    api_key: String,
    max_retries: u32,
}

impl HttpPushService {
    pub fn new(config: &PushConfig) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PushError::Transport(format!("failed to build push client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            max_retries: config.max_retries,
        })
    }

    async fn post_once(&self, body: &PushRequest<'_>) -> Result<(), PushAttemptError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| PushAttemptError::Retryable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = format!("push gateway returned {}", status);
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Err(PushAttemptError::Retryable(detail))
        } else {
            Err(PushAttemptError::Fatal(detail))
        }
    }
}

enum PushAttemptError {
    Retryable(String),
    Fatal(String),
}

#[async_trait]
impl PushService for HttpPushService {
    async fn send_alarm(
        &self,
        recipients: &[String],
        payload: &AlarmPayload,
    ) -> Result<usize, PushError> {
        let body = PushRequest {
            device_ids: recipients,
            payload,
        };

        let mut attempt = 0;
        loop {
            match self.post_once(&body).await {
                Ok(()) => {
                    tracing::debug!(
                        recipient_count = recipients.len(),
                        attempt = attempt,
                        "Push dispatch succeeded"
                    );
                    return Ok(recipients.len());
                }
                Err(PushAttemptError::Fatal(detail)) => {
                    return Err(PushError::Transport(detail));
                }
                Err(PushAttemptError::Retryable(detail)) if attempt < self.max_retries => {
                    // 500ms, 1s, 2s, ...
                    let backoff = Duration::from_millis(500u64 << attempt.min(6));
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %detail,
                        "Push dispatch failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(PushAttemptError::Retryable(detail)) => {
                    return Err(PushError::Transport(detail));
                }
            }
        }
    }
}

/// Stand-in push service for deployments without a configured gateway.
///
/// Logs each dispatch and reports every recipient as notified, so the rest
/// of the alarm flow (cooldown included) behaves exactly as in production.
#[derive(Debug, Default)]
pub struct LogOnlyPushService;

#[async_trait]
impl PushService for LogOnlyPushService {
    async fn send_alarm(
        &self,
        recipients: &[String],
        payload: &AlarmPayload,
    ) -> Result<usize, PushError> {
        tracing::info!(
            recipient_count = recipients.len(),
            alert = %payload.alert,
            "Push disabled, logging alarm instead of sending"
        );
        Ok(recipients.len())
    }
}
