//! Push delivery capability.
//!
//! Abstracts the external push collaborator that fans an alarm payload out
//! to the devices owned by the recipient accounts.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::AlarmPayload;

/// Error type for push delivery.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("push transport failure: {0}")]
    Transport(String),
}

/// Push delivery service trait.
#[async_trait]
pub trait PushService: Send + Sync {
    /// Delivers `payload` to the devices owned by the given accounts.
    ///
    /// Returns the number of target devices reached (or attempted, when
    /// the transport only reports acceptance).
    async fn send_alarm(
        &self,
        recipients: &[String],
        payload: &AlarmPayload,
    ) -> Result<usize, PushError>;
}

/// A dispatched alarm as observed by [`MockPushService`].
#[derive(Debug, Clone)]
pub struct SentAlarm {
    pub recipients: Vec<String>,
    pub payload: AlarmPayload,
}

/// Mock push service for development and testing.
///
/// Records dispatches instead of sending them, and can simulate transport
/// failures.
#[derive(Debug, Default)]
pub struct MockPushService {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    sent: std::sync::Mutex<Vec<SentAlarm>>,
}

impl MockPushService {
    /// Create a new mock push service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock service that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// All alarms dispatched through this mock so far.
    pub fn sent(&self) -> Vec<SentAlarm> {
        self.sent.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl PushService for MockPushService {
    async fn send_alarm(
        &self,
        recipients: &[String],
        payload: &AlarmPayload,
    ) -> Result<usize, PushError> {
        if self.simulate_failure {
            tracing::warn!(
                recipient_count = recipients.len(),
                "Mock push service simulating failure"
            );
            return Err(PushError::Transport("simulated failure".to_string()));
        }

        tracing::info!(
            recipient_count = recipients.len(),
            alert = %payload.alert,
            "Mock: would dispatch alarm push"
        );

        self.sent.lock().expect("mock lock poisoned").push(SentAlarm {
            recipients: recipients.to_vec(),
            payload: payload.clone(),
        });
        Ok(recipients.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlarmKind;

    #[tokio::test]
    async fn test_mock_records_dispatches() {
        let push = MockPushService::new();
        let payload = AlarmPayload::for_kind(AlarmKind::Checkin);

        let reached = push
            .send_alarm(&["u2".to_string(), "u3".to_string()], &payload)
            .await
            .unwrap();

        assert_eq!(reached, 2);
        let sent = push.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["u2".to_string(), "u3".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_simulated_failure() {
        let push = MockPushService::failing();
        let payload = AlarmPayload::for_kind(AlarmKind::General);

        let result = push.send_alarm(&["u2".to_string()], &payload).await;
        assert!(matches!(result, Err(PushError::Transport(_))));
        assert!(push.sent().is_empty());
    }
}
