//! Broadcast dispatcher: compose, gate, persist, deliver.

use std::sync::Arc;

use chrono::Utc;

use crate::error::DomainError;
use crate::models::{AlarmKind, AlarmPayload};
use crate::services::cooldown::CooldownGate;
use crate::services::directory::GroupDirectory;
use crate::services::membership::check_code;
use crate::services::push::PushService;
use crate::services::storage_error;
use crate::store::GroupStore;

/// Outcome of an accepted broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmOutcome {
    /// Devices reached (or attempted) by the push collaborator; zero when
    /// the sender was the only member.
    pub count: usize,
    pub member_count: i32,
}

/// Composes the alert payload for a caller-supplied tag.
///
/// Total over all inputs: unrecognized and absent tags get the generic
/// "come now" alert.
pub fn compose_alert(alarm_type: Option<&str>) -> AlarmPayload {
    AlarmPayload::for_kind(AlarmKind::from_tag(alarm_type))
}

/// Resolves the recipient set: all members except the sender.
pub fn resolve_recipients(members: &[String], sender_id: &str) -> Vec<String> {
    members
        .iter()
        .filter(|m| m.as_str() != sender_id)
        .cloned()
        .collect()
}

/// Sends cooldown-gated alarm broadcasts to a group.
#[derive(Clone)]
pub struct BroadcastService {
    directory: GroupDirectory,
    store: Arc<dyn GroupStore>,
    gate: CooldownGate,
    push: Arc<dyn PushService>,
}

impl BroadcastService {
    pub fn new(
        store: Arc<dyn GroupStore>,
        gate: CooldownGate,
        push: Arc<dyn PushService>,
    ) -> Self {
        Self {
            directory: GroupDirectory::new(store.clone()),
            store,
            gate,
            push,
        }
    }

    /// Broadcasts an alarm from `sender_id` to the rest of the group.
    ///
    /// The cooldown stamp is persisted before dispatch and never rolled
    /// back: a failing delivery consumes the window, biasing toward
    /// under-sending rather than flooding.
    pub async fn send_alarm(
        &self,
        code: &str,
        alarm_type: Option<&str>,
        sender_id: &str,
    ) -> Result<AlarmOutcome, DomainError> {
        check_code(code)?;

        let mut group = self
            .directory
            .resolve(code)
            .await?
            .ok_or(DomainError::GroupNotFound)?;

        if !group.is_member(sender_id) {
            return Err(DomainError::Forbidden(
                "Only group members can send alarms".to_string(),
            ));
        }

        self.gate.try_accept(&mut group, Utc::now())?;
        self.store
            .save(&group)
            .await
            .map_err(|e| storage_error("save", code, e))?;

        let payload = compose_alert(alarm_type);
        let recipients = resolve_recipients(&group.members, sender_id);

        if recipients.is_empty() {
            tracing::info!(code = code, account_id = sender_id, "No other members to notify");
            return Ok(AlarmOutcome {
                count: 0,
                member_count: group.member_count,
            });
        }

        let count = match self.push.send_alarm(&recipients, &payload).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(
                    code = code,
                    account_id = sender_id,
                    recipient_count = recipients.len(),
                    error = %e,
                    "Alarm push dispatch failed"
                );
                return Err(DomainError::Dependency(
                    "push delivery failed".to_string(),
                ));
            }
        };

        tracing::info!(
            code = code,
            account_id = sender_id,
            alarm_type = %AlarmKind::from_tag(alarm_type),
            count = count,
            "Alarm dispatched"
        );
        Ok(AlarmOutcome {
            count,
            member_count: group.member_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Group;
    use crate::services::membership::MembershipService;
    use crate::services::push::MockPushService;
    use crate::store::memory::InMemoryGroupStore;
    use chrono::Duration;

    struct Fixture {
        store: Arc<InMemoryGroupStore>,
        push: Arc<MockPushService>,
        broadcast: BroadcastService,
        membership: MembershipService,
    }

    fn fixture() -> Fixture {
        fixture_with_push(Arc::new(MockPushService::new()))
    }

    fn fixture_with_push(push: Arc<MockPushService>) -> Fixture {
        let store = Arc::new(InMemoryGroupStore::new());
        let broadcast =
            BroadcastService::new(store.clone(), CooldownGate::default(), push.clone());
        let membership = MembershipService::with_defaults(store.clone());
        Fixture {
            store,
            push,
            broadcast,
            membership,
        }
    }

    async fn backdate_last_alarm(store: &InMemoryGroupStore, code: &str, secs: i64) {
        let mut group = store.find(code).await.unwrap().unwrap();
        group.last_alarm_at = Utc::now() - Duration::seconds(secs);
        store.save(&group).await.unwrap();
    }

    #[test]
    fn test_compose_alert_is_total() {
        assert!(compose_alert(Some("checkin")).alert.contains("checked in"));
        assert!(compose_alert(Some("rollcall")).alert.contains("Roll call"));
        let generic = compose_alert(None);
        assert_eq!(generic.alert, compose_alert(Some("whatever")).alert);
        assert_eq!(generic.sound, "alarm.caf");
    }

    #[test]
    fn test_resolve_recipients_excludes_sender() {
        let members = vec!["u1".to_string(), "u2".to_string(), "u3".to_string()];
        assert_eq!(
            resolve_recipients(&members, "u2"),
            vec!["u1".to_string(), "u3".to_string()]
        );
        assert_eq!(resolve_recipients(&["u1".to_string()], "u1"), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_send_alarm_end_to_end() {
        let f = fixture();
        f.membership.create_group("QWERTY", "u1").await.unwrap();
        f.membership.join_group("QWERTY", "u2").await.unwrap();

        let outcome = f
            .broadcast
            .send_alarm("QWERTY", Some("rollcall"), "u1")
            .await
            .unwrap();

        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.member_count, 2);

        let sent = f.push.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["u2".to_string()]);
        assert!(sent[0].payload.alert.contains("Roll call"));
    }

    #[tokio::test]
    async fn test_send_alarm_unknown_group() {
        let f = fixture();
        let result = f.broadcast.send_alarm("NOSUCH", None, "u1").await;
        assert!(matches!(result, Err(DomainError::GroupNotFound)));
    }

    #[tokio::test]
    async fn test_send_alarm_invalid_code() {
        let f = fixture();
        let result = f.broadcast.send_alarm("AB", None, "u1").await;
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_non_member_is_forbidden() {
        let f = fixture();
        f.membership.create_group("QWERTY", "u1").await.unwrap();

        let result = f.broadcast.send_alarm("QWERTY", None, "outsider").await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
        assert!(f.push.sent().is_empty());
    }

    #[tokio::test]
    async fn test_second_alarm_within_window_is_rate_limited() {
        let f = fixture();
        f.membership.create_group("QWERTY", "u1").await.unwrap();
        f.membership.join_group("QWERTY", "u2").await.unwrap();

        f.broadcast.send_alarm("QWERTY", None, "u1").await.unwrap();
        let second = f.broadcast.send_alarm("QWERTY", None, "u2").await;

        match second {
            Err(DomainError::RateLimited { retry_after_secs }) => {
                assert!(retry_after_secs > 0 && retry_after_secs <= 60);
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_alarm_succeeds_after_window_elapses() {
        let f = fixture();
        f.membership.create_group("QWERTY", "u1").await.unwrap();
        f.membership.join_group("QWERTY", "u2").await.unwrap();

        f.broadcast.send_alarm("QWERTY", None, "u1").await.unwrap();
        backdate_last_alarm(&f.store, "QWERTY", 61).await;

        let outcome = f.broadcast.send_alarm("QWERTY", None, "u1").await.unwrap();
        assert_eq!(outcome.count, 1);
    }

    #[tokio::test]
    async fn test_sole_member_alarm_skips_dispatch_but_consumes_cooldown() {
        let f = fixture();
        f.membership.create_group("QWERTY", "u1").await.unwrap();

        let outcome = f.broadcast.send_alarm("QWERTY", None, "u1").await.unwrap();
        assert_eq!(outcome.count, 0);
        assert_eq!(outcome.member_count, 1);
        assert!(f.push.sent().is_empty());

        // Cooldown was still started.
        let retry = f.broadcast.send_alarm("QWERTY", None, "u1").await;
        assert!(matches!(retry, Err(DomainError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_push_failure_surfaces_as_dependency_and_keeps_cooldown() {
        let f = fixture_with_push(Arc::new(MockPushService::failing()));
        f.membership.create_group("QWERTY", "u1").await.unwrap();
        f.membership.join_group("QWERTY", "u2").await.unwrap();

        let result = f.broadcast.send_alarm("QWERTY", None, "u1").await;
        assert!(matches!(result, Err(DomainError::Dependency(_))));

        // The stamped cooldown is not rolled back after the failed
        // delivery.
        let group = f.store.find("QWERTY").await.unwrap().unwrap();
        assert!(!group.has_never_alarmed());
        let retry = f.broadcast.send_alarm("QWERTY", None, "u2").await;
        assert!(matches!(retry, Err(DomainError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_alarm_from_migrated_legacy_group() {
        let f = fixture();
        f.store
            .seed_legacy(crate::models::LegacyGroup {
                code: "AB12CD".into(),
                members: vec!["u1".into(), "u2".into()],
                member_count: Some(2),
                last_alarm_at: None,
            })
            .await;

        let outcome = f
            .broadcast
            .send_alarm("AB12CD", Some("checkin"), "u1")
            .await
            .unwrap();
        assert_eq!(outcome.count, 1);
    }

    #[tokio::test]
    async fn test_group_state_untouched_by_rejected_broadcast() {
        let f = fixture();
        f.membership.create_group("QWERTY", "u1").await.unwrap();
        f.membership.join_group("QWERTY", "u2").await.unwrap();
        f.broadcast.send_alarm("QWERTY", None, "u1").await.unwrap();

        let before: Group = f.store.find("QWERTY").await.unwrap().unwrap();
        let _ = f.broadcast.send_alarm("QWERTY", None, "u2").await;
        let after = f.store.find("QWERTY").await.unwrap().unwrap();
        assert_eq!(before, after);
    }
}
