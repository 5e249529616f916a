//! Membership manager: group lifecycle and join/leave invariants.

use std::sync::Arc;

use crate::error::DomainError;
use crate::models::group::DEFAULT_MAX_MEMBERS;
use crate::models::Group;
use crate::services::cooldown::CooldownGate;
use crate::services::directory::GroupDirectory;
use crate::services::storage_error;
use crate::store::{GroupStore, StoreError};

/// Outcome of a join operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub member_count: i32,
    pub joined: bool,
}

/// Outcome of a leave operation.
///
/// `deleted` is the terminal outcome when the leaver was the last member:
/// the group record no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub deleted: bool,
    pub member_count: i32,
}

/// Group info as reported to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub member_count: i32,
    pub is_member: bool,
    pub cooldown_remaining_secs: i64,
}

/// Create/join/leave operations enforcing capacity and uniqueness.
#[derive(Clone)]
pub struct MembershipService {
    directory: GroupDirectory,
    store: Arc<dyn GroupStore>,
    gate: CooldownGate,
    max_members: usize,
}

impl MembershipService {
    pub fn new(store: Arc<dyn GroupStore>, gate: CooldownGate, max_members: usize) -> Self {
        Self {
            directory: GroupDirectory::new(store.clone()),
            store,
            gate,
            max_members,
        }
    }

    /// Builds a membership service with the default capacity limit.
    pub fn with_defaults(store: Arc<dyn GroupStore>) -> Self {
        Self::new(store, CooldownGate::default(), DEFAULT_MAX_MEMBERS)
    }

    /// Creates a new group with `creator_id` as its only member.
    pub async fn create_group(
        &self,
        code: &str,
        creator_id: &str,
    ) -> Result<Group, DomainError> {
        check_code(code)?;

        // Uniqueness is checked against currently existing records only; a
        // destroyed group frees its code for re-creation.
        if self.directory.resolve(code).await?.is_some() {
            return Err(DomainError::DuplicateCode);
        }

        let group = Group::new(code, creator_id);
        match self.store.create(&group).await {
            Ok(()) => {
                tracing::info!(code = code, account_id = creator_id, "Group created");
                Ok(group)
            }
            Err(StoreError::Conflict) => Err(DomainError::DuplicateCode),
            Err(e) => Err(storage_error("create", code, e)),
        }
    }

    /// Adds `account_id` to the group, idempotently.
    pub async fn join_group(
        &self,
        code: &str,
        account_id: &str,
    ) -> Result<JoinOutcome, DomainError> {
        check_code(code)?;

        let mut group = self
            .directory
            .resolve(code)
            .await?
            .ok_or(DomainError::GroupNotFound)?;

        if group.is_member(account_id) {
            // Rejoin is a successful no-op.
            return Ok(JoinOutcome {
                member_count: group.member_count,
                joined: true,
            });
        }

        if group.members.len() >= self.max_members {
            return Err(DomainError::CapacityExceeded);
        }

        group.add_member(account_id);
        self.store
            .save(&group)
            .await
            .map_err(|e| storage_error("save", code, e))?;

        tracing::info!(
            code = code,
            account_id = account_id,
            member_count = group.member_count,
            "Member joined group"
        );
        Ok(JoinOutcome {
            member_count: group.member_count,
            joined: true,
        })
    }

    /// Removes `account_id` from the group, deleting the group when it
    /// becomes empty.
    pub async fn leave_group(
        &self,
        code: &str,
        account_id: &str,
    ) -> Result<LeaveOutcome, DomainError> {
        check_code(code)?;

        let mut group = self
            .directory
            .resolve(code)
            .await?
            .ok_or(DomainError::GroupNotFound)?;

        group.remove_member(account_id);

        if group.member_count == 0 {
            self.store
                .delete(code)
                .await
                .map_err(|e| storage_error("delete", code, e))?;
            tracing::info!(code = code, account_id = account_id, "Last member left, group deleted");
            return Ok(LeaveOutcome {
                deleted: true,
                member_count: 0,
            });
        }

        self.store
            .save(&group)
            .await
            .map_err(|e| storage_error("save", code, e))?;
        tracing::info!(
            code = code,
            account_id = account_id,
            member_count = group.member_count,
            "Member left group"
        );
        Ok(LeaveOutcome {
            deleted: false,
            member_count: group.member_count,
        })
    }

    /// Reports membership and cooldown state for the group.
    pub async fn group_info(
        &self,
        code: &str,
        account_id: &str,
    ) -> Result<GroupInfo, DomainError> {
        check_code(code)?;

        let group = self
            .directory
            .resolve(code)
            .await?
            .ok_or(DomainError::GroupNotFound)?;

        Ok(GroupInfo {
            member_count: group.member_count,
            is_member: group.is_member(account_id),
            cooldown_remaining_secs: self.gate.remaining(&group, chrono::Utc::now()),
        })
    }
}

/// Validates the 6-character code format; violations are `InvalidInput`
/// regardless of which operation received the code.
pub(crate) fn check_code(code: &str) -> Result<(), DomainError> {
    shared::validation::validate_group_code(code).map_err(|e| {
        DomainError::InvalidInput(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "invalid group code".to_string()),
        )
    })
}
