//! Postgres-backed group store.

use async_trait::async_trait;
use domain::models::{Group, LegacyGroup};
use domain::store::{GroupStore, StoreError};
use sqlx::PgPool;

use crate::entities::{GroupRow, LegacyClassRow};
use crate::metrics::QueryTimer;
use crate::repositories::{is_undefined_table, is_unique_violation};

/// Group store backed by the `alarm_groups` table, with read access to the
/// legacy `classes` table for records the migrator has not touched yet.
#[derive(Clone)]
pub struct PgGroupStore {
    pool: PgPool,
}

impl PgGroupStore {
    /// Creates a new PgGroupStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn unavailable(err: sqlx::Error) -> StoreError {
        StoreError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl GroupStore for PgGroupStore {
    async fn find(&self, code: &str) -> Result<Option<Group>, StoreError> {
        let timer = QueryTimer::new("find_group_by_code");
        let result = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT code, members, member_count, last_alarm_at
            FROM alarm_groups
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match result {
            Ok(row) => Ok(row.map(Group::from)),
            Err(e) if is_undefined_table(&e) => {
                tracing::debug!(code = code, "alarm_groups table absent, treating as no record");
                Ok(None)
            }
            Err(e) => Err(Self::unavailable(e)),
        }
    }

    async fn create(&self, group: &Group) -> Result<(), StoreError> {
        let timer = QueryTimer::new("create_group");
        let result = sqlx::query(
            r#"
            INSERT INTO alarm_groups (code, members, member_count, last_alarm_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&group.code)
        .bind(&group.members)
        .bind(group.member_count)
        .bind(group.last_alarm_at)
        .execute(&self.pool)
        .await;
        timer.record();

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict),
            Err(e) => Err(Self::unavailable(e)),
        }
    }

    async fn save(&self, group: &Group) -> Result<(), StoreError> {
        let timer = QueryTimer::new("save_group");
        // Last-writer-wins upsert. Replacing this with a conditional
        // UPDATE ... WHERE member_count = $expected is the hardening seam
        // for strict concurrency guarantees.
        let result = sqlx::query(
            r#"
            INSERT INTO alarm_groups (code, members, member_count, last_alarm_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO UPDATE
            SET members = EXCLUDED.members,
                member_count = EXCLUDED.member_count,
                last_alarm_at = EXCLUDED.last_alarm_at
            "#,
        )
        .bind(&group.code)
        .bind(&group.members)
        .bind(group.member_count)
        .bind(group.last_alarm_at)
        .execute(&self.pool)
        .await;
        timer.record();

        result.map(|_| ()).map_err(Self::unavailable)
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        let timer = QueryTimer::new("delete_group");
        let result = sqlx::query("DELETE FROM alarm_groups WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await;
        timer.record();

        result.map(|_| ()).map_err(Self::unavailable)
    }

    async fn find_legacy(&self, code: &str) -> Result<Option<LegacyGroup>, StoreError> {
        let timer = QueryTimer::new("find_legacy_class");
        let result = sqlx::query_as::<_, LegacyClassRow>(
            r#"
            SELECT class_code, members, member_count, last_alarm_at
            FROM classes
            WHERE class_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match result {
            Ok(row) => Ok(row.map(LegacyGroup::from)),
            // Deployments that never ran the old app have no classes table.
            Err(e) if is_undefined_table(&e) => {
                tracing::debug!(code = code, "legacy classes table absent, treating as no record");
                Ok(None)
            }
            Err(e) => Err(Self::unavailable(e)),
        }
    }

    async fn delete_legacy(&self, code: &str) -> Result<(), StoreError> {
        let timer = QueryTimer::new("delete_legacy_class");
        let result = sqlx::query("DELETE FROM classes WHERE class_code = $1")
            .bind(code)
            .execute(&self.pool)
            .await;
        timer.record();

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_undefined_table(&e) => {
                tracing::debug!(code = code, "legacy classes table absent, nothing to delete");
                Ok(())
            }
            Err(e) => Err(Self::unavailable(e)),
        }
    }
}
