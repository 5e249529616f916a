//! Alarm broadcast endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::AlarmKind;
use domain::DomainError;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_alarm_rate_limited, record_alarm_sent};

/// Alarm request. The body is optional; omitting it (or the tag) sends the
/// generic alarm.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendAlarmRequest {
    pub alarm_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmResponse {
    /// Recipients notified. Zero when the sender was the only member.
    pub count: usize,
    pub member_count: i32,
}

/// `POST /api/v1/groups/:code/alarm`
///
/// Broadcasts an alarm to every other member, subject to the per-group
/// cooldown.
pub async fn send_alarm(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(code): Path<String>,
    body: Option<Json<SendAlarmRequest>>,
) -> Result<Json<AlarmResponse>, ApiError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let alarm_type = req.alarm_type.as_deref();

    let outcome = match state
        .broadcast
        .send_alarm(&code, alarm_type, &auth.member_id())
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            if matches!(err, DomainError::RateLimited { .. }) {
                record_alarm_rate_limited();
            }
            return Err(err.into());
        }
    };

    let kind = AlarmKind::from_tag(alarm_type);
    record_alarm_sent(&kind.to_string(), outcome.count);

    Ok(Json(AlarmResponse {
        count: outcome.count,
        member_count: outcome.member_count,
    }))
}
