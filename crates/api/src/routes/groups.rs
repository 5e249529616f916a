//! Group lifecycle and membership endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    /// Caller-chosen group code, exactly 6 characters.
    #[validate(length(min = 6, max = 6, message = "code must be exactly 6 characters"))]
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCreatedResponse {
    pub code: String,
    pub member_count: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub code: String,
    pub member_count: i32,
    pub joined: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveResponse {
    pub code: String,
    pub deleted: bool,
    pub member_count: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfoResponse {
    pub code: String,
    pub member_count: i32,
    pub is_member: bool,
    pub cooldown_remaining_secs: i64,
}

/// `POST /api/v1/groups`
///
/// Creates a group with the caller as its only member.
pub async fn create_group(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupCreatedResponse>), ApiError> {
    req.validate()?;

    let group = state
        .membership
        .create_group(&req.code, &auth.member_id())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GroupCreatedResponse {
            code: group.code,
            member_count: group.member_count,
        }),
    ))
}

/// `POST /api/v1/groups/:code/join`
///
/// Adds the caller to the group. Joining a group the caller is already in
/// succeeds without changing anything.
pub async fn join_group(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(code): Path<String>,
) -> Result<Json<JoinResponse>, ApiError> {
    let outcome = state
        .membership
        .join_group(&code, &auth.member_id())
        .await?;

    Ok(Json(JoinResponse {
        code,
        member_count: outcome.member_count,
        joined: outcome.joined,
    }))
}

/// `POST /api/v1/groups/:code/leave`
///
/// Removes the caller from the group; the group is deleted when its last
/// member leaves.
pub async fn leave_group(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(code): Path<String>,
) -> Result<Json<LeaveResponse>, ApiError> {
    let outcome = state
        .membership
        .leave_group(&code, &auth.member_id())
        .await?;

    Ok(Json(LeaveResponse {
        code,
        deleted: outcome.deleted,
        member_count: outcome.member_count,
    }))
}

/// `GET /api/v1/groups/:code`
///
/// Reports member count, whether the caller belongs to the group, and how
/// long until the next alarm is allowed.
pub async fn get_group_info(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(code): Path<String>,
) -> Result<Json<GroupInfoResponse>, ApiError> {
    let info = state.membership.group_info(&code, &auth.member_id()).await?;

    Ok(Json(GroupInfoResponse {
        code,
        member_count: info.member_count,
        is_member: info.is_member,
        cooldown_remaining_secs: info.cooldown_remaining_secs,
    }))
}
