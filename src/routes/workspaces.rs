use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthProfile;
use crate::db;
use crate::error::AppError;
use crate::models::{AuditEvent, Workspace, WorkspaceMember};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list(
    auth: AuthProfile,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Workspace>>, AppError> {
    let workspaces = db::workspaces::list_for_profile(&state.pool, auth.profile_id).await?;
    Ok(Json(workspaces))
}

pub async fn get(
    auth: AuthProfile,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_member(&state, id, auth.profile_id).await?;

    let workspace = db::workspaces::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workspace não encontrado".to_string()))?;
    let members = db::members::list_by_workspace(&state.pool, id).await?;

    Ok(Json(serde_json::json!({
        "workspace": workspace,
        "members": members,
    })))
}

pub async fn audit_log(
    auth: AuthProfile,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<AuditEvent>>, AppError> {
    let member = require_member(&state, id, auth.profile_id).await?;
    require_role(&member, &["work_owner", "work_manager"])?;

    let limit = page.limit.unwrap_or(50).clamp(1, 200);
    let offset = page.offset.unwrap_or(0).max(0);
    let events = db::audit::list(&state.pool, id, limit, offset).await?;
    Ok(Json(events))
}

/// Non-members get the same 404 as a missing workspace.
pub(crate) async fn require_member(
    state: &SharedState,
    workspace_id: Uuid,
    profile_id: Uuid,
) -> Result<WorkspaceMember, AppError> {
    db::members::find(&state.pool, workspace_id, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workspace não encontrado".to_string()))
}

pub(crate) fn require_role(member: &WorkspaceMember, roles: &[&str]) -> Result<(), AppError> {
    if roles.contains(&member.role.as_str()) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Permissão insuficiente para esta operação".to_string(),
        ))
    }
}
