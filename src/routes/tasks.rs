use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::auth::extractor::AuthProfile;
use crate::middleware::audit;
use crate::models::{Task, PRIORITIES, STATUSES};
use crate::routes::workspaces::{require_member, require_role};
use crate::state::{AppState, SharedState};

#[derive(Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub priority: String,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub assignees: Option<Vec<Uuid>>,
    pub tags: Option<Vec<String>>,
    pub subtasks: Option<Vec<Subtask>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Deserialize)]
pub struct UpdateStatus {
    pub status: String,
}

/// Shared by the dashboard route and the `create-task` function endpoint.
pub(crate) async fn create_task_in_workspace(
    state: &AppState,
    workspace_id: Uuid,
    input: TaskInput,
) -> Result<Task, AppError> {
    db::workspaces::find_by_id(&state.pool, workspace_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workspace não encontrado".to_string()))?;

    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest(
            "Campo obrigatório ausente: title".to_string(),
        ));
    }
    if !PRIORITIES.contains(&input.priority.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Prioridade inválida: {}",
            input.priority
        )));
    }
    if !STATUSES.contains(&input.status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Status inválido: {}",
            input.status
        )));
    }

    let assignees = input.assignees.unwrap_or_default();
    if !assignees.is_empty() {
        let matching = db::members::count_matching(&state.pool, workspace_id, &assignees).await?;
        if matching != assignees.len() as i64 {
            return Err(AppError::BadRequest(
                "Todos os responsáveis devem ser membros do workspace".to_string(),
            ));
        }
    }

    let tags = serde_json::to_value(input.tags.unwrap_or_default())
        .map_err(|e| AppError::Internal(format!("Failed to encode tags: {e}")))?;
    let subtasks = serde_json::to_value(input.subtasks.unwrap_or_default())
        .map_err(|e| AppError::Internal(format!("Failed to encode subtasks: {e}")))?;

    let task = db::tasks::create(
        &state.pool,
        workspace_id,
        title,
        input.description.as_deref(),
        &input.priority,
        &input.status,
        input.due_date,
        &tags,
        &subtasks,
    )
    .await?;

    if !assignees.is_empty() {
        db::tasks::add_assignees(&state.pool, task.id, &assignees).await?;
    }

    audit::log_event(
        &state.pool,
        Some(workspace_id),
        None,
        "task.created",
        "task",
        Some(task.id),
        None,
    )
    .await;

    Ok(task)
}

pub async fn list(
    auth: AuthProfile,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, AppError> {
    require_member(&state, id, auth.profile_id).await?;
    let tasks = db::tasks::list_by_workspace(&state.pool, id).await?;
    Ok(Json(tasks))
}

pub async fn create(
    auth: AuthProfile,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Task>, AppError> {
    require_member(&state, id, auth.profile_id).await?;
    let task = create_task_in_workspace(&state, id, input).await?;
    Ok(Json(task))
}

pub async fn update_status(
    auth: AuthProfile,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatus>,
) -> Result<Json<Task>, AppError> {
    if !STATUSES.contains(&req.status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Status inválido: {}",
            req.status
        )));
    }

    let task = db::tasks::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tarefa não encontrada".to_string()))?;
    require_member(&state, task.workspace_id, auth.profile_id).await?;

    let task = db::tasks::update_status(&state.pool, id, &req.status).await?;

    audit::log_event(
        &state.pool,
        Some(task.workspace_id),
        Some(auth.profile_id),
        "task.status_updated",
        "task",
        Some(task.id),
        Some(serde_json::json!({ "new_status": req.status })),
    )
    .await;

    Ok(Json(task))
}

pub async fn delete(
    auth: AuthProfile,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let task = db::tasks::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tarefa não encontrada".to_string()))?;
    let member = require_member(&state, task.workspace_id, auth.profile_id).await?;
    require_role(&member, &["work_owner", "work_manager"])?;

    db::tasks::delete(&state.pool, id).await?;

    audit::log_event(
        &state.pool,
        Some(task.workspace_id),
        Some(auth.profile_id),
        "task.deleted",
        "task",
        Some(id),
        None,
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
