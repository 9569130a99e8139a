use axum::extract::{FromRequest, Request, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::extractor::ServiceKey;
use crate::error::AppError;
use crate::provision;
use crate::routes::tasks::{self, TaskInput};
use crate::state::SharedState;

/// Function-endpoint error bodies carry `success: false` alongside the
/// message, unlike the dashboard API.
pub struct FunctionError(AppError);

impl From<AppError> for FunctionError {
    fn from(err: AppError) -> Self {
        FunctionError(err)
    }
}

impl From<sqlx::Error> for FunctionError {
    fn from(err: sqlx::Error) -> Self {
        FunctionError(AppError::Database(err))
    }
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.status_and_message();
        let body = json!({ "success": false, "error": message });
        (status, Json(body)).into_response()
    }
}

/// Json extractor for the function endpoints: missing or malformed fields
/// are a 400 in the function envelope, not axum's default 422 rejection.
pub struct FunctionJson<T>(pub T);

impl<S, T> FromRequest<S> for FunctionJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FunctionError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(FunctionJson(value)),
            Err(rejection) => Err(FunctionError(AppError::BadRequest(format!(
                "Corpo da requisição inválido: {rejection}"
            )))),
        }
    }
}

#[derive(Deserialize)]
pub struct DeleteWorkspaceUser {
    pub workspace_id: Uuid,
}

#[derive(Deserialize)]
pub struct CreateTask {
    pub workspace_id: Uuid,
    #[serde(flatten)]
    pub task: TaskInput,
}

pub async fn create_workspace(
    _key: ServiceKey,
    State(state): State<SharedState>,
    FunctionJson(req): FunctionJson<provision::ProvisionWorkspace>,
) -> Result<Json<serde_json::Value>, FunctionError> {
    let provisioned = provision::provision_workspace(&state, req).await?;

    Ok(Json(json!({
        "success": true,
        "workspace_id": provisioned.workspace_id,
        "user_id": provisioned.user_id,
        "profile_id": provisioned.profile_id,
    })))
}

pub async fn create_workspace_admin(
    _key: ServiceKey,
    State(state): State<SharedState>,
    FunctionJson(req): FunctionJson<provision::ProvisionAdmin>,
) -> Result<Json<serde_json::Value>, FunctionError> {
    let provisioned = provision::provision_workspace_admin(&state, req).await?;

    Ok(Json(json!({
        "success": true,
        "user_id": provisioned.user_id,
        "profile_id": provisioned.profile_id,
    })))
}

pub async fn delete_workspace_user(
    _key: ServiceKey,
    State(state): State<SharedState>,
    FunctionJson(req): FunctionJson<DeleteWorkspaceUser>,
) -> Result<Json<serde_json::Value>, FunctionError> {
    let outcome = provision::delete_workspace(&state, req.workspace_id).await?;

    Ok(Json(json!({
        "success": outcome.workspace_deleted,
        "workspace_deleted": outcome.workspace_deleted,
        "user_deleted": outcome.user_deleted,
    })))
}

pub async fn create_task(
    _key: ServiceKey,
    State(state): State<SharedState>,
    FunctionJson(req): FunctionJson<CreateTask>,
) -> Result<Json<serde_json::Value>, FunctionError> {
    let task = tasks::create_task_in_workspace(&state, req.workspace_id, req.task).await?;

    Ok(Json(json!({
        "success": true,
        "task_id": task.id,
    })))
}
