pub mod auth;
pub mod functions;
pub mod members;
pub mod tasks;
pub mod workspaces;

use axum::http::{header, Method};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        // Workspaces
        .route("/api/v1/workspaces", get(workspaces::list))
        .route("/api/v1/workspaces/{id}", get(workspaces::get))
        .route("/api/v1/workspaces/{id}/audit", get(workspaces::audit_log))
        // Members
        .route(
            "/api/v1/workspaces/{id}/members",
            get(members::list).post(members::add),
        )
        .route(
            "/api/v1/workspaces/{id}/members/{profile_id}",
            put(members::update_role).delete(members::remove),
        )
        // Tasks
        .route(
            "/api/v1/workspaces/{id}/tasks",
            get(tasks::list).post(tasks::create),
        )
        .route("/api/v1/tasks/{id}/status", put(tasks::update_status))
        .route("/api/v1/tasks/{id}", delete(tasks::delete))
}

/// Service-key endpoints mirroring the provisioning functions. CORS is wide
/// open with a fixed header set, matching how dashboards call them.
pub fn function_routes() -> Router<SharedState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/functions/v1/create-workspace",
            post(functions::create_workspace),
        )
        .route(
            "/functions/v1/create-workspace-admin",
            post(functions::create_workspace_admin),
        )
        .route(
            "/functions/v1/delete-workspace-user",
            post(functions::delete_workspace_user),
        )
        .route("/functions/v1/create-task", post(functions::create_task))
        .layer(cors)
}
