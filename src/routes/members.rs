use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthProfile;
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{WorkspaceMemberView, ROLES};
use crate::provision;
use crate::routes::workspaces::{require_member, require_role};
use crate::saga::Saga;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct AddMember {
    pub email: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateMemberRole {
    pub role: String,
}

pub async fn list(
    auth: AuthProfile,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<WorkspaceMemberView>>, AppError> {
    require_member(&state, id, auth.profile_id).await?;
    let members = db::members::list_by_workspace(&state.pool, id).await?;
    Ok(Json(members))
}

pub async fn add(
    auth: AuthProfile,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMember>,
) -> Result<Json<serde_json::Value>, AppError> {
    let requester = require_member(&state, id, auth.profile_id).await?;
    require_role(&requester, &["work_owner", "work_manager"])?;

    let role = req.role.as_deref().unwrap_or("work_user");
    validate_role(role)?;
    // Only an owner can grant ownership; otherwise a manager could mint an
    // owner and sidestep the owner-only role controls.
    if role == "work_owner" {
        require_role(&requester, &["work_owner"])?;
    }
    let email = provision::validate_email(&req.email)?;

    let workspace = db::workspaces::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workspace não encontrado".to_string()))?;

    let mut saga = Saga::new("add-member");

    let (profile, invited_password) = match state.identity.find_by_email(&email).await? {
        // Existing identity joins as-is.
        Some(identity) => {
            let full_name = req
                .full_name
                .clone()
                .unwrap_or_else(|| email.clone());
            let profile = match db::profiles::find_by_id(&state.pool, identity.id).await? {
                Some(profile) => profile,
                None => db::profiles::upsert(&state.pool, identity.id, &full_name, &email).await?,
            };
            (profile, None)
        }
        // New identity: invite flow with the same compensation discipline as
        // provisioning.
        None => {
            let full_name = req.full_name.clone().ok_or_else(|| {
                AppError::BadRequest("Campo obrigatório ausente: full_name".to_string())
            })?;
            let provisional_password = match req.password {
                Some(pw) => {
                    provision::validate_password(&pw)?;
                    pw
                }
                None => password::generate_provisional(),
            };

            let identity = state.identity.create(&email, &provisional_password).await?;
            {
                let provider = state.identity.clone();
                let identity_id = identity.id;
                saga.on_abort("delete-identity", async move {
                    provider.delete(identity_id).await.map_err(|e| e.to_string())
                });
            }

            let profile =
                match db::profiles::upsert(&state.pool, identity.id, &full_name, &email).await {
                    Ok(profile) => profile,
                    Err(e) => {
                        saga.abort().await;
                        return Err(e.into());
                    }
                };

            (profile, Some(provisional_password))
        }
    };

    let member = match db::members::create(&state.pool, id, profile.id, role).await {
        Ok(member) => member,
        Err(e) => {
            // Roll an invited identity back rather than orphaning it.
            saga.abort().await;
            return Err(match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict("Este usuário já é membro do workspace".to_string())
                }
                _ => AppError::Database(e),
            });
        }
    };

    saga.commit();

    if let Some(ref mailer) = state.system_mailer {
        let _ = match invited_password {
            Some(ref pw) => {
                mailer
                    .send_workspace_invite(
                        &email,
                        &profile.full_name,
                        &workspace.name,
                        pw,
                        &state.config.base_url,
                    )
                    .await
            }
            None => {
                mailer
                    .send_member_added(
                        &email,
                        &profile.full_name,
                        &workspace.name,
                        &state.config.base_url,
                    )
                    .await
            }
        };
    }

    audit::log_event(
        &state.pool,
        Some(id),
        Some(auth.profile_id),
        "member.added",
        "member",
        Some(member.id),
        Some(serde_json::json!({ "role": role })),
    )
    .await;

    Ok(Json(serde_json::json!({
        "member": member,
        "profile": profile,
    })))
}

pub async fn update_role(
    auth: AuthProfile,
    State(state): State<SharedState>,
    Path((id, profile_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateMemberRole>,
) -> Result<Json<serde_json::Value>, AppError> {
    let requester = require_member(&state, id, auth.profile_id).await?;
    require_role(&requester, &["work_owner"])?;
    validate_role(&req.role)?;

    let target = db::members::find(&state.pool, id, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Membro não encontrado".to_string()))?;

    // A workspace must keep at least one work_owner.
    if target.role == "work_owner" && req.role != "work_owner" {
        let owners = db::members::count_owners(&state.pool, id).await?;
        if owners <= 1 {
            return Err(AppError::BadRequest(
                "O workspace precisa de pelo menos um work_owner".to_string(),
            ));
        }
    }

    db::members::update_role(&state.pool, id, profile_id, &req.role).await?;

    audit::log_event(
        &state.pool,
        Some(id),
        Some(auth.profile_id),
        "member.role_updated",
        "member",
        Some(target.id),
        Some(serde_json::json!({ "new_role": req.role })),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Role updated" })))
}

pub async fn remove(
    auth: AuthProfile,
    State(state): State<SharedState>,
    Path((id, profile_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let requester = require_member(&state, id, auth.profile_id).await?;
    require_role(&requester, &["work_owner"])?;

    let target = db::members::find(&state.pool, id, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Membro não encontrado".to_string()))?;

    if target.role == "work_owner" {
        let owners = db::members::count_owners(&state.pool, id).await?;
        if owners <= 1 {
            return Err(AppError::BadRequest(
                "O workspace precisa de pelo menos um work_owner".to_string(),
            ));
        }
    }

    db::members::delete(&state.pool, id, profile_id).await?;

    audit::log_event(
        &state.pool,
        Some(id),
        Some(auth.profile_id),
        "member.removed",
        "member",
        Some(target.id),
        None,
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Member removed" })))
}

fn validate_role(role: &str) -> Result<(), AppError> {
    if ROLES.contains(&role) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Papel inválido: {role}")))
    }
}
