use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::saga::Saga;
use crate::state::AppState;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const CLIENT_TYPES: &[&str] = &["pessoa_juridica", "pessoa_fisica"];

#[derive(Deserialize)]
pub struct ProvisionWorkspace {
    pub name: String,
    pub slug: String,
    pub client_type: String,
    pub document: String,
    pub admin_email: String,
    pub admin_name: String,
    /// When absent, the invite variant is used: a password is generated and
    /// mailed to the admin if system SMTP is configured.
    pub provisional_password: Option<String>,
}

#[derive(Deserialize)]
pub struct ProvisionAdmin {
    pub workspace_id: Uuid,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

pub struct Provisioned {
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub profile_id: Uuid,
}

pub struct AdminProvisioned {
    pub user_id: Uuid,
    pub profile_id: Uuid,
}

pub struct DeletionOutcome {
    pub workspace_deleted: bool,
    pub user_deleted: bool,
}

/// Workspace provisioning saga: workspace row, admin identity, profile,
/// owner membership. Any failed step aborts the saga, which compensates the
/// steps already done in reverse order.
pub async fn provision_workspace(
    state: &AppState,
    req: ProvisionWorkspace,
) -> Result<Provisioned, AppError> {
    let name = required(&req.name, "name")?;
    let admin_name = required(&req.admin_name, "admin_name")?;
    let admin_email = validate_email(&req.admin_email)?;
    let slug = validate_slug(&req.slug)?;
    let document = validate_document(&req.document)?;
    validate_client_type(&req.client_type)?;
    if let Some(ref pw) = req.provisional_password {
        validate_password(pw)?;
    }

    // Pre-checks give the product's conflict messages. The unique constraints
    // are the actual guard under concurrency; inserts map violations to the
    // same 409s.
    if db::workspaces::find_by_slug(&state.pool, &slug).await?.is_some() {
        return Err(AppError::Conflict(
            "Já existe um workspace com este slug".to_string(),
        ));
    }
    if db::workspaces::find_by_document(&state.pool, &document)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Já existe um workspace com este documento".to_string(),
        ));
    }
    let mut saga = Saga::new("provision-workspace");

    // Step 1: workspace row. Nothing to compensate if this fails.
    let workspace =
        db::workspaces::create(&state.pool, name, &slug, &req.client_type, &document)
            .await
            .map_err(workspace_insert_error)?;
    {
        let pool = state.pool.clone();
        let id = workspace.id;
        saga.on_abort("delete-workspace", async move {
            db::workspaces::delete(&pool, id)
                .await
                .map_err(|e| e.to_string())
        });
    }

    // Step 2: admin identity, with given or generated provisional password.
    let (provisional_password, invited) = match req.provisional_password {
        Some(pw) => (pw, false),
        None => (password::generate_provisional(), true),
    };
    let identity = match state.identity.create(&admin_email, &provisional_password).await {
        Ok(identity) => identity,
        Err(e) => {
            saga.abort().await;
            return Err(e.into());
        }
    };
    {
        let provider = state.identity.clone();
        let id = identity.id;
        saga.on_abort("delete-identity", async move {
            provider.delete(id).await.map_err(|e| e.to_string())
        });
    }

    // Step 3: profile keyed by the identity id.
    let profile =
        match db::profiles::upsert(&state.pool, identity.id, admin_name, &admin_email).await {
            Ok(profile) => profile,
            Err(e) => {
                saga.abort().await;
                return Err(e.into());
            }
        };
    {
        let pool = state.pool.clone();
        let id = profile.id;
        saga.on_abort("delete-profile", async move {
            db::profiles::delete(&pool, id)
                .await
                .map_err(|e| e.to_string())
        });
    }

    // Step 4: owner membership.
    if let Err(e) = db::members::create(&state.pool, workspace.id, profile.id, "work_owner").await
    {
        saga.abort().await;
        return Err(e.into());
    }

    saga.commit();

    if invited {
        if let Some(ref mailer) = state.system_mailer {
            let _ = mailer
                .send_workspace_invite(
                    &admin_email,
                    admin_name,
                    &workspace.name,
                    &provisional_password,
                    &state.config.base_url,
                )
                .await;
        }
    }

    audit::log_event(
        &state.pool,
        Some(workspace.id),
        Some(profile.id),
        "workspace.provisioned",
        "workspace",
        Some(workspace.id),
        None,
    )
    .await;

    Ok(Provisioned {
        workspace_id: workspace.id,
        user_id: identity.id,
        profile_id: profile.id,
    })
}

/// Add an owner admin to an existing workspace: identity, profile, owner
/// membership, with the same compensation discipline as full provisioning.
pub async fn provision_workspace_admin(
    state: &AppState,
    req: ProvisionAdmin,
) -> Result<AdminProvisioned, AppError> {
    let full_name = required(&req.full_name, "full_name")?;
    let email = validate_email(&req.email)?;
    validate_password(&req.password)?;

    db::workspaces::find_by_id(&state.pool, req.workspace_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workspace não encontrado".to_string()))?;

    let mut saga = Saga::new("provision-workspace-admin");

    let identity = state.identity.create(&email, &req.password).await?;
    {
        let provider = state.identity.clone();
        let id = identity.id;
        saga.on_abort("delete-identity", async move {
            provider.delete(id).await.map_err(|e| e.to_string())
        });
    }

    let profile = match db::profiles::upsert(&state.pool, identity.id, full_name, &email).await {
        Ok(profile) => profile,
        Err(e) => {
            saga.abort().await;
            return Err(e.into());
        }
    };
    {
        let pool = state.pool.clone();
        let id = profile.id;
        saga.on_abort("delete-profile", async move {
            db::profiles::delete(&pool, id)
                .await
                .map_err(|e| e.to_string())
        });
    }

    if let Err(e) =
        db::members::create(&state.pool, req.workspace_id, profile.id, "work_owner").await
    {
        saga.abort().await;
        return Err(match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Este usuário já é membro do workspace".to_string())
            }
            _ => AppError::Database(e),
        });
    }

    saga.commit();

    audit::log_event(
        &state.pool,
        Some(req.workspace_id),
        Some(profile.id),
        "workspace.admin_added",
        "profile",
        Some(profile.id),
        None,
    )
    .await;

    Ok(AdminProvisioned {
        user_id: identity.id,
        profile_id: profile.id,
    })
}

/// Reverse workflow: owner identity delete (failure tolerated), then the
/// workspace row. Memberships and tasks go via FK cascade; the profile goes
/// with the identity. There is no rollback path, partial failure is surfaced
/// through the returned flags.
pub async fn delete_workspace(
    state: &AppState,
    workspace_id: Uuid,
) -> Result<DeletionOutcome, AppError> {
    db::workspaces::find_by_id(&state.pool, workspace_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workspace não encontrado".to_string()))?;

    let mut user_deleted = false;
    match db::members::find_owner(&state.pool, workspace_id).await? {
        Some(owner) => match state.identity.delete(owner.profile_id).await {
            Ok(()) => user_deleted = true,
            Err(e) => {
                tracing::error!(
                    "Owner identity {} delete failed for workspace {workspace_id}: {e}",
                    owner.profile_id
                );
            }
        },
        None => {
            tracing::warn!("Workspace {workspace_id} has no work_owner, skipping identity delete");
        }
    }

    let workspace_deleted = match db::workspaces::delete(&state.pool, workspace_id).await {
        Ok(()) => true,
        Err(e) => {
            // Identity may already be gone at this point; the flags carry
            // that state back to the caller.
            tracing::error!("CRITICAL: workspace {workspace_id} delete failed: {e}");
            false
        }
    };

    if workspace_deleted {
        audit::log_event(
            &state.pool,
            None,
            None,
            "workspace.deleted",
            "workspace",
            Some(workspace_id),
            Some(serde_json::json!({ "user_deleted": user_deleted })),
        )
        .await;
    }

    Ok(DeletionOutcome {
        workspace_deleted,
        user_deleted,
    })
}

fn workspace_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("document") {
                return AppError::Conflict(
                    "Já existe um workspace com este documento".to_string(),
                );
            }
            return AppError::Conflict("Já existe um workspace com este slug".to_string());
        }
    }
    AppError::Database(e)
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Campo obrigatório ausente: {field}"
        )));
    }
    Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AppError::BadRequest("Email inválido".to_string()));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::BadRequest(
            "A senha deve ter pelo menos 8 caracteres".to_string(),
        ));
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<String, AppError> {
    let slug = slug.trim().to_string();
    if slug.is_empty() || slug.len() > 100 {
        return Err(AppError::BadRequest(
            "Slug deve ter entre 1 e 100 caracteres".to_string(),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::BadRequest(
            "Slug deve conter apenas letras minúsculas, números e hífens".to_string(),
        ));
    }
    Ok(slug)
}

/// CPF (11 digits) or CNPJ (14 digits); punctuation is stripped before
/// storage so the unique constraint sees a normalized value.
fn validate_document(document: &str) -> Result<String, AppError> {
    let digits: String = document.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 11 && digits.len() != 14 {
        return Err(AppError::BadRequest(
            "Documento deve ser um CPF (11 dígitos) ou CNPJ (14 dígitos)".to_string(),
        ));
    }
    Ok(digits)
}

fn validate_client_type(client_type: &str) -> Result<(), AppError> {
    if !CLIENT_TYPES.contains(&client_type) {
        return Err(AppError::BadRequest(
            "client_type deve ser pessoa_juridica ou pessoa_fisica".to_string(),
        ));
    }
    Ok(())
}
