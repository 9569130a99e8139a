use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Workspace;

pub async fn create(
    pool: &PgPool,
    name: &str,
    slug: &str,
    client_type: &str,
    document: &str,
) -> Result<Workspace, sqlx::Error> {
    sqlx::query_as::<_, Workspace>(
        "INSERT INTO workspaces (name, slug, client_type, document)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(name)
    .bind(slug)
    .bind(client_type)
    .bind(document)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Workspace>, sqlx::Error> {
    sqlx::query_as::<_, Workspace>("SELECT * FROM workspaces WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Workspace>, sqlx::Error> {
    sqlx::query_as::<_, Workspace>("SELECT * FROM workspaces WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_document(
    pool: &PgPool,
    document: &str,
) -> Result<Option<Workspace>, sqlx::Error> {
    sqlx::query_as::<_, Workspace>("SELECT * FROM workspaces WHERE document = $1")
        .bind(document)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_profile(
    pool: &PgPool,
    profile_id: Uuid,
) -> Result<Vec<Workspace>, sqlx::Error> {
    sqlx::query_as::<_, Workspace>(
        "SELECT w.* FROM workspaces w
         JOIN workspace_members m ON m.workspace_id = w.id
         WHERE m.profile_id = $1
         ORDER BY w.created_at DESC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
}

/// Memberships and tasks go with the workspace via FK cascade.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM workspaces WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
