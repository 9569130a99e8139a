use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{WorkspaceMember, WorkspaceMemberView};

pub async fn create(
    pool: &PgPool,
    workspace_id: Uuid,
    profile_id: Uuid,
    role: &str,
) -> Result<WorkspaceMember, sqlx::Error> {
    sqlx::query_as::<_, WorkspaceMember>(
        "INSERT INTO workspace_members (workspace_id, profile_id, role)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(workspace_id)
    .bind(profile_id)
    .bind(role)
    .fetch_one(pool)
    .await
}

pub async fn find(
    pool: &PgPool,
    workspace_id: Uuid,
    profile_id: Uuid,
) -> Result<Option<WorkspaceMember>, sqlx::Error> {
    sqlx::query_as::<_, WorkspaceMember>(
        "SELECT * FROM workspace_members WHERE workspace_id = $1 AND profile_id = $2",
    )
    .bind(workspace_id)
    .bind(profile_id)
    .fetch_optional(pool)
    .await
}

/// First owner by membership age; deletion resolves the identity through this.
pub async fn find_owner(
    pool: &PgPool,
    workspace_id: Uuid,
) -> Result<Option<WorkspaceMember>, sqlx::Error> {
    sqlx::query_as::<_, WorkspaceMember>(
        "SELECT * FROM workspace_members
         WHERE workspace_id = $1 AND role = 'work_owner'
         ORDER BY created_at ASC LIMIT 1",
    )
    .bind(workspace_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_by_workspace(
    pool: &PgPool,
    workspace_id: Uuid,
) -> Result<Vec<WorkspaceMemberView>, sqlx::Error> {
    sqlx::query_as::<_, WorkspaceMemberView>(
        "SELECT m.id, m.workspace_id, m.profile_id, m.role, p.full_name, p.email, m.created_at
         FROM workspace_members m
         JOIN profiles p ON p.id = m.profile_id
         WHERE m.workspace_id = $1
         ORDER BY m.created_at ASC",
    )
    .bind(workspace_id)
    .fetch_all(pool)
    .await
}

pub async fn count_owners(pool: &PgPool, workspace_id: Uuid) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM workspace_members
         WHERE workspace_id = $1 AND role = 'work_owner'",
    )
    .bind(workspace_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// How many of the given profiles are members of the workspace.
pub async fn count_matching(
    pool: &PgPool,
    workspace_id: Uuid,
    profile_ids: &[Uuid],
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM workspace_members
         WHERE workspace_id = $1 AND profile_id = ANY($2)",
    )
    .bind(workspace_id)
    .bind(profile_ids)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn update_role(
    pool: &PgPool,
    workspace_id: Uuid,
    profile_id: Uuid,
    role: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE workspace_members SET role = $3 WHERE workspace_id = $1 AND profile_id = $2",
    )
    .bind(workspace_id)
    .bind(profile_id)
    .bind(role)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(
    pool: &PgPool,
    workspace_id: Uuid,
    profile_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM workspace_members WHERE workspace_id = $1 AND profile_id = $2")
        .bind(workspace_id)
        .bind(profile_id)
        .execute(pool)
        .await?;
    Ok(())
}
