use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Task;

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    workspace_id: Uuid,
    title: &str,
    description: Option<&str>,
    priority: &str,
    status: &str,
    due_date: Option<NaiveDate>,
    tags: &serde_json::Value,
    subtasks: &serde_json::Value,
) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (workspace_id, title, description, priority, status, due_date, tags, subtasks)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(workspace_id)
    .bind(title)
    .bind(description)
    .bind(priority)
    .bind(status)
    .bind(due_date)
    .bind(tags)
    .bind(subtasks)
    .fetch_one(pool)
    .await
}

pub async fn add_assignees(
    pool: &PgPool,
    task_id: Uuid,
    profile_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO task_assignees (task_id, profile_id)
         SELECT $1, unnest($2::uuid[])
         ON CONFLICT DO NOTHING",
    )
    .bind(task_id)
    .bind(profile_ids)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_by_workspace(
    pool: &PgPool,
    workspace_id: Uuid,
) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE workspace_id = $1 ORDER BY created_at DESC",
    )
    .bind(workspace_id)
    .fetch_all(pool)
    .await
}

pub async fn update_status(pool: &PgPool, id: Uuid, status: &str) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
