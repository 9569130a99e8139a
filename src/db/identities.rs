use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Identity;

pub async fn create(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<Identity, sqlx::Error> {
    sqlx::query_as::<_, Identity>(
        "INSERT INTO identities (email, password_hash) VALUES ($1, $2) RETURNING *",
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Identity>, sqlx::Error> {
    sqlx::query_as::<_, Identity>("SELECT * FROM identities WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM identities WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
