use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Profile;

/// Upsert keyed by the identity id; re-provisioning an existing identity
/// refreshes the name and email.
pub async fn upsert(
    pool: &PgPool,
    id: Uuid,
    full_name: &str,
    email: &str,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (id, full_name, email) VALUES ($1, $2, $3)
         ON CONFLICT (id) DO UPDATE
           SET full_name = EXCLUDED.full_name,
               email = EXCLUDED.email,
               updated_at = now()
         RETURNING *",
    )
    .bind(id)
    .bind(full_name)
    .bind(email)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
