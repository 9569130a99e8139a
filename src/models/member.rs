use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ROLES: &[&str] = &["work_owner", "work_manager", "work_user"];

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct WorkspaceMember {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub profile_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Membership joined with the member's profile, for listings.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct WorkspaceMemberView {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub profile_id: Uuid,
    pub role: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
