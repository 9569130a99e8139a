mod audit_event;
mod identity;
mod member;
mod profile;
mod task;
mod workspace;

pub use audit_event::AuditEvent;
pub use identity::Identity;
pub use member::{WorkspaceMember, WorkspaceMemberView, ROLES};
pub use profile::Profile;
pub use task::{Task, PRIORITIES, STATUSES};
pub use workspace::Workspace;
