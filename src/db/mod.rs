pub mod audit;
pub mod identities;
pub mod members;
pub mod profiles;
pub mod tasks;
pub mod workspaces;
