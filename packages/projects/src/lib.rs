// ABOUTME: Project management module
// ABOUTME: Projects, membership sets, and scoped listing

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use storage::ProjectStorage;
pub use types::{NewProject, Project, ProjectMember, ProjectScope};
