use chrono::{DateTime, Utc};
use serde::Serialize;

/// A project with its member set.
///
/// `members` holds user ids; the backing join table's composite primary key
/// keeps the set duplicate-free.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub owner_name: String,
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub owner_name: String,
}

/// A member expanded to display fields for project listings
#[derive(Debug, Clone, Serialize)]
pub struct ProjectMember {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Which slice of the project collection a caller may see.
///
/// Computed once per caller by the access layer and applied as a server-side
/// filter, so listings can never leak projects outside the caller's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    /// Every project (admins)
    All,
    /// Projects owned by this user (product owners)
    OwnedBy(String),
    /// Projects where this user appears in the member set (everyone else)
    MemberOf(String),
}
