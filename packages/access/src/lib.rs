// ABOUTME: Access control core: pure decision functions over roles and ownership
// ABOUTME: Callers are assumed authenticated and active; status is checked upstream

use reqtrack_projects::{Project, ProjectScope};
use reqtrack_users::{Role, User};

/// Outcome of an access decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// The denial reason, if any
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(reason),
        }
    }
}

/// Which slice of the project collection this caller may list.
///
/// One decision per caller, applied as a server-side filter: admins see
/// everything, product owners their own projects, everyone else the projects
/// they are a member of.
pub fn project_scope(caller: &User) -> ProjectScope {
    match caller.role {
        Role::Admin => ProjectScope::All,
        Role::ProductOwner => ProjectScope::OwnedBy(caller.id.clone()),
        Role::Developer | Role::Pending => ProjectScope::MemberOf(caller.id.clone()),
    }
}

/// Project creation is reserved for product owners; admins may too
pub fn can_create_project(caller: &User) -> Decision {
    match caller.role {
        Role::Admin | Role::ProductOwner => Decision::Allow,
        Role::Developer | Role::Pending => {
            Decision::Deny("Product owner role is required to create projects")
        }
    }
}

/// Owner-or-admin rule shared by project delete, add-member, and remove-member
pub fn can_manage_project(caller: &User, project: &Project) -> Decision {
    if caller.role.is_admin() || caller.id == project.owner_id {
        Decision::Allow
    } else {
        Decision::Deny("Only the project owner or an administrator can modify this project")
    }
}

/// Read/write access to a project's requirements.
///
/// The same rule gates listing, creating, and updating requirements:
/// admins always, product owners on projects they own, developers on
/// projects where they are a member.
pub fn can_access_requirements(caller: &User, project: &Project) -> Decision {
    match caller.role {
        Role::Admin => Decision::Allow,
        Role::ProductOwner => {
            if caller.id == project.owner_id {
                Decision::Allow
            } else {
                Decision::Deny("You do not have access to this project")
            }
        }
        Role::Developer => {
            if project.has_member(&caller.id) {
                Decision::Allow
            } else {
                Decision::Deny("You do not have access to this project")
            }
        }
        Role::Pending => Decision::Deny("No role has been assigned to this account"),
    }
}

/// Requirement deletion narrows the access rule to owner-or-admin.
///
/// Developers are denied unconditionally, membership notwithstanding, and the
/// denial is a permission outcome so the resource's existence is not hidden.
pub fn can_delete_requirement(caller: &User, project: &Project) -> Decision {
    match caller.role {
        Role::Admin => Decision::Allow,
        Role::ProductOwner => {
            if caller.id == project.owner_id {
                Decision::Allow
            } else {
                Decision::Deny("You do not have permission to delete this requirement")
            }
        }
        Role::Developer => Decision::Deny("Only the product owner can delete requirements"),
        Role::Pending => Decision::Deny("No role has been assigned to this account"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use reqtrack_users::AccountStatus;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: id.to_string(),
            role,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        }
    }

    fn project(id: &str, owner_id: &str, members: &[&str]) -> Project {
        Project {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            owner_id: owner_id.to_string(),
            owner_name: owner_id.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_project_scope_per_role() {
        let admin = user("admin", Role::Admin);
        let owner = user("po", Role::ProductOwner);
        let dev = user("dev", Role::Developer);
        let pending = user("newbie", Role::Pending);

        assert_eq!(project_scope(&admin), ProjectScope::All);
        assert_eq!(project_scope(&owner), ProjectScope::OwnedBy("po".to_string()));
        assert_eq!(project_scope(&dev), ProjectScope::MemberOf("dev".to_string()));
        assert_eq!(
            project_scope(&pending),
            ProjectScope::MemberOf("newbie".to_string())
        );
    }

    #[test]
    fn test_scope_filters_to_exact_project_sets() {
        // 3 users x 3 projects with varied ownership and membership
        let admin = user("admin", Role::Admin);
        let po = user("po", Role::ProductOwner);
        let dev = user("dev", Role::Developer);

        let p1 = project("p1", "po", &[]);
        let p2 = project("p2", "po", &["dev"]);
        let p3 = project("p3", "other-po", &["dev", "someone"]);
        let all = [&p1, &p2, &p3];

        let visible = |caller: &User| -> Vec<String> {
            let scope = project_scope(caller);
            all.iter()
                .filter(|p| match &scope {
                    ProjectScope::All => true,
                    ProjectScope::OwnedBy(id) => &p.owner_id == id,
                    ProjectScope::MemberOf(id) => p.has_member(id),
                })
                .map(|p| p.id.clone())
                .collect()
        };

        assert_eq!(visible(&admin), vec!["p1", "p2", "p3"]);
        assert_eq!(visible(&po), vec!["p1", "p2"]);
        assert_eq!(visible(&dev), vec!["p2", "p3"]);
    }

    #[test]
    fn test_can_create_project() {
        assert!(can_create_project(&user("a", Role::Admin)).is_allowed());
        assert!(can_create_project(&user("p", Role::ProductOwner)).is_allowed());
        assert!(!can_create_project(&user("d", Role::Developer)).is_allowed());
        assert!(!can_create_project(&user("n", Role::Pending)).is_allowed());
    }

    #[test]
    fn test_can_manage_project_is_owner_or_admin() {
        let p = project("p1", "po", &["dev"]);

        assert!(can_manage_project(&user("admin", Role::Admin), &p).is_allowed());
        assert!(can_manage_project(&user("po", Role::ProductOwner), &p).is_allowed());

        // Another product owner is not this project's owner
        assert!(!can_manage_project(&user("other-po", Role::ProductOwner), &p).is_allowed());
        // Membership grants no management rights
        assert!(!can_manage_project(&user("dev", Role::Developer), &p).is_allowed());
    }

    #[test]
    fn test_requirement_access_rule() {
        let p = project("p1", "po", &["dev"]);

        assert!(can_access_requirements(&user("admin", Role::Admin), &p).is_allowed());
        assert!(can_access_requirements(&user("po", Role::ProductOwner), &p).is_allowed());
        assert!(can_access_requirements(&user("dev", Role::Developer), &p).is_allowed());

        assert!(!can_access_requirements(&user("other-po", Role::ProductOwner), &p).is_allowed());
        assert!(!can_access_requirements(&user("outsider", Role::Developer), &p).is_allowed());
        assert!(!can_access_requirements(&user("newbie", Role::Pending), &p).is_allowed());
    }

    #[test]
    fn test_developers_never_delete_requirements() {
        let p = project("p1", "po", &["dev"]);

        // Denied even as a member of the project, with a distinct reason
        let decision = can_delete_requirement(&user("dev", Role::Developer), &p);
        assert!(!decision.is_allowed());
        assert_ne!(
            decision.reason(),
            can_delete_requirement(&user("outsider", Role::ProductOwner), &p).reason()
        );

        assert!(can_delete_requirement(&user("po", Role::ProductOwner), &p).is_allowed());
        assert!(can_delete_requirement(&user("admin", Role::Admin), &p).is_allowed());
        assert!(!can_delete_requirement(&user("other-po", Role::ProductOwner), &p).is_allowed());
    }
}
