use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{ROLE_ADMIN, ROLE_MANAGER};

/// Principal extracted from a validated access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Stable user identifier (token `sub`)
    pub sub: String,
    pub roles: Vec<String>,
    /// Team the user belongs to, if any
    pub team_id: Option<Uuid>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    pub fn is_manager(&self) -> bool {
        self.has_role(ROLE_MANAGER)
    }

    /// Admins and managers (rescans, team administration)
    pub fn has_manager_access(&self) -> bool {
        self.is_admin() || self.is_manager()
    }

    /// Whether the user is a member of `team`
    pub fn belongs_to(&self, team: Option<Uuid>) -> bool {
        matches!((self.team_id, team), (Some(mine), Some(theirs)) if mine == theirs)
    }

    /// Whether the user may act as manager over files of `team`
    pub fn manages(&self, team: Option<Uuid>) -> bool {
        self.is_admin() || (self.is_manager() && self.belongs_to(team))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::ROLE_MEMBER;
    use crate::shared::test_helpers::create_user;

    #[test]
    fn test_member_belongs_only_to_own_team() {
        let team = Uuid::new_v4();
        let user = create_user("ana", ROLE_MEMBER, Some(team));

        assert!(user.belongs_to(Some(team)));
        assert!(!user.belongs_to(Some(Uuid::new_v4())));
        assert!(!user.belongs_to(None));
        assert!(!user.manages(Some(team)));
        assert!(!user.has_manager_access());
    }

    #[test]
    fn test_manager_manages_own_team_only() {
        let team = Uuid::new_v4();
        let user = create_user("ben", ROLE_MANAGER, Some(team));

        assert!(user.manages(Some(team)));
        assert!(!user.manages(Some(Uuid::new_v4())));
        assert!(!user.manages(None));
        assert!(user.has_manager_access());
    }

    #[test]
    fn test_admin_manages_everything() {
        let user = create_user("root", ROLE_ADMIN, None);

        assert!(user.manages(None));
        assert!(user.manages(Some(Uuid::new_v4())));
        assert!(user.has_manager_access());
    }
}
