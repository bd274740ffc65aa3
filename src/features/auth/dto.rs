use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::AuthenticatedUser;

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub sub: String,
    pub roles: Vec<String>,
    pub team_id: Option<Uuid>,
    pub is_manager: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        let is_manager = user.has_manager_access();
        Self {
            sub: user.sub,
            roles: user.roles,
            team_id: user.team_id,
            is_manager,
        }
    }
}
