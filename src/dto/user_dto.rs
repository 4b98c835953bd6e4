use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::role::Role;
use crate::models::user::{User, UserProfilePatch};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub role: Role,
    #[validate(length(max = 4000))]
    pub additional_data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserResponse {
    pub user: User,
    pub is_new_user: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 4000))]
    pub additional_data: Option<String>,
}

impl From<UpdateUserRequest> for UserProfilePatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            additional_data: req.additional_data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: Option<User>,
}
