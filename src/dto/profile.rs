//! DTO definitions for the profile endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::UserEntity,
    dto::validation::{validate_display_name, validate_password},
};

/// The signed-in user's profile as shown on the profile screen.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    /// Stable account identifier.
    pub id: Uuid,
    /// Registered email address.
    pub email: String,
    /// Display name, if one was ever set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<UserEntity> for ProfileResponse {
    fn from(user: UserEntity) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}

/// Request to change the display name.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[validate(custom(function = "validate_display_name"))]
    pub display_name: String,
}

/// Request to replace the account password.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    /// New password.
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}
