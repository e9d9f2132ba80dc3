//! DTO definitions for the authentication endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::{models::SessionEntity, remote::SignUpOutcome},
    dto::{format_timestamp, validation::validate_password},
};

/// Credentials supplied when signing in or creating an account.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CredentialsRequest {
    /// Email address of the account.
    #[validate(email)]
    pub email: String,
    /// Account password.
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

/// Request to send a password-reset email.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PasswordResetRequest {
    /// Email address to send the reset link to.
    #[validate(email)]
    pub email: String,
}

/// Session summary returned after a successful sign-in or restore.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Identifier of the signed-in account.
    pub user_id: Uuid,
    /// When the current access token expires.
    pub expires_at: String,
}

impl From<&SessionEntity> for SessionResponse {
    fn from(session: &SessionEntity) -> Self {
        Self {
            user_id: session.user_id,
            expires_at: format_timestamp(session.expires_at),
        }
    }
}

/// Result of a signup request.
#[derive(Debug, Serialize, ToSchema)]
pub struct SignUpResponse {
    /// Identifier of the created account.
    pub user_id: Uuid,
    /// True when the account must confirm its email before signing in.
    pub confirmation_required: bool,
    /// Present when a session was granted immediately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionResponse>,
}

impl From<&SignUpOutcome> for SignUpResponse {
    fn from(outcome: &SignUpOutcome) -> Self {
        match outcome {
            SignUpOutcome::Session(session) => Self {
                user_id: session.user_id,
                confirmation_required: false,
                session: Some(session.into()),
            },
            SignUpOutcome::ConfirmationRequired(user_id) => Self {
                user_id: *user_id,
                confirmation_required: true,
                session: None,
            },
        }
    }
}

/// Outcome of a silent session restore attempt.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestoreResponse {
    /// Identifier of the restored account, absent when logged out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}
