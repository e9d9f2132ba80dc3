//! Wire payloads exchanged with the remote auth and table endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::dao::models::{SessionEntity, UserEntity};

/// Payload returned by the token endpoint for password and refresh grants.
#[derive(Debug, Deserialize)]
pub struct TokenGrant {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token used to mint the next access token.
    pub refresh_token: String,
    /// Remaining validity of the access token, in seconds.
    pub expires_in: i64,
    /// Account record attached to the grant.
    pub user: WireUser,
}

impl TokenGrant {
    /// Convert the grant into a session entity anchored at `now`.
    pub fn into_session(self, now: OffsetDateTime) -> SessionEntity {
        SessionEntity {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user_id: self.user.id,
            expires_at: now + Duration::seconds(self.expires_in),
        }
    }
}

/// Payload returned by the signup endpoint.
///
/// When email confirmation is pending the service answers with the bare
/// account record instead of a token grant.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpGrant {
    /// The account is immediately usable.
    Session(TokenGrant),
    /// The account exists but must be confirmed by email first.
    Pending(WireUser),
}

/// Account record as serialized by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    /// Stable account identifier.
    pub id: Uuid,
    /// Registered email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form metadata bag; the game only reads `display_name`.
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl From<WireUser> for UserEntity {
    fn from(wire: WireUser) -> Self {
        let display_name = wire
            .user_metadata
            .get("display_name")
            .and_then(|value| value.as_str())
            .map(str::to_string);
        UserEntity {
            id: wire.id,
            email: wire.email.unwrap_or_default(),
            display_name,
        }
    }
}

/// Attribute changes accepted by the auth service's user-update endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserAttributes {
    /// New login password, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Metadata patch; currently only `display_name` is written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl UserAttributes {
    /// Attribute patch that sets the display name.
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            data: Some(json!({ "display_name": name.into() })),
            ..Self::default()
        }
    }

    /// Attribute patch that replaces the password.
    pub fn password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn token_grant_anchors_expiry_at_now() {
        let grant: TokenGrant = serde_json::from_value(json!({
            "access_token": "at",
            "refresh_token": "rt",
            "expires_in": 3600,
            "user": { "id": "7b52ade0-b667-4b15-a15d-9665c851c9f2" }
        }))
        .unwrap();

        let now = datetime!(2025-08-01 12:00 UTC);
        let session = grant.into_session(now);
        assert_eq!(session.expires_at, datetime!(2025-08-01 13:00 UTC));
        assert_eq!(
            session.user_id.to_string(),
            "7b52ade0-b667-4b15-a15d-9665c851c9f2"
        );
    }

    #[test]
    fn display_name_read_from_metadata() {
        let wire: WireUser = serde_json::from_value(json!({
            "id": "7b52ade0-b667-4b15-a15d-9665c851c9f2",
            "email": "fan@example.com",
            "user_metadata": { "display_name": "The Gaffer" }
        }))
        .unwrap();

        let user = UserEntity::from(wire);
        assert_eq!(user.display_name.as_deref(), Some("The Gaffer"));
        assert_eq!(user.email, "fan@example.com");
    }

    #[test]
    fn missing_metadata_yields_no_display_name() {
        let wire: WireUser = serde_json::from_value(json!({
            "id": "7b52ade0-b667-4b15-a15d-9665c851c9f2"
        }))
        .unwrap();

        let user = UserEntity::from(wire);
        assert_eq!(user.display_name, None);
    }
}
