//! Client for the remote data service (auth endpoints plus table API).

mod config;
mod error;
mod models;
mod store;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{League, PredictionEntity, SessionEntity, TeamEntity, UserEntity};

pub use config::{RemoteConfig, RemoteConfigError};
pub use error::{RemoteError, RemoteResult};
pub use models::UserAttributes;
pub use store::SupabaseRemote;

/// Outcome of a signup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account is immediately usable with the returned session.
    Session(SessionEntity),
    /// The account was created but must confirm its email before signing in.
    ConfirmationRequired(Uuid),
}

/// Abstraction over the remote auth and table API.
///
/// Services depend on this trait rather than the concrete client so tests
/// can substitute an in-memory fake.
pub trait RemoteService: Send + Sync {
    /// Exchange credentials for a session.
    fn sign_in(
        &self,
        email: String,
        password: String,
    ) -> BoxFuture<'static, RemoteResult<SessionEntity>>;
    /// Register a new account.
    fn sign_up(
        &self,
        email: String,
        password: String,
    ) -> BoxFuture<'static, RemoteResult<SignUpOutcome>>;
    /// Exchange a refresh token for a fresh session.
    fn refresh_session(
        &self,
        refresh_token: String,
    ) -> BoxFuture<'static, RemoteResult<SessionEntity>>;
    /// Invalidate the session server-side.
    fn sign_out(&self, access_token: String) -> BoxFuture<'static, RemoteResult<()>>;
    /// Trigger a password-reset email.
    fn reset_password(&self, email: String) -> BoxFuture<'static, RemoteResult<()>>;
    /// Fetch the live user record for a session.
    fn fetch_user(&self, access_token: String) -> BoxFuture<'static, RemoteResult<UserEntity>>;
    /// Apply attribute changes (display name, password) to the user record.
    fn update_user(
        &self,
        access_token: String,
        attributes: UserAttributes,
    ) -> BoxFuture<'static, RemoteResult<UserEntity>>;
    /// All teams of a league and season, ordered by their default position.
    fn list_teams(
        &self,
        access_token: String,
        league: League,
        season: String,
    ) -> BoxFuture<'static, RemoteResult<Vec<TeamEntity>>>;
    /// Look up a single team by identifier.
    fn find_team(
        &self,
        access_token: String,
        id: Uuid,
    ) -> BoxFuture<'static, RemoteResult<Option<TeamEntity>>>;
    /// The stored prediction for one user, league and season, if any.
    fn find_prediction(
        &self,
        access_token: String,
        user_id: Uuid,
        league: League,
        season: String,
    ) -> BoxFuture<'static, RemoteResult<Option<PredictionEntity>>>;
    /// Insert or overwrite a prediction keyed on (user, league, season).
    fn upsert_prediction(
        &self,
        access_token: String,
        prediction: PredictionEntity,
    ) -> BoxFuture<'static, RemoteResult<()>>;
    /// Cheap reachability probe used by the health endpoint.
    fn health_check(&self) -> BoxFuture<'static, RemoteResult<()>>;
}
