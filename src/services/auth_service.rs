//! Session lifecycle: silent restore, sign in/up/out, profile updates.
//!
//! Every remote failure is converted into a typed error; nothing here
//! panics or retries. The only retry-like behavior is the implicit token
//! refresh performed when a session is close to expiry.

use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        models::{SessionEntity, UserEntity},
        remote::{RemoteResult, SignUpOutcome, UserAttributes},
    },
    error::ServiceError,
    state::SharedState,
};

/// Access tokens expiring within this window are refreshed before use.
const EXPIRY_MARGIN: Duration = Duration::seconds(30);

/// Attempt a silent login from the persisted session.
///
/// Returns the user id on success. The restored session is confirmed with
/// the remote service, since a token that merely looks fresh may have been
/// revoked server-side. On any failure the local session (memory and disk)
/// is cleared and `None` is returned; with no persisted session at all, no
/// network call is made. Safe to invoke repeatedly.
pub async fn try_auto_login(state: &SharedState) -> Option<Uuid> {
    let session = match ensure_session(state).await {
        Ok(session) => session,
        Err(ServiceError::Unauthorized(_)) => return None,
        Err(err) => {
            warn!(error = %err, "auto login failed");
            return None;
        }
    };

    match session_checked(state, state.remote().fetch_user(session.access_token).await).await {
        Ok(user) => Some(user.id),
        Err(ServiceError::Unauthorized(_)) => None,
        Err(err) => {
            warn!(error = %err, "auto login failed");
            None
        }
    }
}

/// Produce a session valid for an authenticated request, refreshing and
/// re-persisting it when it is expired or about to expire.
///
/// Any refresh failure invalidates the local session: the remote service
/// has rotated or rejected the tokens, so keeping them would only produce
/// further failures.
pub(crate) async fn ensure_session(state: &SharedState) -> Result<SessionEntity, ServiceError> {
    let session = match state.current_session().await {
        Some(session) => session,
        None => state
            .session_store()
            .load()
            .ok_or_else(|| ServiceError::Unauthorized("no saved session".into()))?,
    };

    if session.expires_at > OffsetDateTime::now_utc() + EXPIRY_MARGIN {
        state.install_session(session.clone()).await;
        return Ok(session);
    }

    match state
        .remote()
        .refresh_session(session.refresh_token.clone())
        .await
    {
        Ok(fresh) => {
            persist_session(state, &fresh).await?;
            Ok(fresh)
        }
        Err(err) => {
            warn!(error = %err, "session refresh failed; clearing local session");
            discard_session(state).await;
            Err(ServiceError::Unauthorized("session expired".into()))
        }
    }
}

/// Unwrap the result of a session-authenticated remote call.
///
/// An auth rejection means the remote service no longer honors the session
/// (revoked tokens, deleted account), so the local copy is invalidated
/// before the error is surfaced.
pub(crate) async fn session_checked<T>(
    state: &SharedState,
    result: RemoteResult<T>,
) -> Result<T, ServiceError> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_auth_failure() => {
            warn!(error = %err, "session rejected by the remote service; clearing local session");
            discard_session(state).await;
            Err(ServiceError::Unauthorized("session rejected".into()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Exchange credentials for a session, persisting it on success.
pub async fn sign_in(
    state: &SharedState,
    email: String,
    password: String,
) -> Result<SessionEntity, ServiceError> {
    let session = state.remote().sign_in(email, password).await?;
    persist_session(state, &session).await?;
    info!(user_id = %session.user_id, "signed in");
    Ok(session)
}

/// Register a new account; a session is persisted only when the remote
/// service grants one immediately (no email confirmation pending).
pub async fn sign_up(
    state: &SharedState,
    email: String,
    password: String,
) -> Result<SignUpOutcome, ServiceError> {
    let outcome = state.remote().sign_up(email, password).await?;
    if let SignUpOutcome::Session(session) = &outcome {
        persist_session(state, session).await?;
        info!(user_id = %session.user_id, "signed up");
    }
    Ok(outcome)
}

/// Sign out: best-effort remote invalidation followed by unconditional
/// local clearing. Never fails.
pub async fn sign_out(state: &SharedState) {
    let session = match state.current_session().await {
        Some(session) => Some(session),
        None => state.session_store().load(),
    };

    if let Some(session) = session {
        if let Err(err) = state.remote().sign_out(session.access_token).await {
            warn!(error = %err, "remote sign-out failed; clearing local session anyway");
        }
    }

    discard_session(state).await;
    info!("signed out");
}

/// Ask the remote service to send a password-reset email.
pub async fn reset_password(state: &SharedState, email: String) -> Result<(), ServiceError> {
    state.remote().reset_password(email).await?;
    Ok(())
}

/// The live user record for the current session.
///
/// Always revalidates the session and queries the remote service; a locally
/// cached copy is never trusted since the display name may have changed
/// server-side.
pub async fn current_user(state: &SharedState) -> Result<UserEntity, ServiceError> {
    let session = ensure_session(state).await?;
    session_checked(state, state.remote().fetch_user(session.access_token).await).await
}

/// Update the display name kept in the account metadata.
pub async fn update_display_name(
    state: &SharedState,
    display_name: String,
) -> Result<UserEntity, ServiceError> {
    let session = ensure_session(state).await?;
    let result = state
        .remote()
        .update_user(session.access_token, UserAttributes::display_name(display_name))
        .await;
    session_checked(state, result).await
}

/// Replace the account password.
pub async fn change_password(
    state: &SharedState,
    password: String,
) -> Result<UserEntity, ServiceError> {
    let session = ensure_session(state).await?;
    let result = state
        .remote()
        .update_user(session.access_token, UserAttributes::password(password))
        .await;
    session_checked(state, result).await
}

async fn persist_session(
    state: &SharedState,
    session: &SessionEntity,
) -> Result<(), ServiceError> {
    state.session_store().save(session)?;
    state.install_session(session.clone()).await;
    Ok(())
}

async fn discard_session(state: &SharedState) {
    state.session_store().clear();
    state.clear_session().await;
}
