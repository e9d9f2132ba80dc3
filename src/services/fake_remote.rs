//! In-memory stand-in for the remote data service, used by service tests.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use futures::future::{self, BoxFuture};
use reqwest::StatusCode;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{
        models::{League, PredictionEntity, SessionEntity, TeamEntity, UserEntity},
        remote::{RemoteConfig, RemoteError, RemoteResult, RemoteService, SignUpOutcome, UserAttributes},
    },
    state::{AppState, SharedState},
};

#[derive(Debug, Clone)]
struct Account {
    email: String,
    password: String,
    display_name: Option<String>,
}

/// Fake transport holding accounts, teams and predictions in memory.
///
/// Access tokens have the shape `access:<user_id>`; refresh tokens rotate on
/// every refresh. Counters and failure flags let tests assert on side
/// effects.
#[derive(Debug, Default)]
pub(crate) struct FakeRemote {
    users: Mutex<HashMap<Uuid, Account>>,
    refresh_tokens: Mutex<HashMap<String, Uuid>>,
    teams: Mutex<Vec<TeamEntity>>,
    predictions: Mutex<HashMap<(Uuid, League, String), PredictionEntity>>,
    /// Number of refresh-grant calls observed.
    pub refresh_calls: AtomicUsize,
    /// Number of prediction upserts observed.
    pub upsert_calls: AtomicUsize,
    /// When set, sign-out requests fail with a server error.
    pub fail_sign_out: AtomicBool,
    /// When set, prediction upserts fail with a server error.
    pub fail_upserts: AtomicBool,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account directly, without going through signup.
    pub fn register(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.users.lock().unwrap().insert(
            id,
            Account {
                email: email.to_string(),
                password: password.to_string(),
                display_name: None,
            },
        );
        id
    }

    /// Invalidate every outstanding refresh token.
    pub fn revoke_refresh_tokens(&self) {
        self.refresh_tokens.lock().unwrap().clear();
    }

    /// Delete an account, as when it is removed server-side. Its access
    /// tokens are rejected from then on.
    pub fn remove_account(&self, id: Uuid) {
        self.users.lock().unwrap().remove(&id);
    }

    /// Seed the `teams` table.
    pub fn seed_teams(&self, teams: Vec<TeamEntity>) {
        *self.teams.lock().unwrap() = teams;
    }

    /// Delete a team row, as when a club is removed server-side.
    pub fn remove_team(&self, id: Uuid) {
        self.teams.lock().unwrap().retain(|team| team.id != id);
    }

    /// The stored prediction for a key, if any.
    pub fn prediction_for(
        &self,
        user_id: Uuid,
        league: League,
        season: &str,
    ) -> Option<PredictionEntity> {
        self.predictions
            .lock()
            .unwrap()
            .get(&(user_id, league, season.to_string()))
            .cloned()
    }

    fn mint_session(&self, user_id: Uuid) -> SessionEntity {
        let refresh_token = format!("refresh:{}", Uuid::new_v4());
        self.refresh_tokens
            .lock()
            .unwrap()
            .insert(refresh_token.clone(), user_id);
        SessionEntity {
            access_token: format!("access:{user_id}"),
            refresh_token,
            user_id,
            expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
        }
    }

    fn user_for_token(&self, access_token: &str) -> RemoteResult<Uuid> {
        access_token
            .strip_prefix("access:")
            .and_then(|raw| raw.parse::<Uuid>().ok())
            .filter(|id| self.users.lock().unwrap().contains_key(id))
            .ok_or(RemoteError::AuthRejected {
                path: "user".into(),
                status: StatusCode::UNAUTHORIZED,
            })
    }

    fn user_entity(&self, id: Uuid) -> UserEntity {
        let users = self.users.lock().unwrap();
        let account = &users[&id];
        UserEntity {
            id,
            email: account.email.clone(),
            display_name: account.display_name.clone(),
        }
    }
}

fn auth_rejected(path: &str, status: StatusCode) -> RemoteError {
    RemoteError::AuthRejected {
        path: path.into(),
        status,
    }
}

fn server_error(path: &str) -> RemoteError {
    RemoteError::RequestStatus {
        path: path.into(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl RemoteService for FakeRemote {
    fn sign_in(
        &self,
        email: String,
        password: String,
    ) -> BoxFuture<'static, RemoteResult<SessionEntity>> {
        let found = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(_, account)| account.email == email && account.password == password)
            .map(|(id, _)| *id);
        let result = match found {
            Some(id) => Ok(self.mint_session(id)),
            None => Err(auth_rejected(
                "token?grant_type=password",
                StatusCode::BAD_REQUEST,
            )),
        };
        Box::pin(future::ready(result))
    }

    fn sign_up(
        &self,
        email: String,
        password: String,
    ) -> BoxFuture<'static, RemoteResult<SignUpOutcome>> {
        let taken = self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|account| account.email == email);
        let result = if taken {
            Err(auth_rejected("signup", StatusCode::UNPROCESSABLE_ENTITY))
        } else {
            let id = self.register(&email, &password);
            Ok(SignUpOutcome::Session(self.mint_session(id)))
        };
        Box::pin(future::ready(result))
    }

    fn refresh_session(
        &self,
        refresh_token: String,
    ) -> BoxFuture<'static, RemoteResult<SessionEntity>> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let user_id = self.refresh_tokens.lock().unwrap().remove(&refresh_token);
        let result = match user_id {
            Some(id) => Ok(self.mint_session(id)),
            None => Err(auth_rejected(
                "token?grant_type=refresh_token",
                StatusCode::UNAUTHORIZED,
            )),
        };
        Box::pin(future::ready(result))
    }

    fn sign_out(&self, _access_token: String) -> BoxFuture<'static, RemoteResult<()>> {
        let result = if self.fail_sign_out.load(Ordering::SeqCst) {
            Err(server_error("logout"))
        } else {
            Ok(())
        };
        Box::pin(future::ready(result))
    }

    fn reset_password(&self, _email: String) -> BoxFuture<'static, RemoteResult<()>> {
        Box::pin(future::ready(Ok(())))
    }

    fn fetch_user(&self, access_token: String) -> BoxFuture<'static, RemoteResult<UserEntity>> {
        let result = self
            .user_for_token(&access_token)
            .map(|id| self.user_entity(id));
        Box::pin(future::ready(result))
    }

    fn update_user(
        &self,
        access_token: String,
        attributes: UserAttributes,
    ) -> BoxFuture<'static, RemoteResult<UserEntity>> {
        let result = self.user_for_token(&access_token).map(|id| {
            {
                let mut users = self.users.lock().unwrap();
                let account = users.get_mut(&id).unwrap();
                if let Some(password) = attributes.password {
                    account.password = password;
                }
                if let Some(name) = attributes
                    .data
                    .as_ref()
                    .and_then(|data| data.get("display_name"))
                    .and_then(|value| value.as_str())
                {
                    account.display_name = Some(name.to_string());
                }
            }
            self.user_entity(id)
        });
        Box::pin(future::ready(result))
    }

    fn list_teams(
        &self,
        _access_token: String,
        league: League,
        season: String,
    ) -> BoxFuture<'static, RemoteResult<Vec<TeamEntity>>> {
        let mut teams: Vec<TeamEntity> = self
            .teams
            .lock()
            .unwrap()
            .iter()
            .filter(|team| team.league == league && team.season == season)
            .cloned()
            .collect();
        teams.sort_by_key(|team| team.sort_order);
        Box::pin(future::ready(Ok(teams)))
    }

    fn find_team(
        &self,
        _access_token: String,
        id: Uuid,
    ) -> BoxFuture<'static, RemoteResult<Option<TeamEntity>>> {
        let team = self
            .teams
            .lock()
            .unwrap()
            .iter()
            .find(|team| team.id == id)
            .cloned();
        Box::pin(future::ready(Ok(team)))
    }

    fn find_prediction(
        &self,
        _access_token: String,
        user_id: Uuid,
        league: League,
        season: String,
    ) -> BoxFuture<'static, RemoteResult<Option<PredictionEntity>>> {
        let prediction = self
            .predictions
            .lock()
            .unwrap()
            .get(&(user_id, league, season))
            .cloned();
        Box::pin(future::ready(Ok(prediction)))
    }

    fn upsert_prediction(
        &self,
        _access_token: String,
        prediction: PredictionEntity,
    ) -> BoxFuture<'static, RemoteResult<()>> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_upserts.load(Ordering::SeqCst) {
            Err(server_error("predictions"))
        } else {
            let key = (
                prediction.user_id,
                prediction.league,
                prediction.season.clone(),
            );
            self.predictions.lock().unwrap().insert(key, prediction);
            Ok(())
        };
        Box::pin(future::ready(result))
    }

    fn health_check(&self) -> BoxFuture<'static, RemoteResult<()>> {
        Box::pin(future::ready(Ok(())))
    }
}

/// Build a shared state wired to a fake remote, with a far-future deadline.
pub(crate) fn test_state(remote: FakeRemote) -> (SharedState, Arc<FakeRemote>) {
    test_state_with_deadline(remote, OffsetDateTime::now_utc() + Duration::days(30))
}

/// Build a shared state wired to a fake remote and an explicit deadline.
pub(crate) fn test_state_with_deadline(
    remote: FakeRemote,
    deadline: OffsetDateTime,
) -> (SharedState, Arc<FakeRemote>) {
    let remote = Arc::new(remote);
    let config = AppConfig {
        remote: RemoteConfig::new("http://localhost", "anon-key"),
        season: "2025/2026".into(),
        deadline,
        session_file: std::env::temp_dir().join(format!("session-{}.json", Uuid::new_v4())),
    };
    let state = AppState::new(config, remote.clone());
    (state, remote)
}
