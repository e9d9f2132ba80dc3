use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode, header::HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dao::{
    models::{League, PredictionEntity, SessionEntity, TeamEntity, UserEntity},
    remote::{RemoteService, SignUpOutcome},
};

use super::{
    config::RemoteConfig,
    error::{RemoteError, RemoteResult},
    models::{SignUpGrant, TokenGrant, UserAttributes, WireUser},
};

/// API family a request targets. The two families signal session problems
/// with different status codes.
#[derive(Debug, Clone, Copy)]
enum Endpoint {
    /// GoTrue endpoints under `/auth/v1`: credential problems also arrive
    /// as 400 and 422.
    Auth,
    /// PostgREST tables under `/rest/v1`: only 401 and 403 concern the
    /// session, a 400 is a malformed query.
    Table,
}

impl Endpoint {
    fn is_auth_status(self, status: StatusCode) -> bool {
        match self {
            Endpoint::Auth => matches!(
                status,
                StatusCode::BAD_REQUEST
                    | StatusCode::UNAUTHORIZED
                    | StatusCode::FORBIDDEN
                    | StatusCode::UNPROCESSABLE_ENTITY
            ),
            Endpoint::Table => {
                matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
            }
        }
    }
}

/// Reqwest-backed client for a Supabase-style remote service: GoTrue auth
/// endpoints under `/auth/v1` and PostgREST tables under `/rest/v1`.
#[derive(Clone)]
pub struct SupabaseRemote {
    client: Client,
    base_url: Arc<str>,
    anon_key: Arc<str>,
}

impl SupabaseRemote {
    /// Build the HTTP client from a remote configuration.
    pub fn connect(config: RemoteConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| RemoteError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
            anon_key: Arc::<str>::from(config.anon_key),
        })
    }

    fn auth_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/auth/v1/{}", self.base_url, path);
        self.client
            .request(method, url)
            .header("apikey", self.anon_key.as_ref())
    }

    fn rest_request(&self, method: Method, table: &str, token: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        self.client
            .request(method, url)
            .header("apikey", self.anon_key.as_ref())
            .bearer_auth(token)
    }

    /// Send a request whose body we decode, mapping auth rejections apart
    /// from other unexpected statuses.
    async fn send_decode<T>(
        builder: reqwest::RequestBuilder,
        path: &str,
        endpoint: Endpoint,
    ) -> RemoteResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder
            .send()
            .await
            .map_err(|source| RemoteError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|source| RemoteError::DecodeResponse {
                    path: path.to_string(),
                    source,
                })
        } else if endpoint.is_auth_status(status) {
            Err(RemoteError::AuthRejected {
                path: path.to_string(),
                status,
            })
        } else {
            Err(RemoteError::RequestStatus {
                path: path.to_string(),
                status,
            })
        }
    }

    /// Send a request where only the status matters.
    async fn send_unit(
        builder: reqwest::RequestBuilder,
        path: &str,
        endpoint: Endpoint,
    ) -> RemoteResult<()> {
        let response = builder
            .send()
            .await
            .map_err(|source| RemoteError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if endpoint.is_auth_status(status) {
            Err(RemoteError::AuthRejected {
                path: path.to_string(),
                status,
            })
        } else {
            Err(RemoteError::RequestStatus {
                path: path.to_string(),
                status,
            })
        }
    }
}

impl RemoteService for SupabaseRemote {
    fn sign_in(
        &self,
        email: String,
        password: String,
    ) -> BoxFuture<'static, RemoteResult<SessionEntity>> {
        let store = self.clone();
        Box::pin(async move {
            const PATH: &str = "token?grant_type=password";
            let builder = store
                .auth_request(Method::POST, PATH)
                .json(&json!({ "email": email, "password": password }));
            let grant: TokenGrant = Self::send_decode(builder, PATH, Endpoint::Auth).await?;
            Ok(grant.into_session(OffsetDateTime::now_utc()))
        })
    }

    fn sign_up(
        &self,
        email: String,
        password: String,
    ) -> BoxFuture<'static, RemoteResult<SignUpOutcome>> {
        let store = self.clone();
        Box::pin(async move {
            const PATH: &str = "signup";
            let builder = store
                .auth_request(Method::POST, PATH)
                .json(&json!({ "email": email, "password": password }));
            let grant: SignUpGrant = Self::send_decode(builder, PATH, Endpoint::Auth).await?;
            Ok(match grant {
                SignUpGrant::Session(token) => {
                    SignUpOutcome::Session(token.into_session(OffsetDateTime::now_utc()))
                }
                SignUpGrant::Pending(user) => SignUpOutcome::ConfirmationRequired(user.id),
            })
        })
    }

    fn refresh_session(
        &self,
        refresh_token: String,
    ) -> BoxFuture<'static, RemoteResult<SessionEntity>> {
        let store = self.clone();
        Box::pin(async move {
            const PATH: &str = "token?grant_type=refresh_token";
            let builder = store
                .auth_request(Method::POST, PATH)
                .json(&json!({ "refresh_token": refresh_token }));
            let grant: TokenGrant = Self::send_decode(builder, PATH, Endpoint::Auth).await?;
            Ok(grant.into_session(OffsetDateTime::now_utc()))
        })
    }

    fn sign_out(&self, access_token: String) -> BoxFuture<'static, RemoteResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            const PATH: &str = "logout";
            let builder = store
                .auth_request(Method::POST, PATH)
                .bearer_auth(access_token);
            Self::send_unit(builder, PATH, Endpoint::Auth).await
        })
    }

    fn reset_password(&self, email: String) -> BoxFuture<'static, RemoteResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            const PATH: &str = "recover";
            let builder = store
                .auth_request(Method::POST, PATH)
                .json(&json!({ "email": email }));
            Self::send_unit(builder, PATH, Endpoint::Auth).await
        })
    }

    fn fetch_user(&self, access_token: String) -> BoxFuture<'static, RemoteResult<UserEntity>> {
        let store = self.clone();
        Box::pin(async move {
            const PATH: &str = "user";
            let builder = store
                .auth_request(Method::GET, PATH)
                .bearer_auth(access_token);
            let wire: WireUser = Self::send_decode(builder, PATH, Endpoint::Auth).await?;
            Ok(wire.into())
        })
    }

    fn update_user(
        &self,
        access_token: String,
        attributes: UserAttributes,
    ) -> BoxFuture<'static, RemoteResult<UserEntity>> {
        let store = self.clone();
        Box::pin(async move {
            const PATH: &str = "user";
            let builder = store
                .auth_request(Method::PUT, PATH)
                .bearer_auth(access_token)
                .json(&attributes);
            let wire: WireUser = Self::send_decode(builder, PATH, Endpoint::Auth).await?;
            Ok(wire.into())
        })
    }

    fn list_teams(
        &self,
        access_token: String,
        league: League,
        season: String,
    ) -> BoxFuture<'static, RemoteResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            const TABLE: &str = "teams";
            let builder = store.rest_request(Method::GET, TABLE, &access_token).query(&[
                ("select", "*".to_string()),
                ("league", format!("eq.{league}")),
                ("season", format!("eq.{season}")),
                ("order", "sort_order.asc".to_string()),
            ]);
            Self::send_decode(builder, TABLE, Endpoint::Table).await
        })
    }

    fn find_team(
        &self,
        access_token: String,
        id: Uuid,
    ) -> BoxFuture<'static, RemoteResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            const TABLE: &str = "teams";
            let builder = store.rest_request(Method::GET, TABLE, &access_token).query(&[
                ("select", "*".to_string()),
                ("id", format!("eq.{id}")),
                ("limit", "1".to_string()),
            ]);
            let mut rows: Vec<TeamEntity> =
                Self::send_decode(builder, TABLE, Endpoint::Table).await?;
            Ok(rows.pop())
        })
    }

    fn find_prediction(
        &self,
        access_token: String,
        user_id: Uuid,
        league: League,
        season: String,
    ) -> BoxFuture<'static, RemoteResult<Option<PredictionEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            const TABLE: &str = "predictions";
            let builder = store.rest_request(Method::GET, TABLE, &access_token).query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{user_id}")),
                ("league", format!("eq.{league}")),
                ("season", format!("eq.{season}")),
                ("limit", "1".to_string()),
            ]);
            let mut rows: Vec<PredictionEntity> =
                Self::send_decode(builder, TABLE, Endpoint::Table).await?;
            Ok(rows.pop())
        })
    }

    fn upsert_prediction(
        &self,
        access_token: String,
        prediction: PredictionEntity,
    ) -> BoxFuture<'static, RemoteResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            const TABLE: &str = "predictions";
            let builder = store
                .rest_request(Method::POST, TABLE, &access_token)
                .query(&[("on_conflict", "user_id,league,season")])
                .header(
                    "Prefer",
                    HeaderValue::from_static("resolution=merge-duplicates,return=minimal"),
                )
                .json(&prediction);
            Self::send_unit(builder, TABLE, Endpoint::Table).await
        })
    }

    fn health_check(&self) -> BoxFuture<'static, RemoteResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            const PATH: &str = "health";
            let builder = store.auth_request(Method::GET, PATH);
            Self::send_unit(builder, PATH, Endpoint::Auth).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_bad_request_is_a_query_error_not_a_session_failure() {
        assert!(!Endpoint::Table.is_auth_status(StatusCode::BAD_REQUEST));
        assert!(!Endpoint::Table.is_auth_status(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(Endpoint::Table.is_auth_status(StatusCode::UNAUTHORIZED));
        assert!(Endpoint::Table.is_auth_status(StatusCode::FORBIDDEN));
    }

    #[test]
    fn auth_endpoints_count_credential_statuses_as_rejections() {
        assert!(Endpoint::Auth.is_auth_status(StatusCode::BAD_REQUEST));
        assert!(Endpoint::Auth.is_auth_status(StatusCode::UNAUTHORIZED));
        assert!(Endpoint::Auth.is_auth_status(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!Endpoint::Auth.is_auth_status(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
