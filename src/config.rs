//! Application-level configuration, loaded from the environment at startup.

use std::{env, path::PathBuf};

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::info;

use crate::dao::remote::{RemoteConfig, RemoteConfigError};

/// Season predictions apply to when none is configured.
const DEFAULT_SEASON: &str = "2025/2026";
/// Deadline used when `PREDICTION_DEADLINE` is not set: first Championship
/// kick-off of the 2025/26 season.
const DEFAULT_DEADLINE: &str = "2025-08-08T19:00:00Z";
/// Default location of the persisted session file.
const DEFAULT_SESSION_FILE: &str = ".session.json";

/// Errors raised while assembling the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The remote service settings are incomplete.
    #[error(transparent)]
    Remote(#[from] RemoteConfigError),
    /// The configured deadline is not a valid RFC 3339 timestamp.
    #[error("invalid PREDICTION_DEADLINE `{value}`")]
    InvalidDeadline {
        value: String,
        #[source]
        source: time::error::Parse,
    },
}

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// How to reach the remote data service.
    pub remote: RemoteConfig,
    /// Season every query and save is scoped to.
    pub season: String,
    /// Cutoff after which prediction saves are permanently rejected.
    pub deadline: OffsetDateTime,
    /// Where the session token pair is persisted.
    pub session_file: PathBuf,
}

impl AppConfig {
    /// Load the configuration from environment variables.
    ///
    /// The remote URL and API key are required; season, deadline and session
    /// path fall back to built-in defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let remote = RemoteConfig::from_env()?;

        let season = env::var("SEASON").unwrap_or_else(|_| DEFAULT_SEASON.into());

        let deadline_raw =
            env::var("PREDICTION_DEADLINE").unwrap_or_else(|_| DEFAULT_DEADLINE.into());
        let deadline = parse_deadline(&deadline_raw)?;

        let session_file = env::var_os("SESSION_FILE")
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        info!(%season, deadline = %deadline_raw, "loaded configuration");

        Ok(Self {
            remote,
            season,
            deadline,
            session_file,
        })
    }
}

fn parse_deadline(value: &str) -> Result<OffsetDateTime, ConfigError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|source| ConfigError::InvalidDeadline {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn default_deadline_parses() {
        assert!(parse_deadline(DEFAULT_DEADLINE).is_ok());
    }

    #[test]
    fn explicit_deadline_parses_with_offset() {
        let parsed = parse_deadline("2026-08-07T18:00:00+01:00").unwrap();
        assert_eq!(parsed, datetime!(2026-08-07 17:00 UTC));
    }

    #[test]
    fn garbage_deadline_is_rejected() {
        assert!(matches!(
            parse_deadline("next friday"),
            Err(ConfigError::InvalidDeadline { .. })
        ));
    }
}
