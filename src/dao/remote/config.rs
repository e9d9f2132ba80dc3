use thiserror::Error;

/// Runtime configuration describing how to reach the remote data service.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the service, without a trailing slash.
    pub base_url: String,
    /// Anonymous API key sent with every request.
    pub anon_key: String,
}

/// Error raised when the remote configuration cannot be assembled.
#[derive(Debug, Error)]
pub enum RemoteConfigError {
    /// Required environment variable is missing.
    #[error("missing remote service environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
}

impl RemoteConfig {
    /// Construct a configuration from an explicit base URL and API key.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }

    /// Build a configuration by reading the expected environment variables.
    ///
    /// Both variables are required; a missing one is a fatal startup condition.
    pub fn from_env() -> Result<Self, RemoteConfigError> {
        let base_url = std::env::var("SUPABASE_URL")
            .map_err(|_| RemoteConfigError::MissingEnvVar { var: "SUPABASE_URL" })?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY").map_err(|_| {
            RemoteConfigError::MissingEnvVar {
                var: "SUPABASE_ANON_KEY",
            }
        })?;

        Ok(Self::new(base_url, anon_key))
    }
}
