use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a health payload after probing the remote data service.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.remote().health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "remote service health check failed");
            HealthResponse::degraded()
        }
    }
}
