/// Session lifecycle and profile operations.
pub mod auth_service;
/// Deadline countdown ticker and its SSE stream.
pub mod countdown;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Reorder-and-persist workflow for league predictions.
pub mod prediction_service;

#[cfg(test)]
pub(crate) mod fake_remote;
