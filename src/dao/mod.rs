/// Shared entity definitions for teams, predictions, sessions and users.
pub mod models;
/// Client for the remote auth and table API.
pub mod remote;
/// Local persistence of the session token pair.
pub mod session;
