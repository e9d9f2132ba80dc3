use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod auth;
pub mod health;
pub mod home;
pub mod phase;
pub mod prediction;
pub mod profile;
pub mod validation;

fn format_timestamp(moment: OffsetDateTime) -> String {
    moment
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
