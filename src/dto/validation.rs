//! Validation helpers for DTOs.

use validator::ValidationError;

/// Minimum password length accepted at signup and password change.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validates that a password is long enough and contains no whitespace.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        let mut err = ValidationError::new("password_length");
        err.message = Some(
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters").into(),
        );
        return Err(err);
    }

    if password.chars().any(char::is_whitespace) {
        let mut err = ValidationError::new("password_whitespace");
        err.message = Some("Password must not contain whitespace".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a display name is non-blank and reasonably short.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("display_name_blank");
        err.message = Some("Display name must not be blank".into());
        return Err(err);
    }

    if trimmed.chars().count() > 40 {
        let mut err = ValidationError::new("display_name_length");
        err.message = Some("Display name must be at most 40 characters".into());
        return Err(err);
    }

    Ok(())
}
