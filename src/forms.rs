//! Input validation and alert text shared by the screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! Screens validate before calling into the auth context or a service, and
//! show these exact strings. The services re-check the same rules so a host
//! that skips validation still cannot send an untitled draft.

use crate::error::ErrorCode;

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const UNEXPECTED_ERROR: &str = "An error occurred. Please try again.";
pub const SIGNUP_FAILED_TITLE: &str = "Signup Failed";
pub const SIGNUP_FAILED_FALLBACK: &str = "Please try again";
pub const SIGN_OUT_FAILED: &str = "Failed to sign out";

/// Client-side rule violations; the display text is the alert body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Title is required")]
    TitleRequired,
    #[error("Please add a title before sharing")]
    ShareTitleRequired,
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PasswordMismatch => "E_PASSWORD_MISMATCH",
            Self::MissingCredentials => "E_MISSING_CREDENTIALS",
            Self::TitleRequired | Self::ShareTitleRequired => "E_TITLE_REQUIRED",
        }
    }
}

/// Trim the email and require both login fields.
///
/// # Errors
///
/// Returns [`ValidationError::MissingCredentials`] if either field is blank.
pub fn validate_login(email: &str, password: &str) -> Result<(String, String), ValidationError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Trimmed title, or an error when nothing is left.
///
/// # Errors
///
/// Returns [`ValidationError::TitleRequired`] for a blank title.
pub fn require_title(title: &str) -> Result<&str, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    Ok(title)
}
