//! Authentication state and the operations that change it.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`AuthContext`] is the process-wide source of truth for who is logged in
//! and the only component that performs credentialed side effects. Route
//! guards and screens read [`AuthState`] snapshots; none of them write it.
//!
//! ERROR HANDLING
//! ==============
//! Every operation returns a `Result`. Backend and storage failures are
//! logged and converted to [`AuthError`] at this boundary so screens can show
//! a message. Nothing here retries.

pub mod context;
pub mod state;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use serde_json::Value;

pub use context::AuthContext;
pub use state::{AuthState, derive_auth_state};

use crate::error::{ClientError, ErrorCode};
use crate::forms::{LOGIN_FAILED, SIGN_OUT_FAILED, SIGNUP_FAILED_FALLBACK, SIGNUP_FAILED_TITLE, UNEXPECTED_ERROR, ValidationError};
use crate::session::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No backend client has been attached yet; no request was made.
    #[error("backend client not initialized")]
    NotInitialized,

    #[error(transparent)]
    Backend(#[from] ClientError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A newer sign-in or a sign-out started while this attempt was in flight.
    #[error("sign-in superseded by a newer attempt")]
    Superseded,

    /// The backend accepted the credentials but returned an unusable token.
    #[error("backend returned an invalid session")]
    InvalidSession,
}

impl AuthError {
    /// Text for a login alert.
    ///
    /// Credential and transport failures share one message; a missing
    /// backend is an unexpected error.
    #[must_use]
    pub fn login_message(&self) -> String {
        match self {
            Self::Validation(v) => v.to_string(),
            Self::Backend(_) | Self::InvalidSession => LOGIN_FAILED.to_owned(),
            Self::NotInitialized | Self::Storage(_) | Self::Superseded => UNEXPECTED_ERROR.to_owned(),
        }
    }

    /// Text for a signup alert: validation text, else the backend's message.
    #[must_use]
    pub fn signup_message(&self) -> String {
        match self {
            Self::Validation(v) => v.to_string(),
            Self::Backend(ClientError::Response { message, .. }) if !message.is_empty() => message.clone(),
            _ => SIGNUP_FAILED_FALLBACK.to_owned(),
        }
    }

    /// Title and body for the signup failure alert.
    #[must_use]
    pub fn signup_alert(&self) -> (&'static str, String) {
        (SIGNUP_FAILED_TITLE, self.signup_message())
    }
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotInitialized => "E_NOT_INITIALIZED",
            Self::Backend(e) => e.error_code(),
            Self::Validation(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Superseded => "E_SUPERSEDED",
            Self::InvalidSession => "E_INVALID_SESSION",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Backend(e) => e.retryable(),
            _ => false,
        }
    }
}

/// Outcome of an optimistic sign-out.
///
/// Local state is always reset; `warning` carries a failure to clear the
/// persisted slot, which means the session may come back on next launch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignOut {
    pub warning: Option<StorageError>,
}

impl SignOut {
    /// Alert to show, if the persisted session could not be cleared.
    #[must_use]
    pub fn alert(&self) -> Option<&'static str> {
        self.warning.as_ref().map(|_| SIGN_OUT_FAILED)
    }
}

/// Signup form contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub name: Option<String>,
}

impl NewAccount {
    /// Same checks, in the same order, as the signup screen.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PasswordMismatch`] or
    /// [`ValidationError::MissingCredentials`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.password != self.password_confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(())
    }

    fn to_body(&self) -> Value {
        serde_json::json!({
            "email": self.email.trim(),
            "password": self.password,
            "passwordConfirm": self.password_confirm,
            "name": self.name.as_deref().unwrap_or(""),
        })
    }
}
