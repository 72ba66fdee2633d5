//! Immutable auth-state snapshots.
//!
//! Fields are private so the invariants hold by construction: a user is
//! present exactly when logged in, and a snapshot built from a session read is
//! always initialized.

use time::OffsetDateTime;

use crate::session::{Session, UserRecord};

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

/// Who is logged in, as last observed by the auth context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    is_initialized: bool,
    user: Option<UserRecord>,
}

impl AuthState {
    /// State before the persisted session has been read.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Initialized, logged-out state.
    #[must_use]
    pub fn logged_out() -> Self {
        Self { is_initialized: true, user: None }
    }

    /// Initialized, logged-in state for `user`.
    #[must_use]
    pub fn logged_in(user: UserRecord) -> Self {
        Self { is_initialized: true, user: Some(user) }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }
}

/// Derive the auth state a session implies at `now`.
///
/// A session whose token is still valid but which carries no user record is
/// treated as logged out: nothing downstream can act without a user id.
#[must_use]
pub fn derive_auth_state(session: Option<&Session>, now: OffsetDateTime) -> AuthState {
    match session {
        Some(session) if session.is_valid(now) => match &session.user {
            Some(user) => AuthState::logged_in(user.clone()),
            None => AuthState::logged_out(),
        },
        _ => AuthState::logged_out(),
    }
}
