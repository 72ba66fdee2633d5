//! Persisted credential value and the user record it carries.
//!
//! DESIGN
//! ======
//! A [`Session`] is an explicit value: token, optional user record, and an
//! expiry hint decoded from the token's JWT `exp` claim. The serialized form
//! is the `{"token": ..., "model": ...}` JSON blob the backend SDKs persist.
//! Newer SDKs write the user under `record`; both keys are read.
//! Validity is a pure function of the value and a clock reading.

pub mod store;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

pub use store::{FileStore, KeyValueStore, MemoryStore, SessionSlot, StorageError};

/// Fallback shown when a user record has no usable name or email.
pub const ANONYMOUS_DISPLAY_NAME: &str = "User";

// =============================================================================
// USER RECORD
// =============================================================================

/// An account record owned by the backend. Read-only on this side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Backend record id.
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Every other column the backend returned, untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UserRecord {
    /// Name for headers and profile cards.
    ///
    /// Prefers the `Display_Name` column, then `email`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let custom = self
            .fields
            .get("Display_Name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(name) = custom {
            return name;
        }
        if !self.email.is_empty() {
            return &self.email;
        }
        ANONYMOUS_DISPLAY_NAME
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Credential proving a prior successful sign-in.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<UserRecord>,
    /// Expiry decoded from the token; `None` when the token is not a JWT.
    pub expires_hint: Option<OffsetDateTime>,
}

#[derive(Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    #[serde(default)]
    model: Option<UserRecord>,
    #[serde(default, skip_serializing)]
    record: Option<UserRecord>,
}

impl Session {
    /// Build a session, deriving the expiry hint from the token.
    #[must_use]
    pub fn new(token: impl Into<String>, user: Option<UserRecord>) -> Self {
        let token = token.into();
        let expires_hint = token_expiry(&token);
        Self { token, user, expires_hint }
    }

    /// Whether the session still authenticates requests at `now`.
    ///
    /// Tokens without a decodable `exp` claim are treated as expired.
    #[must_use]
    pub fn is_valid(&self, now: OffsetDateTime) -> bool {
        !self.token.is_empty() && self.expires_hint.is_some_and(|exp| exp > now)
    }

    /// Serialize into the opaque string kept in the session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the user record cannot be serialized.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&PersistedSession { token: self.token.clone(), model: self.user.clone(), record: None })
    }

    /// Parse a stored blob. Blank input or a blank token yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not the expected JSON shape.
    pub fn decode(raw: &str) -> Result<Option<Self>, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let persisted: PersistedSession = serde_json::from_str(raw)?;
        if persisted.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::new(persisted.token, persisted.model.or(persisted.record))))
    }
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Decode the `exp` claim of a JWT without verifying its signature.
fn token_expiry(token: &str) -> Option<OffsetDateTime> {
    let payload = token.split('.').nth(1)?;
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) else {
        return None;
    };
    let Ok(claims) = serde_json::from_slice::<Claims>(&bytes) else {
        return None;
    };
    let Ok(exp) = OffsetDateTime::from_unix_timestamp(claims.exp?) else {
        return None;
    };
    Some(exp)
}

// =============================================================================
// TEST HELPERS
// =============================================================================
