//! Headless core of a social posting app backed by a PocketBase-style
//! backend-as-a-service.
//!
//! ARCHITECTURE
//! ============
//! - `session`: persisted credential value and the key-value slot it lives in
//! - `backend`: the `Backend` seam and its reqwest implementation
//! - `auth`: process-wide auth state and the operations that change it
//! - `routes`: route table, navigation history and the redirect guard
//! - `posts`, `collections`, `feed`, `calendar`: screen data operations
//! - `app`: boot wiring a host shell binds its screens to
//!
//! Rendering is the host's job; every backend call and every piece of state a
//! screen needs lives here.

pub mod app;
pub mod auth;
pub mod backend;
pub mod calendar;
pub mod collections;
pub mod config;
pub mod error;
pub mod feed;
pub mod forms;
pub mod posts;
pub mod routes;
pub mod session;

pub use app::{App, AppError};
pub use auth::{AuthContext, AuthError, AuthState};
pub use backend::{Backend, PocketBaseClient};
pub use config::AppConfig;
pub use error::{ClientError, ErrorCode};
pub use routes::{Route, Router};
pub use session::{Session, UserRecord};

/// Install a fmt subscriber for `tracing` output.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing() {
    if tracing_subscriber::fmt().try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
