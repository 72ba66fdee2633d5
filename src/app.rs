//! Boot wiring for a host shell.
//!
//! SYSTEM CONTEXT
//! ==============
//! A host creates one [`App`] per launch and binds its screens to the
//! accessors. Boot order: session store, auth context, router, guard task,
//! backend client, then `AuthContext::initialize`. The guard is running
//! before the first snapshot is published, so the very first initialized
//! state already triggers the landing redirect.
//!
//! ERROR HANDLING
//! ==============
//! Only configuration and HTTP client construction can fail boot. A broken
//! session store is not fatal; auth logs it and starts signed out.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::auth::{AuthContext, AuthState};
use crate::backend::{Backend, PocketBaseClient};
use crate::collections::CollectionService;
use crate::config::{AppConfig, ConfigError};
use crate::error::{ClientError, ErrorCode};
use crate::posts::PostService;
use crate::routes::{Route, RouteGuard, Router};
use crate::session::{FileStore, KeyValueStore, MemoryStore, SessionSlot};

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ErrorCode for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Client(e) => e.error_code(),
        }
    }
}

pub struct App {
    config: AppConfig,
    backend: Arc<dyn Backend>,
    auth: Arc<AuthContext>,
    router: Arc<Router>,
    posts: PostService,
    collections: CollectionService,
    guard: JoinHandle<()>,
}

/// Store backing the session slot for `config`.
fn session_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    match &config.session_file {
        Some(path) => Arc::new(FileStore::new(path.clone())),
        None => Arc::new(MemoryStore::new()),
    }
}

impl App {
    /// Read `.env` and the environment, then boot against the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] for bad configuration or HTTP client build failure.
    pub async fn from_env() -> Result<Self, AppError> {
        Self::boot(AppConfig::load()?).await
    }

    /// Boot against a [`PocketBaseClient`] for `config.backend`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Client`] if the HTTP client cannot be built.
    pub async fn boot(config: AppConfig) -> Result<Self, AppError> {
        let backend: Arc<dyn Backend> = Arc::new(PocketBaseClient::new(&config.backend)?);
        Ok(Self::boot_with(config, backend).await)
    }

    /// Boot against any backend implementation.
    pub async fn boot_with(config: AppConfig, backend: Arc<dyn Backend>) -> Self {
        let slot = SessionSlot::new(session_store(&config), config.session_key.clone());
        let auth = Arc::new(AuthContext::new(slot));
        let router = Arc::new(Router::new(Route::Index));
        let guard = tokio::spawn(RouteGuard::new(router.clone()).run(auth.subscribe(), router.subscribe()));

        let state = auth.initialize(Arc::clone(&backend)).await;
        info!(
            base_url = backend.base_url(),
            logged_in = state.is_logged_in(),
            persisted = config.session_file.is_some(),
            "postboard booted"
        );

        let posts = PostService::new(Arc::clone(&backend))
            .with_page_sizes(config.feed_page_size, config.my_posts_page_size);
        let collections = CollectionService::new(Arc::clone(&backend)).with_page_size(config.my_posts_page_size);
        Self { config, backend, auth, router, posts, collections, guard }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<AuthContext> {
        &self.auth
    }

    #[must_use]
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    #[must_use]
    pub fn posts(&self) -> &PostService {
        &self.posts
    }

    #[must_use]
    pub fn collections(&self) -> &CollectionService {
        &self.collections
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.auth.snapshot()
    }

    /// Stop the guard task. Navigation still works; redirects stop.
    pub fn shutdown(&self) {
        self.guard.abort();
        info!("postboard shut down");
    }
}
