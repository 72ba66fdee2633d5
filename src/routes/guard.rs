//! Redirect policy over auth state and the current route.
//!
//! DESIGN
//! ======
//! [`evaluate`] is a pure function; [`RouteGuard`] adds the memory of the last
//! evaluated inputs so that repeated notifications with unchanged inputs never
//! navigate twice. [`RouteGuard::run`] drives it from the two watch channels.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::{Area, Route};
use crate::auth::AuthState;

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

/// Redirect sink. The guard only ever replaces the current entry.
pub trait Navigator: Send + Sync {
    fn replace(&self, route: Route);
}

/// Where `route` must redirect under `state`, if anywhere.
///
/// Nothing happens until the auth state is initialized.
#[must_use]
pub fn evaluate(state: &AuthState, route: &Route) -> Option<Route> {
    if !state.is_initialized() {
        return None;
    }
    match (state.is_logged_in(), route.area()) {
        (false, Area::Protected) => Some(Route::Login),
        (true, Area::Public) => Some(Route::Feed),
        (true, Area::Protected) if *route == Route::Index => Some(Route::Feed),
        _ => None,
    }
}

pub struct RouteGuard {
    navigator: Arc<dyn Navigator>,
    last: Option<(AuthState, Route)>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator, last: None }
    }

    /// Evaluate once, redirecting if needed. Returns the redirect issued.
    ///
    /// Inputs equal to the previous call are skipped. After a redirect the
    /// memo holds the redirect target, so a later return to the original
    /// route is evaluated again.
    pub fn observe(&mut self, state: &AuthState, route: &Route) -> Option<Route> {
        if self
            .last
            .as_ref()
            .is_some_and(|(s, r)| s == state && r == route)
        {
            return None;
        }
        self.last = Some((state.clone(), route.clone()));

        let target = evaluate(state, route)?;
        debug!(from = %route, to = %target, logged_in = state.is_logged_in(), "guard redirect");
        self.navigator.replace(target.clone());
        self.last = Some((state.clone(), target.clone()));
        Some(target)
    }

    /// React to auth and location changes until either sender is dropped.
    pub async fn run(mut self, mut auth: watch::Receiver<AuthState>, mut location: watch::Receiver<Route>) {
        loop {
            let state = auth.borrow_and_update().clone();
            let route = location.borrow_and_update().clone();
            self.observe(&state, &route);

            let open = tokio::select! {
                changed = auth.changed() => changed.is_ok(),
                changed = location.changed() => changed.is_ok(),
            };
            if !open {
                debug!("guard inputs closed; stopping");
                return;
            }
        }
    }
}
