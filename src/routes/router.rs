//! Headless navigation history.
//!
//! The history stack lives behind a mutex; the top entry is mirrored into a
//! watch channel so the guard and the host see every move. Updates to both
//! happen under the same lock, so the channel never runs ahead of the stack.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use super::{Navigator, Route, RouteError};

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;

pub struct Router {
    history: Mutex<Vec<Route>>,
    location: watch::Sender<Route>,
}

impl Router {
    #[must_use]
    pub fn new(initial: Route) -> Self {
        let (location, _) = watch::channel(initial.clone());
        Self { history: Mutex::new(vec![initial]), location }
    }

    fn history(&self) -> MutexGuard<'_, Vec<Route>> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn current(&self) -> Route {
        self.location.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.location.subscribe()
    }

    /// Number of entries on the stack, including the current one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.history().len()
    }

    pub fn push(&self, route: Route) {
        let mut history = self.history();
        debug!(to = %route, "navigate push");
        history.push(route.clone());
        self.location.send_replace(route);
    }

    /// Parse `path` and push it.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownPath`] and leaves history untouched.
    pub fn push_path(&self, path: &str) -> Result<(), RouteError> {
        self.push(Route::parse(path)?);
        Ok(())
    }

    /// Swap the current entry for `route`.
    pub fn replace(&self, route: Route) {
        let mut history = self.history();
        debug!(to = %route, "navigate replace");
        match history.last_mut() {
            Some(top) => *top = route.clone(),
            None => history.push(route.clone()),
        }
        self.location.send_replace(route);
    }

    /// Pop the current entry. Returns `false` at the root, where nothing moves.
    pub fn back(&self) -> bool {
        let mut history = self.history();
        if history.len() <= 1 {
            return false;
        }
        history.pop();
        let Some(top) = history.last().cloned() else {
            return false;
        };
        debug!(to = %top, "navigate back");
        self.location.send_replace(top);
        true
    }
}

impl Navigator for Router {
    fn replace(&self, route: Route) {
        Router::replace(self, route);
    }
}
