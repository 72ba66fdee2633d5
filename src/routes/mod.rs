//! Screen routes, their access areas, and navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Hosts render one screen per [`Route`]. The [`router::Router`] owns the
//! navigation history and publishes the current route; the
//! [`guard::RouteGuard`] watches that location together with the auth state
//! and redirects with `replace`.
//!
//! DESIGN
//! ======
//! Every route is tagged with an explicit [`Area`] in [`Route::area`]. Access
//! never depends on how a path happens to be spelled.

pub mod guard;
pub mod router;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use std::fmt;

use crate::error::ErrorCode;

pub use guard::{Navigator, RouteGuard, evaluate};
pub use router::Router;

/// Path segment the editors use for "new record".
pub const CREATE_SEGMENT: &str = "create";

/// Editor ids that mean "no record yet" rather than a real id.
const PLACEHOLDER_IDS: [&str; 3] = ["", CREATE_SEGMENT, "[id]"];

/// Whether `id` is an unfilled editor parameter instead of a record id.
#[must_use]
pub fn is_placeholder_id(id: &str) -> bool {
    PLACEHOLDER_IDS.contains(&id)
}

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Auth screens; signed-in users are sent to the feed.
    Public,
    /// Everything else; signed-out users are sent to login.
    Protected,
}

/// Record an editor screen is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    New,
    Existing(String),
}

impl Target {
    fn from_segment(segment: &str) -> Self {
        if segment == CREATE_SEGMENT {
            Self::New
        } else {
            Self::Existing(segment.to_owned())
        }
    }

    fn segment(&self) -> &str {
        match self {
            Self::New => CREATE_SEGMENT,
            Self::Existing(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Launch screen; signed-in users land on the feed.
    Index,
    Login,
    Signup,
    /// Community feed, the default screen once signed in.
    Feed,
    MyPosts,
    PostEditor(Target),
    CollectionEditor(Target),
    CollectionDetail(String),
    Profile,
}

impl Route {
    #[must_use]
    pub fn area(&self) -> Area {
        match self {
            Self::Login | Self::Signup => Area::Public,
            Self::Index
            | Self::Feed
            | Self::MyPosts
            | Self::PostEditor(_)
            | Self::CollectionEditor(_)
            | Self::CollectionDetail(_)
            | Self::Profile => Area::Protected,
        }
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.area() == Area::Public
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Index => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Signup => "/signup".to_owned(),
            Self::Feed => "/feed".to_owned(),
            Self::MyPosts => "/my-posts".to_owned(),
            Self::PostEditor(target) => format!("/my-posts/{}", target.segment()),
            Self::CollectionEditor(target) => format!("/my-posts/collections/{}", target.segment()),
            Self::CollectionDetail(id) => format!("/my-posts/collections/detail/{id}"),
            Self::Profile => "/profile".to_owned(),
        }
    }

    /// Parse a path; query strings and fragments are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownPath`] for paths no screen handles.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let bare = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = bare.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Self::Index,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["feed"] => Self::Feed,
            ["profile"] => Self::Profile,
            ["my-posts"] => Self::MyPosts,
            ["my-posts", "collections", "detail", id] => Self::CollectionDetail((*id).to_owned()),
            ["my-posts", "collections", "detail"] | ["my-posts", "collections"] => {
                return Err(RouteError::UnknownPath(path.to_owned()));
            }
            ["my-posts", "collections", target] => Self::CollectionEditor(Target::from_segment(target)),
            ["my-posts", target] => Self::PostEditor(Target::from_segment(target)),
            _ => return Err(RouteError::UnknownPath(path.to_owned())),
        };
        Ok(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no screen for path: {0}")]
    UnknownPath(String),
}

impl ErrorCode for RouteError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownPath(_) => "E_UNKNOWN_ROUTE",
        }
    }
}
