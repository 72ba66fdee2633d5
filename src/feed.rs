//! Feed layouts and the per-post display projection.
//!
//! The feed and My Posts render the same [`Post`] list in one of three
//! layouts. A post's own `View_Type`, when it names a layout, overrides the
//! screen's choice on My Posts.

use time::Date;

use crate::backend::{file_url, thumb_url};
use crate::calendar::date_of;
use crate::posts::{POST_COLLECTION, Post};
use crate::routes::{Route, Target};

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;

/// Thumbnail size requested for the photo grid.
pub const PHOTO_THUMB: (u32, u32) = (300, 300);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewLayout {
    /// Full-width poster with the title overlaid.
    Banner,
    /// Two-column poster grid.
    Photo,
    /// Text-first card with an optional poster.
    #[default]
    Card,
}

impl ViewLayout {
    /// Next layout for the toggle button: Banner, Photo, Card, then around.
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Banner => Self::Photo,
            Self::Photo => Self::Card,
            Self::Card => Self::Banner,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Banner => "Banner View",
            Self::Photo => "Photo Cards",
            Self::Card => "Post Cards",
        }
    }

    /// Layout for a stored `View_Type` value; unknown names give `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "banner" => Some(Self::Banner),
            "photo" => Some(Self::Photo),
            "card" => Some(Self::Card),
            _ => None,
        }
    }
}

/// Everything a feed row renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub text: String,
    pub post_type: String,
    pub rating: String,
    /// Author line; `None` when the creator was not expanded.
    pub creator_name: Option<String>,
    pub poster_url: Option<String>,
    /// Square thumbnail for the photo grid.
    pub thumb_url: Option<String>,
    pub date: Option<Date>,
    pub layout: ViewLayout,
}

impl FeedItem {
    /// Project `post` for display. `layout` is the screen's current choice.
    #[must_use]
    pub fn from_post(post: &Post, base_url: &str, layout: ViewLayout) -> Self {
        let layout = post
            .view_type
            .as_deref()
            .and_then(ViewLayout::from_name)
            .unwrap_or(layout);
        let poster = post.poster.as_deref().unwrap_or_default();
        let (width, height) = PHOTO_THUMB;
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            text: post.text.clone(),
            post_type: post.post_type.clone(),
            rating: post.rating.clone(),
            creator_name: post.creator.as_ref().map(|c| c.name.clone()),
            poster_url: file_url(base_url, POST_COLLECTION, &post.id, poster),
            thumb_url: thumb_url(base_url, POST_COLLECTION, &post.id, poster, width, height),
            date: date_of(&post.created),
            layout,
        }
    }

    /// Screen a tap on the row opens.
    #[must_use]
    pub fn route(&self) -> Route {
        Route::PostEditor(Target::Existing(self.id.clone()))
    }
}

/// Project a whole page at once.
#[must_use]
pub fn project(posts: &[Post], base_url: &str, layout: ViewLayout) -> Vec<FeedItem> {
    posts
        .iter()
        .map(|p| FeedItem::from_post(p, base_url, layout))
        .collect()
}
