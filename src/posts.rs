//! Post records and the screen operations on them.
//!
//! SYSTEM CONTEXT
//! ==============
//! The feed, My Posts and the post editor all go through [`PostService`].
//! Records are owned by the backend; this module decodes them into [`Post`],
//! builds write bodies from a [`PostDraft`], and maps failures to the alert
//! text each screen shows.
//!
//! ERROR HANDLING
//! ==============
//! Every backend failure is logged with its operation and returned as a
//! [`PostError`]; [`PostError::user_message`] gives the screen text. Nothing
//! retries.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::backend::query::{contains, sort_desc};
use crate::backend::{Backend, ListPage, ListQuery, decode_record, one_or_many};
use crate::config::{DEFAULT_FEED_PAGE_SIZE, DEFAULT_MY_POSTS_PAGE_SIZE};
use crate::error::{ClientError, ErrorCode};
use crate::forms::{ValidationError, require_title};
use crate::routes::{Target, is_placeholder_id};
use crate::session::UserRecord;

#[cfg(test)]
#[path = "posts_test.rs"]
mod tests;

pub const POST_COLLECTION: &str = "Post";
pub const DEFAULT_RATING: &str = "0";
pub const UNKNOWN_CREATOR: &str = "Unknown User";

// =============================================================================
// RECORDS
// =============================================================================

/// Author summary from the expanded `Creator` relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "PostWire")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub text: String,
    pub post_type: String,
    /// First element of the backend's `Rating` list.
    pub rating: String,
    pub creator_ids: Vec<String>,
    /// Present only when the query expanded `Creator`.
    pub creator: Option<Creator>,
    pub poster: Option<String>,
    pub media: Vec<String>,
    pub view_type: Option<String>,
    pub created: String,
}

impl Post {
    #[must_use]
    pub fn creator_name(&self) -> &str {
        self.creator
            .as_ref()
            .map_or(UNKNOWN_CREATOR, |c| c.name.as_str())
    }
}

#[derive(Deserialize)]
struct PostWire {
    id: String,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Text", default)]
    text: Option<String>,
    #[serde(rename = "Post_Type", default)]
    post_type: Option<String>,
    #[serde(rename = "Rating", default, deserialize_with = "one_or_many")]
    rating: Vec<Value>,
    #[serde(rename = "Creator", default, deserialize_with = "one_or_many")]
    creator: Vec<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "Media", default, deserialize_with = "one_or_many")]
    media: Vec<String>,
    #[serde(rename = "View_Type", default)]
    view_type: Option<String>,
    #[serde(default)]
    created: String,
    #[serde(default)]
    expand: PostExpand,
}

#[derive(Default, Deserialize)]
struct PostExpand {
    #[serde(rename = "Creator", default, deserialize_with = "one_or_many")]
    creator: Vec<UserRecord>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<PostWire> for Post {
    fn from(wire: PostWire) -> Self {
        let rating = wire
            .rating
            .first()
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_RATING.to_owned());
        let creator = wire.expand.creator.into_iter().next().map(|user| {
            let name = if user.name.is_empty() { UNKNOWN_CREATOR.to_owned() } else { user.name };
            Creator { id: user.id, name }
        });
        Self {
            id: wire.id,
            title: wire.title.unwrap_or_default(),
            text: wire.text.unwrap_or_default(),
            post_type: wire.post_type.unwrap_or_default(),
            rating,
            creator_ids: wire.creator.into_iter().filter(|s| !s.is_empty()).collect(),
            creator,
            poster: non_empty(wire.poster),
            media: wire.media.into_iter().filter(|s| !s.is_empty()).collect(),
            view_type: non_empty(wire.view_type),
            created: wire.created,
        }
    }
}

// =============================================================================
// DRAFT
// =============================================================================

/// Editor form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub post_type: String,
    pub rating: String,
}

impl Default for PostDraft {
    fn default() -> Self {
        Self { title: String::new(), text: String::new(), post_type: String::new(), rating: DEFAULT_RATING.to_owned() }
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            post_type: post.post_type.clone(),
            rating: post.rating.clone(),
        }
    }
}

impl PostDraft {
    fn to_body(&self, user_id: &str) -> Value {
        json!({
            "Title": self.title,
            "Text": self.text,
            "Post_Type": self.post_type,
            "Rating": [self.rating],
            "Creator": [user_id],
        })
    }
}

/// Text handed to the platform share sheet.
///
/// # Errors
///
/// Returns [`ValidationError::ShareTitleRequired`] for an empty title.
pub fn share_message(title: &str, text: &str) -> Result<String, ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::ShareTitleRequired);
    }
    if text.is_empty() {
        Ok(format!("Check out my post: {title}"))
    } else {
        Ok(format!("Check out my post: {title}\n\n{text}"))
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostError {
    /// The editor was opened without a real record id.
    #[error("not a post id: {0:?}")]
    PlaceholderId(String),

    #[error("post not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("saving a post requires a signed-in user")]
    NotSignedIn,

    #[error("post list failed: {0}")]
    List(#[source] ClientError),

    #[error("post load failed: {0}")]
    Load(#[source] ClientError),

    #[error("post save failed: {0}")]
    Save(#[source] ClientError),

    #[error("post delete failed: {0}")]
    Delete(#[source] ClientError),
}

impl PostError {
    /// Alert text for the screen that triggered the failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::PlaceholderId(_) | Self::Load(_) => "Failed to load post details".to_owned(),
            Self::NotFound => "Post not found. It may have been deleted.".to_owned(),
            Self::Validation(v) => v.to_string(),
            Self::NotSignedIn => "You must be logged in to save posts".to_owned(),
            Self::List(_) => "Failed to load posts".to_owned(),
            Self::Save(_) => "Failed to save post".to_owned(),
            Self::Delete(_) => "Failed to delete post. Please try again.".to_owned(),
        }
    }
}

impl ErrorCode for PostError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PlaceholderId(_) => "E_PLACEHOLDER_ID",
            Self::NotFound => "E_NOT_FOUND",
            Self::Validation(e) => e.error_code(),
            Self::NotSignedIn => "E_NOT_SIGNED_IN",
            Self::List(e) | Self::Load(e) | Self::Save(e) | Self::Delete(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::List(e) | Self::Load(e) | Self::Save(e) | Self::Delete(e) => e.retryable(),
            _ => false,
        }
    }
}

// =============================================================================
// SERVICE
// =============================================================================

pub struct PostService {
    backend: Arc<dyn Backend>,
    feed_page_size: u32,
    my_posts_page_size: u32,
}

impl PostService {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend, feed_page_size: DEFAULT_FEED_PAGE_SIZE, my_posts_page_size: DEFAULT_MY_POSTS_PAGE_SIZE }
    }

    #[must_use]
    pub fn with_page_sizes(mut self, feed: u32, my_posts: u32) -> Self {
        self.feed_page_size = feed;
        self.my_posts_page_size = my_posts;
        self
    }

    /// Base URL for building poster and media links.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.backend.base_url()
    }

    /// Community feed page, newest first, with authors expanded.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::List`] if the backend call or decoding fails.
    pub async fn feed(&self, page: u32) -> Result<ListPage<Post>, PostError> {
        let query = ListQuery::page(page, self.feed_page_size)
            .sort(sort_desc("created"))
            .expand("Creator");
        self.list(&query).await
    }

    /// Up to one page of the user's own posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::List`] if the backend call or decoding fails.
    pub async fn by_creator(&self, user_id: &str) -> Result<Vec<Post>, PostError> {
        let query = ListQuery::page(1, self.my_posts_page_size)
            .filter(contains("Creator", user_id))
            .sort(sort_desc("created"))
            .expand("Tags");
        Ok(self.list(&query).await?.items)
    }

    async fn list(&self, query: &ListQuery) -> Result<ListPage<Post>, PostError> {
        debug!(page = query.page, per_page = query.per_page, filter = ?query.filter, "fetching posts");
        let page = self
            .backend
            .get_list(POST_COLLECTION, query)
            .await
            .and_then(|page| page.decode::<Post>())
            .map_err(|e| {
                warn!(error = %e, "post list failed");
                PostError::List(e)
            })?;
        debug!(count = page.items.len(), total = page.total_items, "posts fetched");
        Ok(page)
    }

    /// Load one post for the editor.
    ///
    /// # Errors
    ///
    /// - [`PostError::PlaceholderId`] for `""`, `create` or `[id]` (no request)
    /// - [`PostError::NotFound`] when the record is gone
    /// - [`PostError::Load`] for any other failure
    pub async fn load(&self, id: &str) -> Result<Post, PostError> {
        if is_placeholder_id(id) {
            return Err(PostError::PlaceholderId(id.to_owned()));
        }
        let record = match self.backend.get_one(POST_COLLECTION, id, None).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                warn!(post_id = id, "post not found");
                return Err(PostError::NotFound);
            }
            Err(e) => {
                warn!(error = %e, post_id = id, "post load failed");
                return Err(PostError::Load(e));
            }
        };
        decode_record(record).map_err(PostError::Load)
    }

    /// Create or update a post owned by `user`.
    ///
    /// The title is checked first, then the user, before any request.
    ///
    /// # Errors
    ///
    /// - [`PostError::Validation`] for a blank title
    /// - [`PostError::NotSignedIn`] without a user
    /// - [`PostError::Save`] if the backend rejects the write
    pub async fn save(&self, target: &Target, draft: &PostDraft, user: Option<&UserRecord>) -> Result<Post, PostError> {
        require_title(&draft.title)?;
        let user = user.ok_or(PostError::NotSignedIn)?;
        let body = draft.to_body(&user.id);

        let result = match target {
            Target::New => self.backend.create(POST_COLLECTION, &body).await,
            Target::Existing(id) => self.backend.update(POST_COLLECTION, id, &body).await,
        };
        let record = result.map_err(|e| {
            warn!(error = %e, target = ?target, "post save failed");
            PostError::Save(e)
        })?;
        let post: Post = decode_record(record).map_err(PostError::Save)?;
        info!(post_id = %post.id, created = matches!(target, Target::New), "post saved");
        Ok(post)
    }

    /// # Errors
    ///
    /// Returns [`PostError::Delete`] if the backend call fails.
    pub async fn delete(&self, id: &str) -> Result<(), PostError> {
        self.backend
            .delete(POST_COLLECTION, id)
            .await
            .map_err(|e| {
                warn!(error = %e, post_id = id, "post delete failed");
                PostError::Delete(e)
            })?;
        info!(post_id = id, "post deleted");
        Ok(())
    }
}
