//! User-curated groups of posts.
//!
//! SYSTEM CONTEXT
//! ==============
//! The Collections tab, the collection editor and the collection detail
//! screen use [`CollectionService`]. The editor's candidate list is the
//! user's own posts from `PostService::by_creator`; the selection lives in a
//! [`CollectionDraft`] until save.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::backend::query::{contains, sort_desc};
use crate::backend::{Backend, ListQuery, decode_record, one_or_many};
use crate::config::DEFAULT_MY_POSTS_PAGE_SIZE;
use crate::error::{ClientError, ErrorCode};
use crate::forms::{ValidationError, require_title};
use crate::posts::Post;
use crate::routes::{Target, is_placeholder_id};
use crate::session::UserRecord;

#[cfg(test)]
#[path = "collections_test.rs"]
mod tests;

pub const COLLECTION_COLLECTION: &str = "Post_Collection";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "CollectionWire")]
pub struct Collection {
    pub id: String,
    pub title: String,
    pub text: String,
    pub creator_ids: Vec<String>,
    /// Member post ids in the order the backend stores them.
    pub children_posts: Vec<String>,
    /// Member posts, present only when the query expanded `children_posts`.
    pub posts: Vec<Post>,
    pub created: String,
}

#[derive(Deserialize)]
struct CollectionWire {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "Title", default)]
    title_upper: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(rename = "Text", default)]
    text_upper: Option<String>,
    #[serde(rename = "Creator", default, deserialize_with = "one_or_many")]
    creator: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    children_posts: Vec<String>,
    #[serde(default)]
    created: String,
    #[serde(default)]
    expand: CollectionExpand,
}

#[derive(Default, Deserialize)]
struct CollectionExpand {
    #[serde(default, deserialize_with = "one_or_many")]
    children_posts: Vec<Post>,
}

/// `preferred` unless it is missing or empty, then `fallback`.
fn first_filled(preferred: Option<String>, fallback: Option<String>) -> String {
    preferred.filter(|s| !s.is_empty()).or(fallback).unwrap_or_default()
}

impl From<CollectionWire> for Collection {
    fn from(wire: CollectionWire) -> Self {
        Self {
            id: wire.id,
            title: first_filled(wire.title_upper, wire.title),
            text: first_filled(wire.text_upper, wire.text),
            creator_ids: wire.creator.into_iter().filter(|s| !s.is_empty()).collect(),
            children_posts: wire.children_posts.into_iter().filter(|s| !s.is_empty()).collect(),
            posts: wire.expand.children_posts,
            created: wire.created,
        }
    }
}

// =============================================================================
// DRAFT
// =============================================================================

/// Collection editor form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionDraft {
    pub title: String,
    pub text: String,
    selected: Vec<String>,
}

impl From<&Collection> for CollectionDraft {
    /// Selection starts from the expanded members, else the raw id list.
    fn from(collection: &Collection) -> Self {
        let selected = if collection.posts.is_empty() {
            collection.children_posts.clone()
        } else {
            collection.posts.iter().map(|p| p.id.clone()).collect()
        };
        Self { title: collection.title.clone(), text: collection.text.clone(), selected }
    }
}

impl CollectionDraft {
    /// Add `post_id` if absent, remove it if present. Returns whether it is
    /// now selected.
    pub fn toggle(&mut self, post_id: &str) -> bool {
        if let Some(pos) = self.selected.iter().position(|id| id == post_id) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(post_id.to_owned());
            true
        }
    }

    #[must_use]
    pub fn is_selected(&self, post_id: &str) -> bool {
        self.selected.iter().any(|id| id == post_id)
    }

    /// Selected post ids in selection order.
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    fn to_body(&self, user_id: &str) -> Value {
        json!({
            "title": self.title,
            "text": self.text,
            "Creator": [user_id],
            "children_posts": self.selected,
        })
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("not a collection id: {0:?}")]
    PlaceholderId(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("saving a collection requires a signed-in user")]
    NotSignedIn,

    #[error("collection list failed: {0}")]
    List(#[source] ClientError),

    #[error("collection load failed: {0}")]
    Load(#[source] ClientError),

    #[error("collection save failed: {0}")]
    Save(#[source] ClientError),

    #[error("collection delete failed: {0}")]
    Delete(#[source] ClientError),
}

impl CollectionError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::PlaceholderId(_) | Self::Load(_) => "Failed to load collection details".to_owned(),
            Self::Validation(v) => v.to_string(),
            Self::NotSignedIn => "You must be logged in to save collections".to_owned(),
            Self::List(_) => "Failed to load collections".to_owned(),
            Self::Save(_) => "Failed to save collection".to_owned(),
            Self::Delete(_) => "Failed to delete collection. Please try again.".to_owned(),
        }
    }
}

impl ErrorCode for CollectionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PlaceholderId(_) => "E_PLACEHOLDER_ID",
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

pub struct CollectionService {
    backend: Arc<dyn Backend>,
    page_size: u32,
}

impl CollectionService {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend, page_size: DEFAULT_MY_POSTS_PAGE_SIZE }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// The user's collections, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::List`] if the backend call or decoding fails.
    pub async fn list_mine(&self, user_id: &str) -> Result<Vec<Collection>, CollectionError> {
        let query = ListQuery::page(1, self.page_size)
            .filter(contains("Creator", user_id))
            .sort(sort_desc("created"));
        debug!(user_id, "fetching collections");
        let page = self
            .backend
            .get_list(COLLECTION_COLLECTION, &query)
            .await
            .and_then(|page| page.decode::<Collection>())
            .map_err(|e| {
                warn!(error = %e, "collection list failed");
                CollectionError::List(e)
            })?;
        Ok(page.items)
    }

    /// One collection with its member posts expanded.
    ///
    /// # Errors
    ///
    /// - [`CollectionError::PlaceholderId`] for editor placeholders (no request)
    /// - [`CollectionError::Load`] for backend or decoding failures
    pub async fn load(&self, id: &str) -> Result<Collection, CollectionError> {
        if is_placeholder_id(id) {
            return Err(CollectionError::PlaceholderId(id.to_owned()));
        }
        self.backend
            .get_one(COLLECTION_COLLECTION, id, Some("children_posts"))
            .await
            .and_then(decode_record)
            .map_err(|e| {
                warn!(error = %e, collection_id = id, "collection load failed");
                CollectionError::Load(e)
            })
    }

    /// Create or update a collection owned by `user`.
    ///
    /// # Errors
    ///
    /// - [`CollectionError::Validation`] for a blank title
    /// - [`CollectionError::NotSignedIn`] without a user
    /// - [`CollectionError::Save`] if the backend rejects the write
    pub async fn save(
        &self,
        target: &Target,
        draft: &CollectionDraft,
        user: Option<&UserRecord>,
    ) -> Result<Collection, CollectionError> {
        require_title(&draft.title)?;
        let user = user.ok_or(CollectionError::NotSignedIn)?;
        let body = draft.to_body(&user.id);

        let result = match target {
            Target::New => self.backend.create(COLLECTION_COLLECTION, &body).await,
            Target::Existing(id) => self.backend.update(COLLECTION_COLLECTION, id, &body).await,
        };
        let collection: Collection = result
            .and_then(decode_record)
            .map_err(|e| {
                warn!(error = %e, target = ?target, "collection save failed");
                CollectionError::Save(e)
            })?;
        info!(collection_id = %collection.id, posts = draft.selected.len(), "collection saved");
        Ok(collection)
    }

    /// # Errors
    ///
    /// Returns [`CollectionError::Delete`] if the backend call fails.
    pub async fn delete(&self, id: &str) -> Result<(), CollectionError> {
        self.backend
            .delete(COLLECTION_COLLECTION, id)
            .await
            .map_err(|e| {
                warn!(error = %e, collection_id = id, "collection delete failed");
                CollectionError::Delete(e)
            })?;
        info!(collection_id = id, "collection deleted");
        Ok(())
    }
}
