//! Backend-as-a-service client seam.
//!
//! ARCHITECTURE
//! ============
//! Every screen and the auth context talk to the backend through the
//! [`Backend`] trait so tests can swap in a mock. [`PocketBaseClient`] is the
//! HTTP implementation. Records cross the seam as `serde_json::Value`; the
//! domain modules decode them into their own types, which keeps the trait
//! object-safe.
//!
//! The backend owns validation, consistency, paging state and retries; the
//! client only forwards the two pagination integers and the query strings.

pub mod files;
pub mod pocketbase;
pub mod query;

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::session::UserRecord;

pub use files::{file_url, thumb_url};
pub use pocketbase::PocketBaseClient;
pub use query::ListQuery;

/// Auth collection holding user accounts.
pub const USERS_COLLECTION: &str = "users";

/// Successful password authentication.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub record: UserRecord,
}

/// One page of a collection listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    pub page: u32,
    pub per_page: u32,
    /// `-1` when the backend skipped counting.
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub total_pages: i64,
    pub items: Vec<T>,
}

impl ListPage<Value> {
    /// Decode every item into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Parse`] on the first item that does not match.
    pub fn decode<T: DeserializeOwned>(self) -> Result<ListPage<T>, ClientError> {
        let items = self
            .items
            .into_iter()
            .map(decode_record)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(ListPage {
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            items,
        })
    }
}

/// Decode a raw record into a typed value.
///
/// # Errors
///
/// Returns [`ClientError::Parse`] if the record does not match `T`.
pub fn decode_record<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Parse(e.to_string()))
}

/// Relation and multi-select columns come back as a bare value, a list, or
/// null depending on the column's max-select setting; read all three as a list.
///
/// # Errors
///
/// Fails when the value is neither `T`, a list of `T`, nor null.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<Raw<T>>::deserialize(deserializer)? {
        Some(Raw::Many(items)) => items,
        Some(Raw::One(item)) => vec![item],
        None => Vec::new(),
    })
}

/// Collection CRUD, list queries and password auth against the backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Root URL of the backend, used to build file URLs.
    fn base_url(&self) -> &str;

    /// Token sent with subsequent requests; `None` sends requests anonymously.
    fn set_auth_token(&self, token: Option<String>);

    fn auth_token(&self) -> Option<String>;

    async fn auth_with_password(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError>;

    async fn get_list(&self, collection: &str, query: &ListQuery) -> Result<ListPage<Value>, ClientError>;

    async fn get_one(&self, collection: &str, id: &str, expand: Option<&str>) -> Result<Value, ClientError>;

    async fn create(&self, collection: &str, body: &Value) -> Result<Value, ClientError>;

    async fn update(&self, collection: &str, id: &str, body: &Value) -> Result<Value, ClientError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ClientError>;
}
