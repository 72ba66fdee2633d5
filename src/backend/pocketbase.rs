//! HTTP client for a PocketBase-compatible REST API.
//!
//! Thin wrapper over `/api/collections/{collection}/...`. Response parsing is
//! kept in free functions (`parse_json`, `parse_error`) for testability.

use std::sync::{PoisonError, RwLock};

use reqwest::RequestBuilder;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::query::ListQuery;
use super::{AuthResponse, Backend, ListPage};
use crate::config::BackendConfig;
use crate::error::ClientError;

#[cfg(test)]
#[path = "pocketbase_test.rs"]
mod tests;

// =============================================================================
// CLIENT
// =============================================================================

pub struct PocketBaseClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl PocketBaseClient {
    /// Build a client for `config.base_url`.
    ///
    /// Timeouts are only applied when configured; otherwise the HTTP stack's
    /// defaults govern.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned(), token: RwLock::new(None) })
    }

    fn records_url(&self, collection: &str) -> String {
        records_url(&self.base_url, collection)
    }

    fn record_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{id}", records_url(&self.base_url, collection))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.auth_token() {
            Some(token) => req.header(AUTHORIZATION, token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<String, ClientError> {
        let response = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &text));
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl Backend for PocketBaseClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn set_auth_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn auth_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn auth_with_password(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        debug!(%collection, "auth-with-password");
        let url = format!("{}/api/collections/{collection}/auth-with-password", self.base_url);
        let body = serde_json::json!({ "identity": identity, "password": password });
        let text = self.send(self.http.post(url).json(&body)).await?;
        parse_json(&text)
    }

    async fn get_list(&self, collection: &str, query: &ListQuery) -> Result<ListPage<Value>, ClientError> {
        debug!(%collection, page = query.page, per_page = query.per_page, "list records");
        let req = self
            .http
            .get(self.records_url(collection))
            .query(&query.to_pairs());
        let text = self.send(req).await?;
        parse_json(&text)
    }

    async fn get_one(&self, collection: &str, id: &str, expand: Option<&str>) -> Result<Value, ClientError> {
        debug!(%collection, %id, "view record");
        let mut req = self.http.get(self.record_url(collection, id));
        if let Some(expand) = expand {
            req = req.query(&[("expand", expand)]);
        }
        let text = self.send(req).await?;
        parse_json(&text)
    }

    async fn create(&self, collection: &str, body: &Value) -> Result<Value, ClientError> {
        debug!(%collection, "create record");
        let text = self
            .send(self.http.post(self.records_url(collection)).json(body))
            .await?;
        parse_json(&text)
    }

    async fn update(&self, collection: &str, id: &str, body: &Value) -> Result<Value, ClientError> {
        debug!(%collection, %id, "update record");
        let text = self
            .send(self.http.patch(self.record_url(collection, id)).json(body))
            .await?;
        parse_json(&text)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ClientError> {
        debug!(%collection, %id, "delete record");
        self.send(self.http.delete(self.record_url(collection, id)))
            .await?;
        Ok(())
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn records_url(base_url: &str, collection: &str) -> String {
    format!("{base_url}/api/collections/{collection}/records")
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ClientError> {
    serde_json::from_str(text).map_err(|e| ClientError::Parse(e.to_string()))
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Map<String, Value>,
}

/// Turn a non-success response into [`ClientError::Response`].
///
/// Field-level validation messages from `data` are appended so a single
/// string is enough for an alert.
fn parse_error(status: u16, body: &str) -> ClientError {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return ClientError::Response { status, message: format!("request failed with status {status}") };
    };
    let mut message = if parsed.message.is_empty() {
        format!("request failed with status {status}")
    } else {
        parsed.message
    };
    let details: Vec<String> = parsed
        .data
        .iter()
        .filter_map(|(field, detail)| {
            detail
                .get("message")
                .and_then(Value::as_str)
                .map(|m| format!("{field}: {m}"))
        })
        .collect();
    if !details.is_empty() {
        message = format!("{message} ({})", details.join("; "));
    }
    ClientError::Response { status, message }
}
