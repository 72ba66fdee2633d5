//! In-process [`Backend`] for unit tests.
//!
//! Records live in per-collection vectors; `get_list` returns them all and
//! records the query so tests can assert on the parameters instead of on
//! server-side filtering.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::Notify;

use super::query::ListQuery;
use super::{AuthResponse, Backend, ListPage};
use crate::error::ClientError;
use crate::session::UserRecord;
use crate::session::test_helpers::fresh_token;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
pub(crate) struct MockBackend {
    accounts: Mutex<HashMap<String, (String, UserRecord)>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    records: Mutex<HashMap<String, Vec<Value>>>,
    failures: Mutex<VecDeque<ClientError>>,
    token: Mutex<Option<String>>,
    next_id: Mutex<u32>,
    pub(crate) calls: Mutex<Vec<String>>,
    pub(crate) queries: Mutex<Vec<(String, ListQuery)>>,
}

impl MockBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register an account that password auth accepts.
    pub(crate) fn with_account(&self, email: &str, password: &str, user: UserRecord) {
        lock(&self.accounts).insert(email.to_owned(), (password.to_owned(), user));
    }

    /// Hold password auth for `email` until the returned handle is notified.
    pub(crate) fn gate(&self, email: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        lock(&self.gates).insert(email.to_owned(), Arc::clone(&notify));
        notify
    }

    pub(crate) fn insert(&self, collection: &str, record: Value) {
        lock(&self.records)
            .entry(collection.to_owned())
            .or_default()
            .push(record);
    }

    pub(crate) fn records(&self, collection: &str) -> Vec<Value> {
        lock(&self.records)
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Make the next backend call fail with `err`.
    pub(crate) fn fail_next(&self, err: ClientError) {
        lock(&self.failures).push_back(err);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub(crate) fn last_query(&self) -> Option<(String, ListQuery)> {
        lock(&self.queries).last().cloned()
    }

    fn record_call(&self, call: String) -> Result<(), ClientError> {
        lock(&self.calls).push(call);
        match lock(&self.failures).pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn not_found() -> ClientError {
    ClientError::Response { status: 404, message: "The requested resource wasn't found.".into() }
}

fn id_of(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

#[async_trait::async_trait]
impl Backend for MockBackend {
    fn base_url(&self) -> &str {
        "http://pb.test"
    }

    fn set_auth_token(&self, token: Option<String>) {
        *lock(&self.token) = token;
    }

    fn auth_token(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    async fn auth_with_password(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let gate = lock(&self.gates).get(identity).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record_call(format!("auth {collection} {identity}"))?;
        let account = lock(&self.accounts).get(identity).cloned();
        match account {
            Some((expected, user)) if expected == password => Ok(AuthResponse { token: fresh_token(), record: user }),
            _ => Err(ClientError::Response { status: 400, message: "Failed to authenticate.".into() }),
        }
    }

    async fn get_list(&self, collection: &str, query: &ListQuery) -> Result<ListPage<Value>, ClientError> {
        self.record_call(format!("list {collection}"))?;
        lock(&self.queries).push((collection.to_owned(), query.clone()));
        let items = self.records(collection);
        let total = i64::try_from(items.len()).unwrap_or(i64::MAX);
        Ok(ListPage { page: query.page, per_page: query.per_page, total_items: total, total_pages: 1, items })
    }

    async fn get_one(&self, collection: &str, id: &str, expand: Option<&str>) -> Result<Value, ClientError> {
        self.record_call(format!("view {collection} {id} expand={}", expand.unwrap_or("")))?;
        self.records(collection)
            .into_iter()
            .find(|r| id_of(r) == Some(id))
            .ok_or_else(not_found)
    }

    async fn create(&self, collection: &str, body: &Value) -> Result<Value, ClientError> {
        self.record_call(format!("create {collection}"))?;
        let id = {
            let mut next = lock(&self.next_id);
            *next += 1;
            format!("new{next}")
        };
        let mut record = body.clone();
        if let Some(obj) = record.as_object_mut() {
            obj.insert("id".into(), Value::String(id));
            obj.insert("created".into(), Value::String("2024-06-01 09:00:00.000Z".into()));
        }
        self.insert(collection, record.clone());
        Ok(record)
    }

    async fn update(&self, collection: &str, id: &str, body: &Value) -> Result<Value, ClientError> {
        self.record_call(format!("update {collection} {id}"))?;
        let mut records = lock(&self.records);
        let record = records
            .get_mut(collection)
            .and_then(|rs| rs.iter_mut().find(|r| id_of(r) == Some(id)))
            .ok_or_else(not_found)?;
        if let (Some(target), Some(patch)) = (record.as_object_mut(), body.as_object()) {
            for (k, v) in patch {
                target.insert(k.clone(), v.clone());
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), ClientError> {
        self.record_call(format!("delete {collection} {id}"))?;
        let mut records = lock(&self.records);
        let list = records.get_mut(collection).ok_or_else(not_found)?;
        let before = list.len();
        list.retain(|r| id_of(r) != Some(id));
        if list.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
