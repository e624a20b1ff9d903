//! Server-side sessions keyed by an opaque cookie token
//!
//! A [`Session`] handle is loaded once per request by [`load_and_save`] and
//! shared with the resolver, the gates and the handler through request
//! extensions. Changes are only written back to the [`SessionStore`] after
//! the handler has produced its response; a request that is abandoned
//! half-way commits nothing.
//!
//! The token is rotated with [`Session::renew_token`] whenever the trust
//! level of the session changes (sign-in, sign-out). Rotation removes the
//! old record from the store immediately, so a token captured before the
//! change is worthless afterwards.

pub mod layer;
pub mod memory;
pub mod postgres;
#[cfg(feature = "redis")]
pub mod redis;

pub use layer::{is_static_asset, load_and_save, SessionManager};
pub use memory::MemorySessionStore;
pub use postgres::PgSessionStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisSessionStore;

use crate::error::SessionError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, response::Response};
use axum::response::IntoResponse;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Session key holding the signed-in identity id
pub const AUTHENTICATED_USER_ID: &str = "authenticatedUserId";
/// One-shot message shown on the next rendered page
pub const FLASH: &str = "flash";
pub const DARK_MODE: &str = "darkMode";

/// What the store keeps for one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub values: HashMap<String, Value>,
    pub deadline: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self) -> bool {
        self.deadline <= Utc::now()
    }
}

/// Opaque keyed storage for session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Unknown and expired tokens both yield `None`
    async fn find(&self, token: &str) -> Result<Option<SessionRecord>, SessionError>;
    async fn commit(&self, token: &str, record: &SessionRecord) -> Result<(), SessionError>;
    async fn delete(&self, token: &str) -> Result<(), SessionError>;
    /// Drop expired records, returning how many were removed
    async fn cleanup_expired(&self) -> Result<u64, SessionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Unmodified,
    Modified,
    Destroyed,
}

#[derive(Debug)]
struct SessionState {
    /// `None` until the session has been written under some token
    token: Option<String>,
    values: HashMap<String, Value>,
    deadline: DateTime<Utc>,
    status: Status,
}

/// Per-request handle on the caller's session
#[derive(Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    store: Arc<dyn SessionStore>,
    lifetime: chrono::Duration,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Session")
            .field("status", &state.status)
            .field("keys", &state.values.keys().collect::<Vec<_>>())
            .field("deadline", &state.deadline)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Fresh, empty session that is not stored anywhere yet
    pub fn new(store: Arc<dyn SessionStore>, lifetime: chrono::Duration) -> Self {
        Self::from_state(
            store,
            lifetime,
            SessionState {
                token: None,
                values: HashMap::new(),
                deadline: deadline_after(lifetime),
                status: Status::Unmodified,
            },
        )
    }

    /// Load the session for `token`, falling back to a fresh one when the
    /// token is unknown or expired
    pub async fn load(
        store: Arc<dyn SessionStore>,
        lifetime: chrono::Duration,
        token: Option<&str>,
    ) -> Result<Self, SessionError> {
        let Some(token) = token else {
            return Ok(Self::new(store, lifetime));
        };

        match store.find(token).await? {
            Some(record) if !record.is_expired() => Ok(Self::from_state(
                store,
                lifetime,
                SessionState {
                    token: Some(token.to_string()),
                    values: record.values,
                    deadline: record.deadline,
                    status: Status::Unmodified,
                },
            )),
            _ => Ok(Self::new(store, lifetime)),
        }
    }

    fn from_state(store: Arc<dyn SessionStore>, lifetime: chrono::Duration, state: SessionState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            store,
            lifetime,
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.lock().values.get(key).cloned()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.state.lock().values.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.state.lock().values.get(key).and_then(Value::as_bool)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .values
            .get(key)
            .and_then(Value::as_str)
            .map(ToString::to_string)
    }

    pub fn put(&self, key: &str, value: impl Into<Value>) {
        let mut state = self.state.lock();
        state.values.insert(key.to_string(), value.into());
        state.status = Status::Modified;
    }

    pub fn remove(&self, key: &str) {
        let mut state = self.state.lock();
        if state.values.remove(key).is_some() {
            state.status = Status::Modified;
        }
    }

    /// Read a string value and delete it in the same step
    pub fn pop_string(&self, key: &str) -> Option<String> {
        let mut state = self.state.lock();
        let value = state.values.remove(key)?;
        state.status = Status::Modified;
        value.as_str().map(ToString::to_string)
    }

    /// Issue a new token for this session, keeping its values.
    ///
    /// The record under the old token is deleted right away; the new token
    /// is written when the session is committed.
    pub async fn renew_token(&self) -> Result<(), SessionError> {
        let old_token = self.state.lock().token.take();

        if let Some(old_token) = old_token {
            if let Err(e) = self.store.delete(&old_token).await {
                // Keep the old token so the session is still usable
                self.state.lock().token = Some(old_token);
                return Err(e);
            }
        }

        let mut state = self.state.lock();
        state.token = Some(generate_token());
        state.deadline = deadline_after(self.lifetime);
        state.status = Status::Modified;
        Ok(())
    }

    /// Delete the stored record and forget every value
    pub async fn destroy(&self) -> Result<(), SessionError> {
        let old_token = {
            let mut state = self.state.lock();
            state.values.clear();
            state.status = Status::Destroyed;
            state.token.take()
        };

        if let Some(old_token) = old_token {
            self.store.delete(&old_token).await?;
        }
        Ok(())
    }

    pub fn status(&self) -> Status {
        self.state.lock().status
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().token.clone()
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.state.lock().deadline
    }

    /// Write a modified session to the store.
    ///
    /// Returns the token and deadline the cookie must carry, or `None` when
    /// nothing was written.
    pub async fn commit(&self) -> Result<Option<(String, DateTime<Utc>)>, SessionError> {
        let (token, record) = {
            let mut state = self.state.lock();
            if state.status != Status::Modified {
                return Ok(None);
            }
            let token = state.token.get_or_insert_with(generate_token).clone();
            let record = SessionRecord {
                values: state.values.clone(),
                deadline: state.deadline,
            };
            (token, record)
        };

        self.store.commit(&token, &record).await?;
        Ok(Some((token, record.deadline)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| SessionError::NotLoaded.into_response())
    }
}

/// `now + lifetime`, saturating at the latest representable instant
fn deadline_after(lifetime: chrono::Duration) -> DateTime<Utc> {
    Utc::now()
        .checked_add_signed(lifetime)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// 256 bits from the OS generator, URL-safe base64 without padding
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
