//! Session state shared by the navigation guard and the HTTP pipeline.
//!
//! The session is two records in a per-origin [`KeyValueStore`]: the bearer
//! credential under [`CREDENTIAL_KEY`] and the serialized identity under
//! [`IDENTITY_KEY`]. They are read and removed independently; nothing here
//! assumes one implies the other. Credential values must never be logged.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const CREDENTIAL_KEY: &str = "token";
pub const IDENTITY_KEY: &str = "user";

/// Authenticated user profile as returned by the login endpoint.
///
/// Role flags arrive either as JSON booleans or as `0`/`1` integers; any
/// non-zero number counts as set. A missing `id` reads as `0`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_super_admin: bool,
    /// Remaining profile fields, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let set = match &value {
        Value::Null => false,
        Value::Bool(set) => *set,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(text.trim(), "1" | "true" | "TRUE" | "True"),
        Value::Array(_) | Value::Object(_) => {
            return Err(serde::de::Error::custom(format!(
                "expected a boolean or number role flag, got {value}"
            )))
        }
    };
    Ok(set)
}

/// Snapshot of both session records.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub credential: Option<SecretString>,
    pub identity: Option<Identity>,
}

impl Session {
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credential.is_none() && self.identity.is_none()
    }
}

/// Single owner of the session records, built once and shared by reference.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Reads both records. Never fails: missing or unreadable records are absent.
    #[must_use]
    pub fn read(&self) -> Session {
        Session {
            credential: self.credential(),
            identity: self.identity(),
        }
    }

    /// Returns the credential, treating an empty record as absent.
    #[must_use]
    pub fn credential(&self) -> Option<SecretString> {
        self.store
            .get(CREDENTIAL_KEY)
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        let raw = self.store.get(IDENTITY_KEY)?;
        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => Some(identity),
            Err(err) => {
                warn!("ignoring unreadable identity record: {err}");
                None
            }
        }
    }

    /// Writes both records after a successful login.
    ///
    /// # Errors
    /// Returns an error if either record cannot be persisted.
    pub fn store(&self, credential: &SecretString, identity: &Identity) -> Result<(), StoreError> {
        let identity_json = serde_json::to_string(identity)?;
        self.store.set(CREDENTIAL_KEY, credential.expose_secret())?;
        self.store.set(IDENTITY_KEY, &identity_json)?;
        debug!(user_id = identity.id, "session stored");
        Ok(())
    }

    /// Removes the credential, then the identity.
    ///
    /// The two removals are not atomic; a concurrent reader may observe an
    /// identity without a credential in between. Storage failures are logged.
    pub fn clear(&self) {
        for key in [CREDENTIAL_KEY, IDENTITY_KEY] {
            if let Err(err) = self.store.remove(key) {
                error!(key, "failed to remove session record: {err}");
            }
        }
        debug!("session cleared");
    }
}
