//! User profile store.
//!
//! Owns the singleton user profile and is the only writer of the
//! `introvert-chat-user` document. Mirrors the persona store's shape:
//! synchronous in-memory mutation, fire-and-forget persistence,
//! publish-on-mutation subscribers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::model::{UserPatch, UserProfile};
use crate::error::Result;
use crate::storage::{DocumentWriter, KeyValueStorage};

/// Storage key for the user profile document.
pub const USER_KEY: &str = "introvert-chat-user";

/// The persisted shape of the user profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default)]
    pub user: UserProfile,
}

/// Callback invoked with the profile after every mutation.
pub type UserSubscriber = Box<dyn Fn(&UserProfile) + Send + Sync>;

/// The user profile store.
pub struct UserStore {
    document: UserDocument,
    writer: DocumentWriter,
    subscribers: Vec<UserSubscriber>,
}

impl UserStore {
    /// Creates a store with an empty profile on top of `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            document: UserDocument::default(),
            writer: DocumentWriter::new(storage, USER_KEY),
            subscribers: Vec::new(),
        }
    }

    /// Loads the store from `storage`, rehydrating any prior document.
    ///
    /// A malformed document yields the empty default profile rather
    /// than failing the load.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage adapter itself fails to read.
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let document = match storage.load(USER_KEY).await? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!("user document is malformed, starting empty: {err}");
                UserDocument::default()
            }),
            None => UserDocument::default(),
        };
        Ok(Self {
            document,
            writer: DocumentWriter::new(storage, USER_KEY),
            subscribers: Vec::new(),
        })
    }

    /// Registers a callback invoked with the profile after every mutation.
    pub fn subscribe(&mut self, subscriber: UserSubscriber) {
        self.subscribers.push(subscriber);
    }

    /// The current profile.
    pub fn user(&self) -> &UserProfile {
        &self.document.user
    }

    /// Shallow-merges `patch` into the profile. No validation.
    pub fn update_user(&mut self, patch: UserPatch) {
        patch.apply(&mut self.document.user);
        self.persist();
        for subscriber in &self.subscribers {
            subscriber(&self.document.user);
        }
    }

    /// Writes the current document to storage and awaits durability,
    /// behind any writes still queued from earlier mutations.
    pub async fn flush(&self) -> Result<()> {
        let payload = serde_json::to_string(&self.document)?;
        self.writer.flush(payload).await
    }

    fn persist(&self) {
        match serde_json::to_string(&self.document) {
            Ok(payload) => self.writer.enqueue(payload),
            Err(err) => {
                tracing::warn!("failed to serialize user document: {err}");
            }
        }
    }
}
