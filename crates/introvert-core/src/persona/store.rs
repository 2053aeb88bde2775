//! Persona store.
//!
//! Owns the persona collection and its nested messages, and is the only
//! writer of the `introvert-chat-personas` document. All mutations are
//! synchronous against in-memory state and total: an unknown id is a
//! silent no-op, never an error. Every mutation queues a
//! fire-and-forget persistence write and then notifies subscribers; the
//! in-memory state is authoritative and is never rolled back on a
//! persistence failure. Writes drain through a single writer task in
//! mutation order, so the durable document is always the latest
//! snapshot (last-writer-wins).
//!
//! Construction must go through [`PersonaStore::load`] (or
//! [`PersonaStore::new`] for a fresh store) so that rehydration strictly
//! precedes the first seed check — otherwise a start-up race could seed
//! twice or overwrite rehydrated data.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::{Message, Persona};
use super::preset::default_personas;
use super::request::{MessagePatch, NewMessage, NewPersona, PersonaPatch};
use crate::error::Result;
use crate::storage::{DocumentWriter, KeyValueStorage};

/// Storage key for the persona collection document.
pub const PERSONAS_KEY: &str = "introvert-chat-personas";

/// The persisted shape of the persona collection.
///
/// Versionless; missing fields default on load. `initialized` is the
/// permanent seeding guard: once true, the defaults are never inserted
/// again, even if the user deletes every persona.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonaDocument {
    #[serde(default)]
    pub personas: Vec<Persona>,
    #[serde(default)]
    pub initialized: bool,
}

/// Callback invoked with the full persona collection after every mutation.
pub type PersonaSubscriber = Box<dyn Fn(&[Persona]) + Send + Sync>;

/// The persona collection store.
///
/// An explicit store object: state is owned, storage is injected, and
/// observation happens through an explicit publish-on-mutation callback
/// list, so multiple instances can coexist (e.g. in tests) without any
/// shared global.
pub struct PersonaStore {
    document: PersonaDocument,
    writer: DocumentWriter,
    subscribers: Vec<PersonaSubscriber>,
}

impl PersonaStore {
    /// Creates an empty, never-initialized store on top of `storage`.
    ///
    /// Use [`PersonaStore::load`] when prior state may exist.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            document: PersonaDocument::default(),
            writer: DocumentWriter::new(storage, PERSONAS_KEY),
            subscribers: Vec::new(),
        }
    }

    /// Loads the store from `storage`, rehydrating any prior document.
    ///
    /// Rehydration is lenient: malformed persona records and duplicate
    /// ids are dropped (logged at `warn`) rather than failing the load,
    /// and a wholly malformed document yields the empty default state.
    ///
    /// This is awaited to completion before any caller can reach
    /// [`initialize_default_personas`](Self::initialize_default_personas),
    /// which preserves the seeding idempotence invariant.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage adapter itself fails to read.
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let document = match storage.load(PERSONAS_KEY).await? {
            Some(raw) => rehydrate(&raw),
            None => PersonaDocument::default(),
        };
        Ok(Self {
            document,
            writer: DocumentWriter::new(storage, PERSONAS_KEY),
            subscribers: Vec::new(),
        })
    }

    /// Registers a callback invoked with the persona collection after
    /// every mutation.
    pub fn subscribe(&mut self, subscriber: PersonaSubscriber) {
        self.subscribers.push(subscriber);
    }

    /// The persona collection, in insertion order.
    pub fn personas(&self) -> &[Persona] {
        &self.document.personas
    }

    /// Looks up a persona by id.
    pub fn get_persona(&self, id: &str) -> Option<&Persona> {
        self.document.personas.iter().find(|p| p.id == id)
    }

    /// Whether default seeding has ever run on this installation.
    pub fn is_initialized(&self) -> bool {
        self.document.initialized
    }

    /// Creates a persona from `data` and appends it to the collection.
    ///
    /// The id is allocated here; the new persona starts with an empty
    /// thread. Returns a copy of the created record.
    pub fn add_persona(&mut self, data: NewPersona) -> Persona {
        let persona = data.into_persona();
        self.document.personas.push(persona.clone());
        self.persist();
        self.notify();
        persona
    }

    /// Shallow-merges `patch` into the persona with `id`.
    ///
    /// Silent no-op when the id has no match.
    pub fn update_persona(&mut self, id: &str, patch: PersonaPatch) {
        let Some(persona) = self.document.personas.iter_mut().find(|p| p.id == id) else {
            return;
        };
        patch.apply(persona);
        self.persist();
        self.notify();
    }

    /// Removes the persona with `id` and all of its messages.
    ///
    /// Silent no-op when the id has no match. No tombstones, no undo.
    pub fn delete_persona(&mut self, id: &str) {
        let before = self.document.personas.len();
        self.document.personas.retain(|p| p.id != id);
        if self.document.personas.len() == before {
            return;
        }
        self.persist();
        self.notify();
    }

    /// Flips the favorite flag of the persona with `id`.
    ///
    /// Silent no-op when the id has no match.
    pub fn toggle_favorite(&mut self, id: &str) {
        let Some(persona) = self.document.personas.iter_mut().find(|p| p.id == id) else {
            return;
        };
        persona.favorite = !persona.favorite;
        self.persist();
        self.notify();
    }

    /// Appends a message built from `data` to the thread of `persona_id`.
    ///
    /// Allocates the message id and defaults the timestamp to now
    /// (epoch millis) when the request carries none. Returns a copy of
    /// the created message, or `None` when `persona_id` has no match —
    /// the store keeps the silent no-op contract, the `Option` merely
    /// makes the outcome observable to callers that care.
    pub fn add_message(&mut self, persona_id: &str, data: NewMessage) -> Option<Message> {
        let now = chrono::Utc::now().timestamp_millis();
        let persona = self
            .document
            .personas
            .iter_mut()
            .find(|p| p.id == persona_id)?;
        let message = data.into_message(now);
        persona.messages.push(message.clone());
        self.persist();
        self.notify();
        Some(message)
    }

    /// Shallow-merges `patch` into the matching message.
    ///
    /// Silent no-op when either id has no match.
    pub fn update_message(&mut self, persona_id: &str, message_id: &str, patch: MessagePatch) {
        let Some(persona) = self
            .document
            .personas
            .iter_mut()
            .find(|p| p.id == persona_id)
        else {
            return;
        };
        let Some(message) = persona.messages.iter_mut().find(|m| m.id == message_id) else {
            return;
        };
        patch.apply(message);
        self.persist();
        self.notify();
    }

    /// Removes the matching message from the persona's thread.
    ///
    /// Silent no-op when either id has no match.
    pub fn delete_message(&mut self, persona_id: &str, message_id: &str) {
        let Some(persona) = self
            .document
            .personas
            .iter_mut()
            .find(|p| p.id == persona_id)
        else {
            return;
        };
        let before = persona.messages.len();
        persona.messages.retain(|m| m.id != message_id);
        if persona.messages.len() == before {
            return;
        }
        self.persist();
        self.notify();
    }

    /// Seeds the default personas on first run.
    ///
    /// Runs at most once per store lifetime: only when the collection is
    /// empty AND seeding has never happened before. Safe to call on
    /// every app start; after the guard flag is set it never reseeds,
    /// even when the user has deleted all personas.
    pub fn initialize_default_personas(&mut self) {
        if !self.document.personas.is_empty() || self.document.initialized {
            return;
        }
        for preset in default_personas() {
            self.document.personas.push(preset.into_persona());
        }
        self.document.initialized = true;
        self.persist();
        self.notify();
    }

    /// Writes the current document to storage and awaits durability,
    /// behind any writes still queued from earlier mutations.
    ///
    /// Normal mutations persist fire-and-forget; this is the explicit
    /// path for shutdown and tests.
    pub async fn flush(&self) -> Result<()> {
        let payload = serde_json::to_string(&self.document)?;
        self.writer.flush(payload).await
    }

    /// Queues an asynchronous write of the current document.
    ///
    /// The caller does not await durability; a failed write is logged
    /// and the in-memory state stands. Snapshots reach storage in
    /// mutation order, so the latest mutation is always the durable one.
    fn persist(&self) {
        match serde_json::to_string(&self.document) {
            Ok(payload) => self.writer.enqueue(payload),
            Err(err) => {
                tracing::warn!("failed to serialize persona document: {err}");
            }
        }
    }

    fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.document.personas);
        }
    }
}

/// Rebuilds a document from its serialized form, dropping what cannot
/// be reconstructed instead of failing the load.
///
/// Dropped: persona values that do not deserialize (including messages
/// with out-of-enum types), and personas whose id duplicates an earlier
/// record.
fn rehydrate(raw: &str) -> PersonaDocument {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("persona document is not valid JSON, starting empty: {err}");
            return PersonaDocument::default();
        }
    };

    let initialized = value
        .get("initialized")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut personas = Vec::new();
    let mut seen_ids = HashSet::new();
    if let Some(records) = value.get("personas").and_then(Value::as_array) {
        for record in records {
            match serde_json::from_value::<Persona>(record.clone()) {
                Ok(persona) => {
                    if seen_ids.insert(persona.id.clone()) {
                        personas.push(persona);
                    } else {
                        tracing::warn!("dropping persona with duplicate id: {}", persona.id);
                    }
                }
                Err(err) => {
                    tracing::warn!("dropping malformed persona record: {err}");
                }
            }
        }
    }

    PersonaDocument {
        personas,
        initialized,
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
