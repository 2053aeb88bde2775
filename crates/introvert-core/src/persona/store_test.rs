use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::persona::model::MessageType;
use crate::storage::MemoryStorage;

fn store() -> PersonaStore {
    PersonaStore::new(Arc::new(MemoryStorage::new()))
}

fn checkbox(content: &str, checked: bool) -> NewMessage {
    NewMessage {
        content: content.to_string(),
        message_type: MessageType::Checkbox,
        timestamp: None,
        checked: Some(checked),
    }
}

#[tokio::test]
async fn test_seeding_inserts_exactly_four_defaults() {
    let mut store = store();
    store.initialize_default_personas();

    let names: Vec<&str> = store.personas().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Creative", "Work", "Home Improvement", "Bookworm"]);
    assert!(store.is_initialized());
    assert!(store.personas().iter().all(|p| p.messages.is_empty()));
    assert!(store.personas().iter().all(|p| !p.favorite));
}

#[tokio::test]
async fn test_seeding_is_idempotent() {
    let mut store = store();
    store.initialize_default_personas();
    let after_first: Vec<String> = store.personas().iter().map(|p| p.id.clone()).collect();

    store.initialize_default_personas();

    let after_second: Vec<String> = store.personas().iter().map(|p| p.id.clone()).collect();
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_seeding_suppressed_after_deleting_everything() {
    let mut store = store();
    store.initialize_default_personas();

    let ids: Vec<String> = store.personas().iter().map(|p| p.id.clone()).collect();
    for id in &ids {
        store.delete_persona(id);
    }
    assert!(store.personas().is_empty());
    assert!(store.is_initialized());

    // Collection is empty again, but the guard flag must win.
    store.initialize_default_personas();
    assert!(store.personas().is_empty());
}

#[tokio::test]
async fn test_seeding_suppressed_on_rehydrated_initialized_document() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .seed(PERSONAS_KEY, r#"{"personas":[],"initialized":true}"#)
        .await;

    let mut store = PersonaStore::load(storage).await.unwrap();
    store.initialize_default_personas();

    assert!(store.personas().is_empty());
}

#[tokio::test]
async fn test_add_persona_allocates_unique_ids() {
    let mut store = store();
    let a = store.add_persona(NewPersona::named("A"));
    let b = store.add_persona(NewPersona::named("B"));

    assert_ne!(a.id, b.id);
    assert_eq!(store.personas().len(), 2);
    assert!(a.messages.is_empty());
}

#[tokio::test]
async fn test_update_persona_merges_and_ignores_unknown_id() {
    let mut store = store();
    let persona = store.add_persona(NewPersona::named("Work"));

    store.update_persona(&persona.id, PersonaPatch::rename("Office"));
    assert_eq!(store.get_persona(&persona.id).unwrap().name, "Office");

    // Unknown id: silent no-op
    store.update_persona("no-such-id", PersonaPatch::rename("Ghost"));
    assert_eq!(store.personas().len(), 1);
}

#[tokio::test]
async fn test_toggle_favorite_flips_and_ignores_unknown_id() {
    let mut store = store();
    let persona = store.add_persona(NewPersona::named("Work"));
    assert!(!store.get_persona(&persona.id).unwrap().favorite);

    store.toggle_favorite(&persona.id);
    assert!(store.get_persona(&persona.id).unwrap().favorite);

    store.toggle_favorite(&persona.id);
    assert!(!store.get_persona(&persona.id).unwrap().favorite);

    store.toggle_favorite("no-such-id");
    assert_eq!(store.personas().len(), 1);
}

#[tokio::test]
async fn test_delete_persona_cascades_and_blocks_later_sends() {
    let mut store = store();
    let persona = store.add_persona(NewPersona::named("Work"));
    store.add_message(&persona.id, checkbox("task one", false));
    store.add_message(&persona.id, checkbox("task two", false));
    assert_eq!(store.get_persona(&persona.id).unwrap().messages.len(), 2);

    store.delete_persona(&persona.id);
    assert!(store.personas().is_empty());

    // The persona is gone, so a later send is a no-op.
    let created = store.add_message(
        &persona.id,
        NewMessage::new("hello?", MessageType::Question),
    );
    assert!(created.is_none());
    assert!(store.personas().is_empty());
}

#[tokio::test]
async fn test_add_message_defaults_timestamp_and_allocates_id() {
    let mut store = store();
    let persona = store.add_persona(NewPersona::named("Work"));
    let before = chrono::Utc::now().timestamp_millis();

    let message = store
        .add_message(
            &persona.id,
            NewMessage::new("hello", MessageType::Question),
        )
        .unwrap();

    let after = chrono::Utc::now().timestamp_millis();
    assert!(!message.id.is_empty());
    assert!(message.timestamp >= before && message.timestamp <= after);
    assert_eq!(
        store.get_persona(&persona.id).unwrap().messages[0],
        message
    );
}

#[tokio::test]
async fn test_add_message_keeps_insertion_order() {
    let mut store = store();
    let persona = store.add_persona(NewPersona::named("Work"));

    // Explicit timestamps out of wall-clock order; insertion order is canonical.
    let mut first = NewMessage::new("first", MessageType::Paragraph);
    first.timestamp = Some(200);
    let mut second = NewMessage::new("second", MessageType::Paragraph);
    second.timestamp = Some(100);

    store.add_message(&persona.id, first);
    store.add_message(&persona.id, second);

    let contents: Vec<&str> = store
        .get_persona(&persona.id)
        .unwrap()
        .messages
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(contents, ["first", "second"]);
}

#[tokio::test]
async fn test_update_message_merges_and_ignores_unknown_ids() {
    let mut store = store();
    let persona = store.add_persona(NewPersona::named("Work"));
    let message = store
        .add_message(&persona.id, checkbox("buy milk", false))
        .unwrap();

    store.update_message(&persona.id, &message.id, MessagePatch::set_checked(true));
    let stored = &store.get_persona(&persona.id).unwrap().messages[0];
    assert_eq!(stored.checked, Some(true));
    assert_eq!(stored.content, "buy milk");

    // Unknown message or persona id: silent no-op
    store.update_message(&persona.id, "no-such-message", MessagePatch::set_checked(false));
    store.update_message("no-such-persona", &message.id, MessagePatch::set_checked(false));
    assert_eq!(
        store.get_persona(&persona.id).unwrap().messages[0].checked,
        Some(true)
    );
}

#[tokio::test]
async fn test_delete_message_removes_only_the_match() {
    let mut store = store();
    let persona = store.add_persona(NewPersona::named("Work"));
    let first = store
        .add_message(&persona.id, checkbox("keep", false))
        .unwrap();
    let second = store
        .add_message(&persona.id, checkbox("remove", false))
        .unwrap();

    store.delete_message(&persona.id, &second.id);

    let messages = &store.get_persona(&persona.id).unwrap().messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, first.id);

    store.delete_message(&persona.id, "no-such-message");
    assert_eq!(store.get_persona(&persona.id).unwrap().messages.len(), 1);
}

#[tokio::test]
async fn test_round_trip_preserves_ids_fields_and_message_order() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = PersonaStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);

    let work = store.add_persona(NewPersona {
        name: "Work".to_string(),
        color: Some("#EF4444".to_string()),
        avatar: None,
        emoji: Some("👔".to_string()),
        favorite: true,
    });
    let home = store.add_persona(NewPersona::named("Home"));
    store.add_message(&work.id, NewMessage::new("standup notes", MessageType::Header1));
    store.add_message(&work.id, checkbox("write report", false));
    store.add_message(&work.id, checkbox("send invoice", true));
    store.add_message(&home.id, NewMessage::new("paint ideas", MessageType::Question));
    store.add_message(&home.id, NewMessage::new("light gray", MessageType::Answer));

    store.flush().await.unwrap();

    let reloaded = PersonaStore::load(storage).await.unwrap();
    assert!(!reloaded.is_initialized());
    assert_eq!(reloaded.personas().len(), 2);

    let reloaded_work = reloaded.get_persona(&work.id).unwrap();
    assert_eq!(reloaded_work.name, "Work");
    assert_eq!(reloaded_work.color.as_deref(), Some("#EF4444"));
    assert!(reloaded_work.favorite);
    let contents: Vec<&str> = reloaded_work
        .messages
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(contents, ["standup notes", "write report", "send invoice"]);

    let reloaded_home = reloaded.get_persona(&home.id).unwrap();
    assert_eq!(reloaded_home.messages.len(), 2);
    assert_eq!(reloaded_home.messages[1].message_type, MessageType::Answer);
}

#[tokio::test]
async fn test_rehydration_drops_malformed_and_duplicate_records() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .seed(
            PERSONAS_KEY,
            r#"{
              "personas": [
                {"id": "p1", "name": "Good"},
                {"id": "p2", "name": "Bad type", "messages": [
                  {"id": "m1", "content": "x", "type": "hologram", "timestamp": 1}
                ]},
                "not even an object",
                {"id": "p1", "name": "Duplicate of p1"}
              ],
              "initialized": true
            }"#,
        )
        .await;

    let store = PersonaStore::load(storage).await.unwrap();
    assert_eq!(store.personas().len(), 1);
    assert_eq!(store.personas()[0].name, "Good");
    assert!(store.is_initialized());
}

#[tokio::test]
async fn test_rehydration_of_garbage_document_starts_empty() {
    let storage = Arc::new(MemoryStorage::new());
    storage.seed(PERSONAS_KEY, "not json at all {{{").await;

    let store = PersonaStore::load(storage).await.unwrap();
    assert!(store.personas().is_empty());
    assert!(!store.is_initialized());
}

#[tokio::test]
async fn test_subscribers_notified_on_every_mutation() {
    let mut store = store();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    store.subscribe(Box::new(move |_personas| {
        seen.fetch_add(1, Ordering::SeqCst);
    }));

    let persona = store.add_persona(NewPersona::named("Work"));
    store.toggle_favorite(&persona.id);
    store.delete_persona(&persona.id);

    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_no_op_mutations_do_not_notify() {
    let mut store = store();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    store.subscribe(Box::new(move |_personas| {
        seen.fetch_add(1, Ordering::SeqCst);
    }));

    store.delete_persona("no-such-id");
    store.toggle_favorite("no-such-id");
    store.update_persona("no-such-id", PersonaPatch::rename("Ghost"));
    store.delete_message("no-such-persona", "no-such-message");

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// Storage whose first save stalls. With unordered writes the stalled
/// first snapshot would land last and become the durable state.
struct SlowFirstSaveStorage {
    inner: MemoryStorage,
    stalled: std::sync::atomic::AtomicBool,
}

impl SlowFirstSaveStorage {
    fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
            stalled: std::sync::atomic::AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStorage for SlowFirstSaveStorage {
    async fn load(&self, key: &str) -> crate::error::Result<Option<String>> {
        self.inner.load(key).await
    }

    async fn save(&self, key: &str, value: &str) -> crate::error::Result<()> {
        if !self.stalled.swap(true, Ordering::SeqCst) {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        self.inner.save(key, value).await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_earlier_save_cannot_clobber_later_mutation() {
    let storage = Arc::new(SlowFirstSaveStorage::new());
    let mut store = PersonaStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);

    store.add_persona(NewPersona::named("First"));
    store.add_persona(NewPersona::named("Second"));

    // Let both queued saves run to completion, stall included.
    tokio::time::sleep(std::time::Duration::from_millis(150)).await;

    let raw = storage.inner.load(PERSONAS_KEY).await.unwrap().unwrap();
    let document: PersonaDocument = serde_json::from_str(&raw).unwrap();
    assert_eq!(document.personas.len(), 2);
    let names: Vec<&str> = document.personas.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["First", "Second"]);
}

#[tokio::test]
async fn test_flush_writes_the_current_document() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = PersonaStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStorage>);
    store.add_persona(NewPersona::named("Work"));
    store.flush().await.unwrap();

    let raw = storage.load(PERSONAS_KEY).await.unwrap().unwrap();
    let document: PersonaDocument = serde_json::from_str(&raw).unwrap();
    assert_eq!(document.personas.len(), 1);
    assert_eq!(document.personas[0].name, "Work");
}
