//! Key-value storage abstraction.
//!
//! Defines the persistence seam between the in-memory stores and the
//! durable medium. Stores serialize their full state into a single
//! document per key; the adapter only moves opaque strings.

use crate::error::{Result, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, oneshot};

/// An abstract key-value persistence adapter.
///
/// This trait decouples the stores from the specific storage mechanism
/// (e.g. JSON files on disk, an in-memory map in tests). Operations are
/// asynchronous and may be queued; callers must not assume immediate
/// durability after `save` returns.
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Missing keys on `load` (return `Ok(None)`, not an error)
/// - Atomic replacement on `save` so a crash never leaves a torn document
///
/// A failed save is not retried by the adapter; the calling store treats
/// durability as best-effort and keeps its in-memory state authoritative.
#[async_trait::async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Loads the serialized document stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(document))`: A document exists for this key
    /// - `Ok(None)`: No document has been saved under this key
    /// - `Err(StoreError)`: The medium failed to read
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Saves `value` under `key`, replacing any previous document.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Document saved successfully
    /// - `Err(StoreError)`: The medium failed to write
    async fn save(&self, key: &str, value: &str) -> Result<()>;
}

enum WriteCommand {
    /// Fire-and-forget save; failure is logged.
    Save(String),
    /// Awaited save; the result is reported back to the caller.
    Flush(String, oneshot::Sender<Result<()>>),
}

/// Serialized write path for one persisted document.
///
/// Each store funnels every snapshot of its document through a single
/// writer task, which drains them strictly in submission order. This is
/// what upholds last-writer-wins durability: independent spawned saves
/// could land out of order on a multi-threaded runtime and leave an
/// older snapshot as the stored state.
pub struct DocumentWriter {
    sender: mpsc::UnboundedSender<WriteCommand>,
}

impl DocumentWriter {
    /// Spawns the writer task for `key` on top of `storage`.
    ///
    /// Must be called within a tokio runtime context.
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: &'static str) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(command) = receiver.recv().await {
                match command {
                    WriteCommand::Save(payload) => {
                        if let Err(err) = storage.save(key, &payload).await {
                            tracing::warn!("failed to persist document '{key}': {err}");
                        }
                    }
                    WriteCommand::Flush(payload, ack) => {
                        let _ = ack.send(storage.save(key, &payload).await);
                    }
                }
            }
        });
        Self { sender }
    }

    /// Queues a snapshot for writing; the caller does not await
    /// durability. Snapshots queued later always reach storage later.
    pub fn enqueue(&self, payload: String) {
        if self.sender.send(WriteCommand::Save(payload)).is_err() {
            tracing::warn!("document writer task is gone, dropping snapshot");
        }
    }

    /// Writes a snapshot and awaits durability, behind any queued
    /// snapshots. The explicit path for shutdown and tests.
    pub async fn flush(&self, payload: String) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.sender
            .send(WriteCommand::Flush(payload, ack))
            .map_err(|_| StoreError::internal("document writer task is gone"))?;
        done.await
            .map_err(|_| StoreError::internal("document writer dropped the flush ack"))?
    }
}

/// In-memory storage backed by a `HashMap`.
///
/// Used by tests and by ephemeral stores that do not need durability.
/// Cheaply cloneable; clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a key, bypassing the trait. Test convenience.
    pub async fn seed(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
    }
}

#[async_trait::async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
