//! Derived views over store state.
//!
//! Pure functions recomputed on every read; nothing here is persisted
//! or cached, and nothing here mutates the store. Collection sizes are
//! small (single-user, human-generated content), so recomputation is
//! cheap enough to skip invalidation machinery entirely.
//!
//! # Module Structure
//!
//! - `sort`: Display ordering of the persona list
//! - `tasks`: Open-task aggregation across personas
//! - `preview`: Last-message previews and relative time labels

mod preview;
mod sort;
mod tasks;

// Re-export public API
pub use preview::{NO_MESSAGES_PLACEHOLDER, PREVIEW_LENGTH, last_message_preview, time_ago};
pub use sort::sorted_personas;
pub use tasks::{OpenTask, OpenTaskGroup, open_task_count, open_tasks, personas_with_open_tasks};
