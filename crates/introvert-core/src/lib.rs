//! introvert-core: the in-memory document store behind introvert-chat.
//!
//! Owns the persona collection (with nested typed messages) and the
//! singleton user profile, persists both as versionless JSON documents
//! through an injected [`storage::KeyValueStorage`] adapter, and derives
//! display views ([`view`]) as pure recomputed functions.
//!
//! Control flow is one-directional: UI event -> store operation ->
//! in-memory mutation -> fire-and-forget persistence write -> derived
//! views recomputed -> re-render. Views never mutate store state.

pub mod error;
pub mod id;
pub mod persona;
pub mod storage;
pub mod user;
pub mod view;

// Re-export common error type
pub use error::StoreError;
