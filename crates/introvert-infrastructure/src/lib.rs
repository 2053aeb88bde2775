//! introvert-infrastructure: concrete persistence for introvert-core.
//!
//! Provides the file-backed [`storage::KeyValueStorage`] implementation
//! and platform path resolution the stores are wired up with at startup.
//!
//! [`storage::KeyValueStorage`]: introvert_core::storage::KeyValueStorage

pub mod json_file_storage;
pub mod paths;

pub use json_file_storage::JsonFileStorage;
pub use paths::IntrovertPaths;
