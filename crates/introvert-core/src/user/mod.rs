//! User profile domain module.
//!
//! The profile is a singleton record (name, avatar) with merge-only
//! updates and no delete operation.

mod model;
mod store;

// Re-export public API
pub use model::{UserPatch, UserProfile};
pub use store::{USER_KEY, UserDocument, UserStore, UserSubscriber};
