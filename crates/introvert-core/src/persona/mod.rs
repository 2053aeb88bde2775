//! Persona domain module.
//!
//! Contains the persona/message domain models, creation and patch
//! request types, the default presets, and the store that owns the
//! collection.
//!
//! # Module Structure
//!
//! - `model`: Core domain models (`Persona`, `Message`, `MessageType`)
//! - `request`: Creation and partial-update request types
//! - `preset`: Default personas seeded on first run
//! - `store`: The persona collection store (`PersonaStore`)

mod model;
mod preset;
mod request;
mod store;

// Re-export public API
pub use model::{Message, MessageType, Persona};
pub use preset::default_personas;
pub use request::{MessagePatch, NewMessage, NewPersona, PersonaPatch};
pub use store::{PERSONAS_KEY, PersonaDocument, PersonaStore, PersonaSubscriber};
