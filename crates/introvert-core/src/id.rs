//! Identifier generation for store entities.
//!
//! Personas and messages are keyed by opaque strings. UUID v4 gives
//! negligible collision probability at human-driven event rates with no
//! coordination or ordering guarantee.

use uuid::Uuid;

/// Generates a unique identifier string.
///
/// Returns the canonical hyphenated rendering of a freshly generated
/// UUID v4. Consumes entropy; has no other side effects.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
