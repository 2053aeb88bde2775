//! Default persona presets.
//!
//! Provides the fixed set of personas seeded into an empty store on
//! first run. Seeding happens at most once per installation; see
//! `PersonaStore::initialize_default_personas`.

use super::request::NewPersona;

/// Returns the default persona set for a fresh installation, in seed order.
///
/// Each seed starts with an empty thread and `favorite: false`; ids are
/// allocated at insertion time like any user-created persona.
pub fn default_personas() -> Vec<NewPersona> {
    vec![
        NewPersona {
            name: "Creative".to_string(),
            color: Some("#3B82F6".to_string()),
            avatar: None,
            emoji: Some("🎨".to_string()),
            favorite: false,
        },
        NewPersona {
            name: "Work".to_string(),
            color: Some("#EF4444".to_string()),
            avatar: None,
            emoji: Some("👔".to_string()),
            favorite: false,
        },
        NewPersona {
            name: "Home Improvement".to_string(),
            color: Some("#8B5CF6".to_string()),
            avatar: None,
            emoji: Some("🏠".to_string()),
            favorite: false,
        },
        NewPersona {
            name: "Bookworm".to_string(),
            color: Some("#22C55E".to_string()),
            avatar: None,
            emoji: Some("📚".to_string()),
            favorite: false,
        },
    ]
}
