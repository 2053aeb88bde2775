//! Persona and message creation/update request models.
//!
//! Mutations enter the store through these types rather than through
//! entity structs, so that invariants stay enforceable: ids are always
//! allocated by the store, patches merge field by field, and a patch can
//! never overwrite an `id` or a message's creation `timestamp`.
//!
//! Validation lives here, for the UI boundary. The store itself never
//! validates; it accepts whatever it is handed.

use serde::{Deserialize, Serialize};

use super::model::{Message, MessageType, Persona};
use crate::id::generate_id;

/// Request to create a new persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPersona {
    /// Display name (required non-empty at the UI boundary)
    pub name: String,

    /// Optional hex color tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Optional avatar image URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Optional glyph tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,

    /// Initial favorite flag
    #[serde(default)]
    pub favorite: bool,
}

impl NewPersona {
    /// Creates a request with just a name, everything else defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            avatar: None,
            emoji: None,
            favorite: false,
        }
    }

    /// Validate the request and return an error message if invalid.
    ///
    /// Callers at the UI boundary check this before submitting; the
    /// store does not.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required and cannot be empty".to_string());
        }
        Ok(())
    }

    /// Convert this request into a Persona, always generating a new id
    /// and an empty message list.
    pub fn into_persona(self) -> Persona {
        Persona {
            id: generate_id(),
            name: self.name,
            color: self.color,
            avatar: self.avatar,
            emoji: self.emoji,
            favorite: self.favorite,
            messages: Vec::new(),
        }
    }
}

/// Partial update for a persona.
///
/// `None` means "leave the field alone". For the clearable optional
/// fields, `Some(None)` clears the stored value. `id` and `messages`
/// are deliberately unreachable through a patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

impl PersonaPatch {
    /// Merges the patch into `persona`, field by field.
    pub fn apply(&self, persona: &mut Persona) {
        if let Some(name) = &self.name {
            persona.name = name.clone();
        }
        if let Some(color) = &self.color {
            persona.color = color.clone();
        }
        if let Some(avatar) = &self.avatar {
            persona.avatar = avatar.clone();
        }
        if let Some(emoji) = &self.emoji {
            persona.emoji = emoji.clone();
        }
        if let Some(favorite) = self.favorite {
            persona.favorite = favorite;
        }
    }

    /// Patch that renames the persona.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Request to append a new message to a persona's thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    /// Free-text content (required non-empty at the UI boundary)
    pub content: String,

    /// Message kind
    #[serde(rename = "type")]
    pub message_type: MessageType,

    /// Creation time override; defaults to "now" at insertion when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Initial checked state, for checkbox entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl NewMessage {
    /// Creates a request for a plain message of the given kind.
    pub fn new(content: impl Into<String>, message_type: MessageType) -> Self {
        Self {
            content: content.into(),
            message_type,
            timestamp: None,
            checked: None,
        }
    }

    /// Validate the request and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.content.trim().is_empty() {
            return Err("Message text cannot be empty".to_string());
        }
        Ok(())
    }

    /// Convert this request into a Message, generating a new id and
    /// falling back to `now` (epoch millis) when no timestamp was given.
    pub fn into_message(self, now: i64) -> Message {
        Message {
            id: generate_id(),
            content: self.content,
            message_type: self.message_type,
            timestamp: self.timestamp.unwrap_or(now),
            checked: self.checked,
        }
    }
}

/// Partial update for a message.
///
/// `id` and `timestamp` are not patchable: the id is the identity and
/// the timestamp is creation time, which edits never move.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl MessagePatch {
    /// Merges the patch into `message`, field by field.
    pub fn apply(&self, message: &mut Message) {
        if let Some(content) = &self.content {
            message.content = content.clone();
        }
        if let Some(message_type) = self.message_type {
            message.message_type = message_type;
        }
        if let Some(checked) = self.checked {
            message.checked = Some(checked);
        }
    }

    /// Patch that sets the checked state of a checkbox entry.
    pub fn set_checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Self::default()
        }
    }
}
