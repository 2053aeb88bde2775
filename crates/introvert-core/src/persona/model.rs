//! Persona domain model.
//!
//! A persona is a user-defined labeled conversation thread. Each persona
//! exclusively owns an ordered list of typed messages; ownership is a
//! strict tree, so a message belongs to exactly one persona and moving a
//! message between personas is delete + recreate.

use serde::{Deserialize, Serialize};

/// The fixed set of message kinds a thread can contain.
///
/// The type determines rendering and ordering defaults on the consuming
/// side, not the storage shape. Serialized camelCase (`"listItem"`,
/// `"header1"`, ...) to match the persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    /// A question entry from the user.
    Question,
    /// An answer entry.
    Answer,
    /// Free-form paragraph text.
    Paragraph,
    /// Top-level section header.
    Header1,
    /// Second-level section header.
    Header2,
    /// A bulleted/numbered list entry.
    ListItem,
    /// A checkable task entry.
    Checkbox,
}

/// A single typed content entry within a persona's thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier within the owning persona.
    pub id: String,
    /// Free-text content. May be empty in stored data; the UI boundary
    /// disallows blank sends.
    pub content: String,
    /// Message kind.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Creation time as epoch milliseconds. Governs chronological
    /// ordering and is never updated on edit.
    pub timestamp: i64,
    /// Checked state; only meaningful when `message_type` is `Checkbox`.
    /// Absent means open/unchecked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl Message {
    /// Returns true for a checkbox entry that has not been checked off.
    pub fn is_open_task(&self) -> bool {
        self.message_type == MessageType::Checkbox && !self.checked.unwrap_or(false)
    }
}

/// A user-defined labeled conversation thread.
///
/// The `id` is unique across the whole persona collection for the
/// lifetime of the store. A persona with zero messages is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Unique identifier (UUID format), immutable after creation.
    pub id: String,
    /// Display label, user-editable.
    pub name: String,
    /// Optional hex color tag used for theming/identification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Optional URI reference to an avatar image. The persona owns a
    /// copy of the reference, not the image data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Optional short glyph tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Favorite flag; affects sort order only.
    #[serde(default)]
    pub favorite: bool,
    /// Owned messages. Insertion order is the canonical order.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Persona {
    /// Returns the most recently appended message, if any.
    ///
    /// Messages are appended in send order, so the last element is the
    /// chronologically last entry.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Timestamp of the last message, or 0 for an empty thread.
    ///
    /// The 0 sentinel makes messageless personas sort after any persona
    /// with real activity.
    pub fn last_activity(&self) -> i64 {
        self.last_message().map(|m| m.timestamp).unwrap_or(0)
    }
}
