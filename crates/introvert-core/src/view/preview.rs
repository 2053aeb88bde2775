//! Last-message previews and relative time labels.

use crate::persona::Persona;

/// Maximum preview length in characters before truncation.
pub const PREVIEW_LENGTH: usize = 30;

/// Shown in place of a preview when the thread is empty.
pub const NO_MESSAGES_PLACEHOLDER: &str = "No messages yet";

/// One-line preview of a persona's chronologically last message.
///
/// Content longer than [`PREVIEW_LENGTH`] characters is cut at a char
/// boundary and suffixed with an ellipsis marker; shorter content is
/// returned unmodified. An empty thread yields the placeholder text.
pub fn last_message_preview(persona: &Persona) -> String {
    let Some(message) = persona.last_message() else {
        return NO_MESSAGES_PLACEHOLDER.to_string();
    };
    if message.content.chars().count() > PREVIEW_LENGTH {
        let head: String = message.content.chars().take(PREVIEW_LENGTH).collect();
        format!("{head}...")
    } else {
        message.content.clone()
    }
}

/// Human-readable "time ago" label for a timestamp.
///
/// Pure function of the two epoch-millisecond inputs, so display code
/// passes its own clock and tests pass fixed values. A timestamp in the
/// future clamps to "just now".
pub fn time_ago(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = (now_ms - timestamp_ms).max(0) / 1_000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 60 {
        "just now".to_string()
    } else if minutes < 2 {
        "1 minute ago".to_string()
    } else if minutes < 60 {
        format!("{minutes} minutes ago")
    } else if hours < 2 {
        "about 1 hour ago".to_string()
    } else if hours < 24 {
        format!("about {hours} hours ago")
    } else if days < 2 {
        "1 day ago".to_string()
    } else if days < 30 {
        format!("{days} days ago")
    } else if days < 60 {
        "about 1 month ago".to_string()
    } else if days < 365 {
        format!("{} months ago", days / 30)
    } else if days < 730 {
        "about 1 year ago".to_string()
    } else {
        format!("{} years ago", days / 365)
    }
}
