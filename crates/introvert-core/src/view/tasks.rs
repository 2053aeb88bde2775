//! Open-task aggregation.
//!
//! An open task is a checkbox message that has not been checked off.
//! The aggregation feeds both the summary badge on the persona list and
//! the dedicated task listing, grouped by owning persona.

use serde::Serialize;

use crate::persona::Persona;

/// A single open task lifted out of a persona's thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenTask {
    /// The underlying message id, usable for toggle/delete calls.
    pub id: String,
    pub content: String,
    pub timestamp: i64,
}

/// All open tasks of one persona, with the display fields the task
/// listing needs from the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenTaskGroup {
    pub persona_id: String,
    pub persona_name: String,
    pub persona_color: Option<String>,
    pub persona_emoji: Option<String>,
    /// Open tasks in original message order.
    pub tasks: Vec<OpenTask>,
}

/// Groups every open task by its owning persona.
///
/// Personas without open tasks produce no group. Groups follow the
/// persona collection order; tasks within a group follow the thread's
/// insertion order.
pub fn open_tasks(personas: &[Persona]) -> Vec<OpenTaskGroup> {
    personas
        .iter()
        .filter_map(|persona| {
            let tasks: Vec<OpenTask> = persona
                .messages
                .iter()
                .filter(|message| message.is_open_task())
                .map(|message| OpenTask {
                    id: message.id.clone(),
                    content: message.content.clone(),
                    timestamp: message.timestamp,
                })
                .collect();
            if tasks.is_empty() {
                return None;
            }
            Some(OpenTaskGroup {
                persona_id: persona.id.clone(),
                persona_name: persona.name.clone(),
                persona_color: persona.color.clone(),
                persona_emoji: persona.emoji.clone(),
                tasks,
            })
        })
        .collect()
}

/// Total number of open tasks across all personas. Drives the badge on
/// the persona list.
pub fn open_task_count(personas: &[Persona]) -> usize {
    personas
        .iter()
        .map(|persona| {
            persona
                .messages
                .iter()
                .filter(|message| message.is_open_task())
                .count()
        })
        .sum()
}

/// The personas that currently have at least one open task.
pub fn personas_with_open_tasks(personas: &[Persona]) -> Vec<&Persona> {
    personas
        .iter()
        .filter(|persona| persona.messages.iter().any(|message| message.is_open_task()))
        .collect()
}
