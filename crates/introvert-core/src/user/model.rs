//! User profile domain model.

use serde::{Deserialize, Serialize};

/// The singleton user profile: one record per installed instance.
///
/// Carries no identifier; both fields default to absent and there is no
/// delete operation, so a profile always exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional avatar image URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial update for the user profile.
///
/// `None` leaves a field alone; `Some(None)` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Option<String>>,
}

impl UserPatch {
    /// Merges the patch into `profile`, field by field.
    pub fn apply(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(avatar) = &self.avatar {
            profile.avatar = avatar.clone();
        }
    }

    /// Patch that sets the display name.
    pub fn set_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(Some(name.into())),
            ..Self::default()
        }
    }

    /// Patch that sets the avatar URI.
    pub fn set_avatar(avatar: impl Into<String>) -> Self {
        Self {
            avatar: Some(Some(avatar.into())),
            ..Self::default()
        }
    }
}
