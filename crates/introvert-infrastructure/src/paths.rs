//! Unified path management for introvert-chat data files.
//!
//! All persisted documents live under a single per-user data directory.
//! Tests inject a temporary base directory instead.

use std::path::{Path, PathBuf};

use introvert_core::error::{Result, StoreError};

/// Application directory name under the platform data directory.
const APP_DIR: &str = "introvert-chat";

/// Unified path management for introvert-chat.
///
/// # Directory Structure
///
/// ```text
/// ~/.local/share/introvert-chat/        # Data directory (platform dependent)
/// ├── introvert-chat-personas.json      # Persona collection document
/// └── introvert-chat-user.json          # User profile document
/// ```
pub struct IntrovertPaths {
    base_dir: Option<PathBuf>,
}

impl IntrovertPaths {
    /// Creates a paths resolver.
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Override for the data directory (for testing);
    ///   `None` resolves the platform default.
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the data directory all documents are stored under.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the platform data directory
    /// cannot be determined.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| StoreError::config("Cannot find platform data directory"))
    }

    /// Returns the file path for a storage key.
    pub fn document_file(&self, key: &str) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(format!("{key}.json")))
    }
}

impl Default for IntrovertPaths {
    fn default() -> Self {
        Self::new(None)
    }
}
