//! Outline settings
//!
//! Loaded from a JSON file next to the host's other settings. Every field has
//! a default so partial or missing files still produce a usable value.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the outline subsystem
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutlineSettings {
    /// Maximum number of undo entries kept per document
    pub max_undo_entries: usize,
    /// Reject malformed records in bulk imports instead of trusting them
    pub validate_imports: bool,
    /// Expanded state of new bookmarks that do not specify one
    pub default_expanded: bool,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            max_undo_entries: 100,
            validate_imports: true,
            default_expanded: true,
        }
    }
}

impl OutlineSettings {
    /// Load settings from disk, or return defaults if the file is missing or unreadable
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    target: "outline::settings",
                    "Failed to read settings file {}, using defaults: {}",
                    path.display(),
                    e
                );
                return Self::default();
            }
        };
        match serde_json::from_str::<OutlineSettings>(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    target: "outline::settings",
                    "Failed to parse settings file, using defaults: {}",
                    e
                );
                Self::default()
            }
        }
    }

    /// Save settings to disk, creating parent directories as needed
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }
}
