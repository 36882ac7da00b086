use crate::Result;
use serde::{Deserialize, Serialize};
use startmenu_types::{ListLayout, Position};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub menu: MenuConfig,

    #[serde(default)]
    pub taskbar: TaskbarConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Start menu window preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuConfig {
    #[serde(default)]
    pub position: Position,

    /// Fast-scroll thumb enabled and always visible
    #[serde(default)]
    pub scrollbar: bool,

    #[serde(default)]
    pub layout: ListLayout,

    /// The menu doubles as the home screen, so no companion surface is needed
    #[serde(default)]
    pub on_home_screen: bool,
}

/// Taskbar-wide state shared with the start menu
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskbarConfig {
    /// Cleared when the overlay permission is missing at startup
    #[serde(default = "default_active")]
    pub active: bool,

    /// Web-search fallback hides the whole taskbar instead of just the menu
    #[serde(default)]
    pub hide_taskbar: bool,
}

fn default_active() -> bool {
    true
}

impl Default for TaskbarConfig {
    fn default() -> Self {
        Self {
            active: default_active(),
            hide_taskbar: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Search page the fallback appends `q=<query>` to
    #[serde(default = "default_engine_url")]
    pub engine_url: String,
}

fn default_engine_url() -> String {
    "https://www.google.com/search".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engine_url: default_engine_url(),
        }
    }
}
