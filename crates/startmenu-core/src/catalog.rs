//! Installed-app enumeration seam.
//!
//! The package service is an external collaborator; the start menu only needs
//! the launcher entry points and a way to load their icons.

use crate::Result;
use serde::{Deserialize, Serialize};
use startmenu_types::{AppEntry, Bitmap};
use std::path::Path;

/// A main/launcher entry point reported by the package service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherActivity {
    pub package: String,
    /// Fully-qualified activity class
    pub activity: String,
    pub label: String,
}

impl LauncherActivity {
    #[must_use]
    pub fn new(package: &str, activity: &str, label: &str) -> Self {
        Self {
            package: package.to_string(),
            activity: activity.to_string(),
            label: label.to_string(),
        }
    }

    /// Build the menu entry for this activity with an already-loaded icon
    #[must_use]
    pub fn to_entry(&self, icon: Bitmap) -> AppEntry {
        AppEntry::new(&self.package, &self.activity, &self.label, icon)
    }
}

/// Package-manager capability used by the refresh pipeline.
///
/// Both calls may block; they are only made from the blocking pool.
pub trait AppCatalog: Send + Sync {
    /// Every activity the platform considers a launcher entry point.
    ///
    /// # Errors
    ///
    /// Returns an error if the package service cannot be queried.
    fn launcher_activities(&self) -> Result<Vec<LauncherActivity>>;

    fn load_icon(&self, activity: &LauncherActivity) -> Bitmap;
}

/// Catalog backed by a fixed list, loaded from JSON or built in code
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    activities: Vec<LauncherActivity>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(activities: Vec<LauncherActivity>) -> Self {
        Self { activities }
    }

    /// Load a JSON array of activities. A missing file is an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let activities = serde_json::from_str(&content)?;
        Ok(Self { activities })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

impl AppCatalog for StaticCatalog {
    fn launcher_activities(&self) -> Result<Vec<LauncherActivity>> {
        Ok(self.activities.clone())
    }

    fn load_icon(&self, _activity: &LauncherActivity) -> Bitmap {
        Bitmap::default()
    }
}
