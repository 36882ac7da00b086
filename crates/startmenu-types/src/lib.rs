//! Shared types for the start menu overlay components.
//!
//! This crate provides the value types used across startmenu-core and
//! startmenu-shell. Types that cross a config or log boundary are serializable.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

/// Signals exchanged between the start menu and the rest of the taskbar.
///
/// Every signal is global and carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    /// Flip the start menu between shown and hidden
    ToggleStartMenu,
    /// Hide the start menu if it is showing
    HideStartMenu,
    /// Hide the whole taskbar (which also hides the start menu)
    HideTaskbar,
    /// Ask the companion surface to finish
    FinishInvisibleActivity,
}

impl Signal {
    /// Wire name used by the taskbar for this signal
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Signal::ToggleStartMenu => "TOGGLE_START_MENU",
            Signal::HideStartMenu => "HIDE_START_MENU",
            Signal::HideTaskbar => "HIDE_TASKBAR",
            Signal::FinishInvisibleActivity => "FINISH_INVISIBLE_ACTIVITY",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// Overlay visibility as seen by the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayVisibility {
    /// Not laid out at all
    #[default]
    Gone,
    /// Laid out and interactive
    Visible,
    /// Invisible but still laid out, waiting for the companion surface to finish
    FadingOut,
}

impl OverlayVisibility {
    /// Whether a toggle should show the menu
    #[must_use]
    pub fn is_hidden(self) -> bool {
        self == OverlayVisibility::Gone
    }
}

/// Screen anchor for the start menu, as stored in preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    BottomLeft,
    BottomVerticalLeft,
    BottomRight,
    BottomVerticalRight,
}

impl Position {
    /// Parse a stored preference string, `None` if it names no known layout
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bottom_left" => Some(Position::BottomLeft),
            "bottom_vertical_left" => Some(Position::BottomVerticalLeft),
            "bottom_right" => Some(Position::BottomRight),
            "bottom_vertical_right" => Some(Position::BottomVerticalRight),
            _ => None,
        }
    }

    #[must_use]
    pub fn gravity(self) -> Gravity {
        match self {
            Position::BottomLeft | Position::BottomVerticalLeft => Gravity::BottomLeft,
            Position::BottomRight | Position::BottomVerticalRight => Gravity::BottomRight,
        }
    }

    /// Which inflated layout variant goes with this anchor
    #[must_use]
    pub fn menu_layout(self) -> MenuLayout {
        match self {
            Position::BottomLeft => MenuLayout::Left,
            Position::BottomVerticalLeft => MenuLayout::VerticalLeft,
            Position::BottomRight => MenuLayout::Right,
            Position::BottomVerticalRight => MenuLayout::VerticalRight,
        }
    }
}

/// Unknown position strings fall back to the default anchor instead of
/// failing the whole config load.
impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Position::parse(&raw).unwrap_or_default())
    }
}

/// Window gravity on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    BottomLeft,
    BottomRight,
}

/// Layout variant of the menu window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuLayout {
    Left,
    VerticalLeft,
    Right,
    VerticalRight,
}

/// How the app list is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListLayout {
    #[default]
    List,
    Grid,
}

/// Screen rectangle in pixels, `[left, top, right, bottom]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Rect {
    /// A 1x1 rectangle just past the bottom-right corner of a display
    #[must_use]
    pub fn offscreen(width: u32, height: u32) -> Self {
        Self {
            left: width,
            top: height,
            right: width.saturating_add(1),
            bottom: height.saturating_add(1),
        }
    }
}

/// Decoded icon pixels. Cloning shares the pixel buffer.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl Bitmap {
    #[must_use]
    pub fn new(width: u32, height: u32, rgba: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            rgba: rgba.into(),
        }
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// One launchable app as shown in the start menu.
///
/// Entries are rebuilt on every refresh and compared by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub package: String,
    /// Flattened `package/activity` component name
    pub component: String,
    pub label: String,
    pub icon: Bitmap,
    /// Carried for the list adapter; the start menu never sets it
    pub flag: bool,
}

impl AppEntry {
    #[must_use]
    pub fn new(package: &str, activity: &str, label: &str, icon: Bitmap) -> Self {
        Self {
            package: package.to_string(),
            component: component_name(package, activity),
            label: label.to_string(),
            icon,
            flag: false,
        }
    }
}

/// Flatten a package and activity class into a component identifier
#[must_use]
pub fn component_name(package: &str, activity: &str) -> String {
    format!("{package}/{activity}")
}
