//! Platform capabilities the start menu drives.
//!
//! `WindowSurface` stands in for the window manager plus the inflated menu
//! view, `Launcher` for activity starts. Both are injected so the controller
//! runs without a display.

use crate::Result;
use startmenu_types::{
    AppEntry, Gravity, ListLayout, MenuLayout, OverlayVisibility, Position, Rect,
};
use url::Url;

/// Layout parameters for the overlay window.
///
/// The window always wraps its content, is translucent and sits in the
/// overlay layer; only the fields below vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowParams {
    pub gravity: Gravity,
    pub layout: MenuLayout,
    /// `false` keeps the overlay from stealing focus when nothing can be typed
    pub focusable: bool,
    /// Let the IME interact with the window independently of its focusability
    pub alt_focusable_im: bool,
    pub show_search_box: bool,
    /// Fast-scroll enabled and always visible
    pub scrollbar: bool,
}

impl WindowParams {
    #[must_use]
    pub fn new(position: Position, has_keyboard: bool, scrollbar: bool) -> Self {
        Self {
            gravity: position.gravity(),
            layout: position.menu_layout(),
            focusable: has_keyboard,
            alt_focusable_im: true,
            show_search_box: has_keyboard,
            scrollbar,
        }
    }
}

/// Window-manager and view capability for the overlay.
pub trait WindowSurface: Send {
    /// Whether the "draw over other apps" grant is present
    fn can_draw_overlays(&self) -> bool;

    /// Whether a physical or virtual keyboard is attached
    fn has_keyboard(&self) -> bool;

    /// Size of the default display in pixels, if known
    fn display_size(&self) -> Option<(u32, u32)>;

    /// Inflate the menu and add it to the window manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the window manager rejects the view.
    fn add_view(&mut self, params: &WindowParams) -> Result<()>;

    fn remove_view(&mut self);

    fn set_visibility(&mut self, visibility: OverlayVisibility);

    /// Attach or detach the click handler on the area around the list
    fn set_outside_click_dismiss(&mut self, enabled: bool);

    fn focus_search(&mut self);

    /// Empty the search field without reporting a query change
    fn clear_query(&mut self);

    /// Index of the first row currently on screen
    fn first_visible_position(&self) -> usize;

    fn set_columns(&mut self, columns: usize);

    /// Replace the list's backing data
    fn set_entries(&mut self, layout: ListLayout, entries: &[AppEntry]);

    /// Scroll so that `position` is the first visible row
    fn set_selection(&mut self, position: usize);

    fn set_placeholder(&mut self, text: Option<&str>);
}

/// Activity-start capability.
///
/// Every method reports `Error::NoHandler` when nothing on the device can
/// handle the request.
pub trait Launcher: Send {
    /// Run the default action of an app entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the component cannot be started.
    fn launch_app(&mut self, entry: &AppEntry) -> Result<()>;

    /// Hand the query to the platform's web-search action.
    ///
    /// # Errors
    ///
    /// Returns an error if no activity handles web search.
    fn web_search(&mut self, query: &str) -> Result<()>;

    /// Open a URL in whatever handles it.
    ///
    /// # Errors
    ///
    /// Returns an error if no activity handles the URL.
    fn open_url(&mut self, url: &Url) -> Result<()>;

    /// Start the invisible companion surface, optionally at fixed bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the companion cannot be started.
    fn start_companion(&mut self, bounds: Option<Rect>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_with_keyboard_are_focusable() {
        let params = WindowParams::new(Position::BottomRight, true, false);
        assert!(params.focusable);
        assert!(params.alt_focusable_im);
        assert!(params.show_search_box);
        assert_eq!(params.gravity, Gravity::BottomRight);
        assert_eq!(params.layout, MenuLayout::Right);
    }

    #[test]
    fn test_params_without_keyboard_never_take_focus() {
        let params = WindowParams::new(Position::BottomVerticalLeft, false, true);
        assert!(!params.focusable);
        assert!(params.alt_focusable_im);
        assert!(!params.show_search_box);
        assert!(params.scrollbar);
        assert_eq!(params.gravity, Gravity::BottomLeft);
        assert_eq!(params.layout, MenuLayout::VerticalLeft);
    }
}
