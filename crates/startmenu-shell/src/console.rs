//! Terminal stand-ins for the window manager and activity starts.

use startmenu_core::{
    AppEntry, Error, Launcher, ListLayout, OverlayVisibility, Rect, Result, WindowParams,
    WindowSurface,
};
use std::sync::{Arc, Mutex};
use url::Url;

/// Text of the simulated search field, shared with the input loop
#[derive(Debug, Clone, Default)]
pub struct SearchField(Arc<Mutex<String>>);

impl SearchField {
    pub fn text(&self) -> String {
        self.0.lock().map(|text| text.clone()).unwrap_or_default()
    }

    pub fn set(&self, value: &str) {
        if let Ok(mut text) = self.0.lock() {
            value.clone_into(&mut text);
        }
    }

    pub fn clear(&self) {
        self.set("");
    }
}

/// Prints what a real overlay window would display
#[derive(Debug)]
pub struct ConsoleSurface {
    can_draw: bool,
    keyboard: bool,
    display: (u32, u32),
    visibility: OverlayVisibility,
    attached: bool,
    search: SearchField,
}

impl ConsoleSurface {
    pub fn new(can_draw: bool, keyboard: bool, display: (u32, u32), search: SearchField) -> Self {
        Self {
            can_draw,
            keyboard,
            display,
            visibility: OverlayVisibility::Gone,
            attached: false,
            search,
        }
    }

    fn visible(&self) -> bool {
        self.visibility == OverlayVisibility::Visible
    }
}

impl WindowSurface for ConsoleSurface {
    fn can_draw_overlays(&self) -> bool {
        self.can_draw
    }

    fn has_keyboard(&self) -> bool {
        self.keyboard
    }

    fn display_size(&self) -> Option<(u32, u32)> {
        Some(self.display)
    }

    fn add_view(&mut self, params: &WindowParams) -> Result<()> {
        if self.attached {
            return Err(Error::Surface("view already attached".to_string()));
        }
        self.attached = true;
        println!(
            "[window] added {:?}/{:?} search box: {}",
            params.gravity, params.layout, params.show_search_box
        );
        Ok(())
    }

    fn remove_view(&mut self) {
        self.attached = false;
        println!("[window] removed");
    }

    fn set_visibility(&mut self, visibility: OverlayVisibility) {
        self.visibility = visibility;
        println!("[window] {visibility:?}");
    }

    fn set_outside_click_dismiss(&mut self, _enabled: bool) {}

    fn focus_search(&mut self) {
        println!("[window] search field focused");
    }

    fn clear_query(&mut self) {
        self.search.clear();
    }

    fn first_visible_position(&self) -> usize {
        0
    }

    fn set_columns(&mut self, _columns: usize) {}

    fn set_entries(&mut self, layout: ListLayout, entries: &[AppEntry]) {
        if !self.visible() {
            return;
        }
        println!("[list:{layout:?}] {} apps", entries.len());
        for entry in entries {
            println!("  {}  ({})", entry.label, entry.component);
        }
    }

    fn set_selection(&mut self, _position: usize) {}

    fn set_placeholder(&mut self, text: Option<&str>) {
        if let Some(text) = text
            && self.visible()
        {
            println!("  {text}");
        }
    }
}

/// Reports activity starts instead of performing them
#[derive(Debug)]
pub struct ConsoleLauncher {
    web_search: bool,
}

impl ConsoleLauncher {
    pub fn new(web_search: bool) -> Self {
        Self { web_search }
    }
}

impl Launcher for ConsoleLauncher {
    fn launch_app(&mut self, entry: &AppEntry) -> Result<()> {
        println!("[launch] {}", entry.component);
        Ok(())
    }

    fn web_search(&mut self, query: &str) -> Result<()> {
        if !self.web_search {
            return Err(Error::NoHandler("web search".to_string()));
        }
        println!("[launch] web search for {query:?}");
        Ok(())
    }

    fn open_url(&mut self, url: &Url) -> Result<()> {
        println!("[launch] {url}");
        Ok(())
    }

    fn start_companion(&mut self, bounds: Option<Rect>) -> Result<()> {
        tracing::debug!("Companion surface at {:?}", bounds);
        Ok(())
    }
}
