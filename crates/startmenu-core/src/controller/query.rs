use super::StartMenu;
use crate::web_search::search_web;
use startmenu_types::Signal;
use tracing::{debug, info, warn};

/// Search field state. Reset whenever the menu settles hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    /// Current filter text, `None` until the user types
    pub text: Option<String>,

    /// Set by the first submit; later submits are ignored until reset
    pub submitted: bool,
}

impl QueryState {
    /// Claim the one-shot submit. Returns `false` if already claimed.
    pub fn try_submit(&mut self) -> bool {
        if self.submitted {
            return false;
        }
        self.submitted = true;
        true
    }

    pub fn reset(&mut self) {
        self.text = None;
        self.submitted = false;
    }
}

impl StartMenu {
    fn has_search_box(&self) -> bool {
        self.window.is_some_and(|params| params.show_search_box)
    }

    pub(super) fn handle_query_changed(&mut self, query: String) {
        if !self.has_search_box() {
            return;
        }

        self.query.text = Some(query.clone());
        self.pipeline.refresh(Some(query));
    }

    /// Enter in the search field: launch the top entry, or search the web
    /// when nothing matched. Fires at most once per shown menu.
    pub(super) fn handle_query_submitted(&mut self, query: &str) {
        if !self.has_search_box() {
            return;
        }

        if !self.query.try_submit() {
            debug!("Ignoring repeated submit for {:?}", query);
            return;
        }

        if let Some(first) = self.entries.first() {
            info!("Launching {} from submitted query", first.component);
            if let Err(e) = self.launcher.launch_app(first) {
                warn!("Failed to launch {}: {}", first.component, e);
            }
            self.bus.emit(Signal::HideStartMenu);
            return;
        }

        if search_web(
            self.launcher.as_mut(),
            &self.config.search.engine_url,
            query,
        ) {
            let signal = if self.config.taskbar.hide_taskbar {
                Signal::HideTaskbar
            } else {
                Signal::HideStartMenu
            };
            self.bus.emit(signal);
        } else {
            debug!("No web search handler for {:?}", query);
        }
    }

    pub(super) fn handle_search_focus(&mut self, focused: bool) {
        if !focused && self.has_search_box() {
            self.bus.emit(Signal::HideStartMenu);
        }
    }
}
