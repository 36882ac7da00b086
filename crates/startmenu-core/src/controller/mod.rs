mod query;

pub use query::QueryState;

use crate::Result;
use crate::catalog::AppCatalog;
use crate::config::Config;
use crate::pipeline::RefreshPipeline;
use crate::signals::SignalBus;
use crate::surface::{Launcher, WindowParams, WindowSurface};
use startmenu_types::{AppEntry, ListLayout, OverlayVisibility, Rect, Signal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// How long the menu stays invisible-but-laid-out before it is gone
pub const HIDE_DELAY: Duration = Duration::from_millis(250);

/// Column count used for the grid layout
pub const GRID_COLUMNS: usize = 3;

/// Shown when a refresh delivers nothing
pub const NO_APPS_FOUND: &str = "No apps found. Press Enter to search the web.";

/// Everything that reaches the menu's controlling task
#[derive(Debug, Clone)]
pub enum MenuEvent {
    /// Inbound taskbar signal
    Signal(Signal),

    /// Search field text changed
    QueryChanged { query: String },

    /// Enter pressed in the search field
    QuerySubmitted { query: String },

    SearchFocusChanged { focused: bool },

    /// Tap on the menu background while the dismiss handler is attached
    OutsideClicked,

    /// Rotation, screen size or keyboard changed
    ConfigurationChanged,

    ConfigReloaded(Box<Config>),

    /// A refresh pass finished
    AppsLoaded {
        generation: u64,
        entries: Vec<AppEntry>,
    },

    /// A refresh pass could not enumerate apps; the list is left as is
    RefreshFailed { generation: u64 },

    /// The hide delay elapsed
    HideSettled { epoch: u64 },

    Shutdown,
}

/// Result of bringing the menu up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    Started,
    /// Overlay permission missing; the taskbar has been marked inactive
    Disabled,
}

/// Platform services the menu is wired to
pub struct Services {
    pub surface: Box<dyn WindowSurface>,
    pub launcher: Box<dyn Launcher>,
    pub catalog: Arc<dyn AppCatalog>,
    pub bus: SignalBus,
}

#[derive(Debug)]
struct HideTimer {
    epoch: u64,
    token: CancellationToken,
}

/// The start menu overlay controller.
///
/// Owned by a single task; every mutation of visibility, list data and
/// query state happens in [`StartMenu::process`] or the methods it calls.
pub struct StartMenu {
    config: Config,
    config_path: Option<PathBuf>,

    surface: Box<dyn WindowSurface>,
    launcher: Box<dyn Launcher>,
    bus: SignalBus,
    pipeline: RefreshPipeline,

    /// Sender handed to background work so results come back through `process`
    events: UnboundedSender<MenuEvent>,

    /// Parameters of the window currently added, `None` when there is none
    window: Option<WindowParams>,
    visibility: OverlayVisibility,
    query: QueryState,

    /// Backing data of the list as last delivered
    entries: Vec<AppEntry>,
    placeholder: Option<&'static str>,

    hide_timer: Option<HideTimer>,
    hide_epoch: u64,

    /// Task forwarding bus signals into the event channel
    receivers: Option<JoinHandle<()>>,
    torn_down: bool,
}

impl StartMenu {
    /// Create the controller and the receiver its events arrive on.
    ///
    /// `config_path` is where the inactive flag is persisted on permission
    /// denial; `None` keeps the change in memory only.
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        services: Services,
    ) -> (Self, UnboundedReceiver<MenuEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let pipeline = RefreshPipeline::new(services.catalog, events.clone());

        (
            Self {
                config,
                config_path,
                surface: services.surface,
                launcher: services.launcher,
                bus: services.bus,
                pipeline,
                events,
                window: None,
                visibility: OverlayVisibility::Gone,
                query: QueryState::default(),
                entries: Vec::new(),
                placeholder: None,
                hide_timer: None,
                hide_epoch: 0,
                receivers: None,
                torn_down: false,
            },
            events_rx,
        )
    }

    /// Build the overlay window, start listening for signals and kick off
    /// the first refresh.
    ///
    /// A missing overlay permission is not an error: the taskbar is marked
    /// inactive and `Startup::Disabled` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the window manager rejects the view.
    pub fn initialize(&mut self) -> Result<Startup> {
        if !self.surface.can_draw_overlays() {
            warn!("Overlay permission missing, disabling taskbar");
            self.disable_feature();
            return Ok(Startup::Disabled);
        }

        self.draw()?;
        self.register_receivers();
        self.pipeline.refresh(None);

        info!("Start menu ready");
        Ok(Startup::Started)
    }

    /// Process events until shutdown, then tear down.
    pub async fn run(mut self, mut events: UnboundedReceiver<MenuEvent>) {
        while !self.torn_down {
            let Some(event) = events.recv().await else {
                break;
            };
            self.process(event);
        }
        self.teardown();
    }

    pub fn process(&mut self, event: MenuEvent) {
        if self.torn_down {
            trace!("Ignoring {:?} after teardown", event);
            return;
        }

        match event {
            MenuEvent::Signal(Signal::ToggleStartMenu) => self.toggle(),
            MenuEvent::OutsideClicked => {
                if self.visibility == OverlayVisibility::Visible {
                    self.toggle();
                }
            }
            MenuEvent::Signal(Signal::HideStartMenu) => self.hide(),
            MenuEvent::Signal(other) => trace!("Ignoring signal {}", other),
            MenuEvent::QueryChanged { query } => self.handle_query_changed(query),
            MenuEvent::QuerySubmitted { query } => self.handle_query_submitted(&query),
            MenuEvent::SearchFocusChanged { focused } => self.handle_search_focus(focused),
            MenuEvent::ConfigurationChanged => self.on_configuration_changed(),
            MenuEvent::ConfigReloaded(config) => {
                debug!("Config reloaded");
                self.config = *config;
            }
            MenuEvent::AppsLoaded {
                generation,
                entries,
            } => self.deliver(generation, entries),
            MenuEvent::RefreshFailed { generation } => {
                if self.pipeline.accept(generation) {
                    debug!("Refresh #{} failed, keeping the previous list", generation);
                }
            }
            MenuEvent::HideSettled { epoch } => self.settle_hidden(epoch),
            MenuEvent::Shutdown => self.teardown(),
        }
    }

    pub fn toggle(&mut self) {
        if self.visibility.is_hidden() {
            self.show();
        } else {
            self.hide();
        }
    }

    pub fn show(&mut self) {
        let Some(params) = self.window else {
            return;
        };
        if self.visibility == OverlayVisibility::Visible {
            return;
        }

        // Re-shown before the fade settled: the settle's resets still apply
        if self.cancel_hide_timer() {
            self.reset_search();
        }
        self.surface.set_outside_click_dismiss(true);
        self.set_visibility(OverlayVisibility::Visible);

        if !self.config.menu.on_home_screen {
            let bounds = self
                .surface
                .display_size()
                .map(|(width, height)| Rect::offscreen(width, height));
            if let Err(e) = self.launcher.start_companion(bounds) {
                warn!("Failed to start companion surface: {}", e);
            }
        }

        if params.show_search_box {
            self.surface.focus_search();
        }

        self.pipeline.refresh(None);
    }

    /// Make the menu invisible now and gone after [`HIDE_DELAY`].
    ///
    /// No-op unless the menu is visible.
    pub fn hide(&mut self) {
        if self.window.is_none() || self.visibility != OverlayVisibility::Visible {
            return;
        }

        self.surface.set_outside_click_dismiss(false);
        self.set_visibility(OverlayVisibility::FadingOut);
        self.bus.emit(Signal::FinishInvisibleActivity);
        self.schedule_settle();
    }

    /// Rebuild the window from scratch; focusability and layout depend on
    /// the keyboard and the stored position.
    pub fn on_configuration_changed(&mut self) {
        if self.window.take().is_none() {
            return;
        }

        debug!("Configuration changed, rebuilding start menu");
        self.surface.remove_view();
        self.cancel_hide_timer();
        self.query.reset();
        self.entries.clear();
        self.placeholder = None;

        if let Err(e) = self.draw() {
            error!("Failed to rebuild start menu: {}", e);
            return;
        }
        self.pipeline.refresh(None);
    }

    /// Remove the window and stop listening. Safe to call at any point,
    /// any number of times.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.cancel_hide_timer();
        self.pipeline.cancel();

        if self.window.take().is_some() {
            self.surface.remove_view();
        }

        if let Some(receivers) = self.receivers.take() {
            receivers.abort();
        }

        debug!("Start menu torn down");
    }

    /// Handle for posting events from outside the controlling task
    #[must_use]
    pub fn sender(&self) -> UnboundedSender<MenuEvent> {
        self.events.clone()
    }

    #[must_use]
    pub fn visibility(&self) -> OverlayVisibility {
        self.visibility
    }

    #[must_use]
    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        self.placeholder
    }

    #[must_use]
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a refresh pass is still outstanding
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.pipeline.is_refreshing()
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn draw(&mut self) -> Result<()> {
        let params = WindowParams::new(
            self.config.menu.position,
            self.surface.has_keyboard(),
            self.config.menu.scrollbar,
        );
        debug!("Adding start menu window: {:?}", params);

        self.surface.add_view(&params)?;
        self.window = Some(params);
        self.set_visibility(OverlayVisibility::Gone);
        Ok(())
    }

    fn set_visibility(&mut self, visibility: OverlayVisibility) {
        self.visibility = visibility;
        self.surface.set_visibility(visibility);
    }

    fn disable_feature(&mut self) {
        self.config.taskbar.active = false;

        if let Some(path) = &self.config_path
            && let Err(e) = self.config.save(path)
        {
            error!("Failed to persist disabled taskbar: {}", e);
        }
    }

    fn register_receivers(&mut self) {
        if self.receivers.is_some() {
            return;
        }

        let mut signals = self.bus.subscribe();
        let events = self.events.clone();
        self.receivers = Some(tokio::spawn(async move {
            loop {
                match signals.recv().await {
                    Ok(signal @ (Signal::ToggleStartMenu | Signal::HideStartMenu)) => {
                        if events.send(MenuEvent::Signal(signal)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Start menu missed {} signals", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));
    }

    fn schedule_settle(&mut self) {
        self.cancel_hide_timer();

        self.hide_epoch += 1;
        let epoch = self.hide_epoch;
        let token = CancellationToken::new();
        self.hide_timer = Some(HideTimer {
            epoch,
            token: token.clone(),
        });

        let deadline = tokio::time::Instant::now() + HIDE_DELAY;
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep_until(deadline) => {
                    let _ = events.send(MenuEvent::HideSettled { epoch });
                }
            }
        });
    }

    /// Returns `true` if a settle was pending
    fn cancel_hide_timer(&mut self) -> bool {
        match self.hide_timer.take() {
            Some(timer) => {
                timer.token.cancel();
                true
            }
            None => false,
        }
    }

    fn settle_hidden(&mut self, epoch: u64) {
        match &self.hide_timer {
            Some(timer) if timer.epoch == epoch => self.hide_timer = None,
            _ => {
                trace!("Dropping stale hide #{}", epoch);
                return;
            }
        }

        if self.window.is_none() || self.visibility != OverlayVisibility::FadingOut {
            return;
        }

        self.set_visibility(OverlayVisibility::Gone);
        self.reset_search();
    }

    /// Scroll to top, empty the search field and re-arm submit
    fn reset_search(&mut self) {
        self.surface.set_selection(0);
        self.surface.clear_query();
        self.query.reset();
    }

    fn deliver(&mut self, generation: u64, entries: Vec<AppEntry>) {
        if !self.pipeline.accept(generation) {
            debug!("Discarding superseded refresh #{}", generation);
            return;
        }
        if self.window.is_none() {
            return;
        }

        let layout = self.config.menu.layout;
        if layout == ListLayout::Grid {
            self.surface.set_columns(GRID_COLUMNS);
        }

        let position = self.surface.first_visible_position();
        self.surface.set_entries(layout, &entries);
        self.surface.set_selection(position);

        self.placeholder = entries.is_empty().then_some(NO_APPS_FOUND);
        self.surface.set_placeholder(self.placeholder);

        debug!("Refresh #{} delivered {} entries", generation, entries.len());
        self.entries = entries;
    }
}

impl Drop for StartMenu {
    fn drop(&mut self) {
        self.teardown();
    }
}
