pub mod catalog;
pub mod config;
pub mod pipeline;
pub mod search;
pub mod signals;
pub mod surface;
pub mod web_search;

mod controller;
mod error;

#[cfg(test)]
mod tests;

pub use catalog::{AppCatalog, LauncherActivity, StaticCatalog};
pub use controller::{
    GRID_COLUMNS, HIDE_DELAY, MenuEvent, NO_APPS_FOUND, QueryState, Services, StartMenu, Startup,
};
pub use error::{Error, Result};
pub use signals::SignalBus;
pub use surface::{Launcher, WindowParams, WindowSurface};

pub use startmenu_types::*;
