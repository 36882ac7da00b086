//! Headless start menu shell.
//!
//! Drives the overlay controller from stdin with a console-backed window
//! surface and launcher, so the menu's behavior can be exercised without a
//! display.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use startmenu_core::config::{Config, Directories};
use startmenu_core::{MenuEvent, Services, Signal, SignalBus, StartMenu, Startup, StaticCatalog};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod console;

use commands::{Command, HELP};
use console::{ConsoleLauncher, ConsoleSurface, SearchField};

/// Start menu shell - drive the overlay from the terminal
#[derive(Parser, Debug)]
#[command(name = "startmenu")]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file (defaults to `$XDG_CONFIG_HOME/startmenu/config.json`)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON list of launcher activities (defaults to `apps.json` next to the config)
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Behave as if no keyboard is attached (no search box)
    #[arg(long)]
    no_keyboard: bool,

    /// Behave as if the overlay permission was not granted
    #[arg(long)]
    deny_overlay: bool,

    /// No app handles web searches; the fallback opens the engine URL
    #[arg(long)]
    no_web_search: bool,

    #[arg(long, default_value_t = 1080)]
    width: u32,

    #[arg(long, default_value_t = 1920)]
    height: u32,
}

/// Set up logging with file output for debugging.
/// In debug builds, defaults to debug level and logs to timestamped file.
/// In release builds, defaults to info level and logs to stderr.
fn setup_logging() {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("startmenu={default_level}")));

    if cfg!(debug_assertions) {
        let temp_dir = std::env::temp_dir();
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let log_filename = format!("startmenu-shell-{timestamp}.log");
        let log_path = temp_dir.join(&log_filename);

        #[cfg(unix)]
        {
            let symlink_path = temp_dir.join("startmenu-shell.log");
            let _ = std::fs::remove_file(&symlink_path);
            let _ = std::os::unix::fs::symlink(&log_path, &symlink_path);
        }

        let file_appender = tracing_appender::rolling::never(&temp_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        std::mem::forget(guard);

        // stdout carries the simulated window; keep logs in the file only
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(filter)
            .init();

        eprintln!("Logging to: {}", log_path.display());
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

/// Print every signal the menu broadcasts, the way the rest of the
/// taskbar would observe them.
fn spawn_signal_printer(bus: &SignalBus) {
    let mut signals = bus.subscribe();
    tokio::spawn(async move {
        while let Ok(signal) = signals.recv().await {
            println!("[signal] {}", signal.action());
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging();

    let dirs = Directories::new().context("Failed to resolve config directories")?;
    dirs.ensure_exists()
        .context("Failed to create config directories")?;
    let config_path = args.config.unwrap_or_else(|| dirs.config_file.clone());
    let catalog_path = args.catalog.unwrap_or_else(|| dirs.catalog_file.clone());

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let catalog = StaticCatalog::load(&catalog_path)
        .with_context(|| format!("Failed to load {}", catalog_path.display()))?;
    if catalog.is_empty() {
        warn!("No launcher activities in {}", catalog_path.display());
    }

    let search = SearchField::default();
    let bus = SignalBus::new();
    spawn_signal_printer(&bus);

    let (mut menu, events) = StartMenu::new(
        config,
        Some(config_path.clone()),
        Services {
            surface: Box::new(ConsoleSurface::new(
                !args.deny_overlay,
                !args.no_keyboard,
                (args.width, args.height),
                search.clone(),
            )),
            launcher: Box::new(ConsoleLauncher::new(!args.no_web_search)),
            catalog: Arc::new(catalog),
            bus: bus.clone(),
        },
    );

    if menu.initialize()? == Startup::Disabled {
        println!("Overlay permission missing; the taskbar has been disabled.");
        return Ok(());
    }

    let sender = menu.sender();
    let controller = tokio::spawn(menu.run(events));
    info!("Start menu shell running");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(e)) => {
                println!("{e}");
                continue;
            }
        };

        let event = match command {
            Command::Toggle => {
                bus.emit(Signal::ToggleStartMenu);
                continue;
            }
            Command::Hide => {
                bus.emit(Signal::HideStartMenu);
                continue;
            }
            Command::Type(text) => {
                search.set(&text);
                MenuEvent::QueryChanged { query: text }
            }
            Command::Submit => MenuEvent::QuerySubmitted {
                query: search.text(),
            },
            Command::FocusLost => MenuEvent::SearchFocusChanged { focused: false },
            Command::ClickOutside => MenuEvent::OutsideClicked,
            Command::Rotate => {
                search.clear();
                MenuEvent::ConfigurationChanged
            }
            Command::Reload => match Config::load(&config_path) {
                Ok(config) => MenuEvent::ConfigReloaded(Box::new(config)),
                Err(e) => {
                    println!("Failed to reload config: {e}");
                    continue;
                }
            },
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        };

        if !send(&sender, event) {
            break;
        }
    }

    send(&sender, MenuEvent::Shutdown);
    controller.await.context("Start menu task failed")?;

    info!("Start menu shell stopped");
    Ok(())
}

fn send(sender: &UnboundedSender<MenuEvent>, event: MenuEvent) -> bool {
    if sender.send(event).is_err() {
        warn!("Start menu is gone");
        return false;
    }
    true
}
