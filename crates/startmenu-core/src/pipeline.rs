//! Background app-list refresh.
//!
//! One pass enumerates, sorts, filters and resolves icons on the blocking
//! pool, then posts the entries back to the menu's event channel. Starting a
//! pass cancels the previous one; a cancelled pass never posts. A pass whose
//! catalog failed posts `RefreshFailed` so the menu stops waiting on it.

use crate::catalog::AppCatalog;
use crate::controller::MenuEvent;
use crate::search::{filter_activities, sort_activities};
use startmenu_types::AppEntry;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// The pass the menu is currently waiting for
#[derive(Debug)]
struct PendingRefresh {
    generation: u64,
    token: CancellationToken,
}

pub struct RefreshPipeline {
    catalog: Arc<dyn AppCatalog>,
    events: UnboundedSender<MenuEvent>,
    generation: u64,
    in_flight: Option<PendingRefresh>,
}

impl RefreshPipeline {
    pub(crate) fn new(catalog: Arc<dyn AppCatalog>, events: UnboundedSender<MenuEvent>) -> Self {
        Self {
            catalog,
            events,
            generation: 0,
            in_flight: None,
        }
    }

    /// Start a new pass for `query`, superseding any pass still running.
    ///
    /// Must be called from within a tokio runtime. Returns the generation the
    /// pass will report with.
    pub fn refresh(&mut self, query: Option<String>) -> u64 {
        self.cancel();

        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        self.in_flight = Some(PendingRefresh {
            generation,
            token: token.clone(),
        });

        debug!("Refresh #{} started (query: {:?})", generation, query);

        let catalog = Arc::clone(&self.catalog);
        let events = self.events.clone();
        tokio::task::spawn_blocking(move || {
            let Some(entries) = load_entries(catalog.as_ref(), query.as_deref(), &token) else {
                if !token.is_cancelled() {
                    let _ = events.send(MenuEvent::RefreshFailed { generation });
                }
                trace!("Refresh #{} produced nothing", generation);
                return;
            };

            if token.is_cancelled() {
                trace!("Refresh #{} superseded before delivery", generation);
                return;
            }

            if events
                .send(MenuEvent::AppsLoaded {
                    generation,
                    entries,
                })
                .is_err()
            {
                trace!("Menu gone before refresh #{} finished", generation);
            }
        });

        generation
    }

    /// Cancel the pass in flight. Safe to call when nothing is running.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.in_flight.take() {
            trace!("Cancelling refresh #{}", pending.generation);
            pending.token.cancel();
        }
    }

    /// Claim a finished pass. Only the latest, uncancelled pass is accepted.
    pub fn accept(&mut self, generation: u64) -> bool {
        match &self.in_flight {
            Some(pending) if pending.generation == generation => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Generation of the most recently started pass
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }
}

impl Drop for RefreshPipeline {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run one enumeration pass synchronously.
///
/// Returns `None` if the pass was cancelled or the catalog failed.
pub fn load_entries(
    catalog: &dyn AppCatalog,
    query: Option<&str>,
    token: &CancellationToken,
) -> Option<Vec<AppEntry>> {
    let mut activities = match catalog.launcher_activities() {
        Ok(activities) => activities,
        Err(e) => {
            warn!("Failed to enumerate launcher activities: {}", e);
            return None;
        }
    };

    if token.is_cancelled() {
        return None;
    }

    sort_activities(&mut activities);
    let matches = filter_activities(activities, query);

    let mut entries = Vec::with_capacity(matches.len());
    for activity in &matches {
        if token.is_cancelled() {
            return None;
        }
        entries.push(activity.to_entry(catalog.load_icon(activity)));
    }

    Some(entries)
}
