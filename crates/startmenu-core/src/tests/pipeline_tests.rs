//! Tests for the refresh pipeline
//!
//! - Only the latest pass is delivered
//! - Cancelled or failed passes produce nothing
//! - Results from superseded passes are discarded by the menu

use super::fixtures::{
    FakeCatalog, FakeLauncher, FakeSurface, Harness, SurfaceOp, labels, make_activity,
    zoo_activities,
};
use crate::catalog::AppCatalog;
use crate::config::Config;
use crate::controller::{MenuEvent, NO_APPS_FOUND};
use crate::pipeline::{RefreshPipeline, load_entries};
use startmenu_types::AppEntry;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[test]
fn test_load_entries_sorts_and_resolves_icons() {
    let catalog = FakeCatalog::new(zoo_activities());
    let entries = load_entries(&catalog, None, &CancellationToken::new()).unwrap();

    assert_eq!(labels(&entries), vec!["apple", "Banana", "Zebra"]);
    assert!(entries.iter().all(|e| e.icon.width == 1));
    assert_eq!(
        entries[0].component,
        "com.example.apple/com.example.apple.MainActivity"
    );
}

#[test]
fn test_load_entries_filters_by_query() {
    let catalog = FakeCatalog::new(zoo_activities());
    let entries = load_entries(&catalog, Some("an"), &CancellationToken::new()).unwrap();

    assert_eq!(labels(&entries), vec!["Banana"]);
}

#[test]
fn test_load_entries_returns_none_when_cancelled() {
    let catalog = FakeCatalog::new(zoo_activities());
    let token = CancellationToken::new();
    token.cancel();

    assert!(load_entries(&catalog, None, &token).is_none());
}

#[test]
fn test_load_entries_returns_none_on_catalog_failure() {
    let catalog = FakeCatalog::failing();
    assert!(load_entries(&catalog, None, &CancellationToken::new()).is_none());
}

#[test]
fn test_load_entries_empty_catalog() {
    let catalog = FakeCatalog::new(Vec::new());
    let entries = load_entries(&catalog, None, &CancellationToken::new()).unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_pipeline_delivers_only_latest_generation() {
    let (catalog, gate) = FakeCatalog::gated(zoo_activities());
    let catalog = Arc::new(catalog);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut pipeline = RefreshPipeline::new(catalog.clone(), tx);

    pipeline.refresh(None);
    pipeline.refresh(Some("a".to_string()));
    let latest = pipeline.refresh(Some("an".to_string()));
    assert_eq!(latest, 3);
    gate.open();

    let Some(MenuEvent::AppsLoaded {
        generation,
        entries,
    }) = rx.recv().await
    else {
        panic!("expected AppsLoaded");
    };
    assert_eq!(generation, 3);
    assert_eq!(labels(&entries), vec!["Banana"]);
    assert!(pipeline.accept(generation));
    assert!(!pipeline.is_refreshing());

    drop(pipeline);
    assert!(rx.recv().await.is_none(), "superseded passes never post");
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_cancel_without_pass_is_safe() {
    let catalog: Arc<dyn AppCatalog> = Arc::new(FakeCatalog::new(zoo_activities()));
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut pipeline = RefreshPipeline::new(catalog, tx);

    pipeline.cancel();
    pipeline.cancel();

    assert_eq!(pipeline.generation(), 0);
    assert!(!pipeline.is_refreshing());
}

#[tokio::test]
async fn test_accept_rejects_cancelled_generation() {
    let (catalog, gate) = FakeCatalog::gated(zoo_activities());
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut pipeline = RefreshPipeline::new(Arc::new(catalog), tx);

    let generation = pipeline.refresh(None);
    pipeline.cancel();

    assert!(!pipeline.accept(generation));
    gate.open();
}

#[tokio::test]
async fn test_menu_discards_superseded_results() {
    let (catalog, gate) = FakeCatalog::gated(zoo_activities());
    let mut harness = Harness::with_catalog(
        Config::default(),
        FakeSurface::new(),
        FakeLauncher::new(),
        Arc::new(catalog),
        None,
    );
    harness.menu.initialize().unwrap();
    harness.menu.process(MenuEvent::QueryChanged {
        query: "xyz".to_string(),
    });
    harness.menu.process(MenuEvent::QueryChanged {
        query: "an".to_string(),
    });

    // Late result from the "xyz" pass
    harness.menu.process(MenuEvent::AppsLoaded {
        generation: 2,
        entries: Vec::<AppEntry>::new(),
    });
    assert!(harness.menu.entries().is_empty());
    assert_eq!(harness.menu.placeholder(), None);
    assert!(harness.surface.last_entries().is_none());

    gate.open();
    harness.settle_refresh().await;

    assert_eq!(labels(harness.menu.entries()), vec!["Banana"]);
    assert_eq!(harness.surface.count(&SurfaceOp::Placeholder(None)), 1);
    assert_eq!(
        harness.surface.last_entries().unwrap(),
        vec!["Banana".to_string()]
    );
}

#[tokio::test]
async fn test_no_matches_shows_placeholder() {
    let mut harness = Harness::started().await;

    harness.menu.process(MenuEvent::QueryChanged {
        query: "xyz".to_string(),
    });
    harness.settle_refresh().await;

    assert!(harness.menu.entries().is_empty());
    assert_eq!(harness.menu.placeholder(), Some(NO_APPS_FOUND));
    assert_eq!(
        harness.surface.ops().last(),
        Some(&SurfaceOp::Placeholder(Some(NO_APPS_FOUND.to_string())))
    );

    harness.menu.process(MenuEvent::QueryChanged {
        query: "an".to_string(),
    });
    harness.settle_refresh().await;
    assert_eq!(harness.menu.placeholder(), None);
}

#[tokio::test]
async fn test_catalog_failure_keeps_previous_list() {
    let mut harness = Harness::with_catalog(
        Config::default(),
        FakeSurface::new(),
        FakeLauncher::new(),
        Arc::new(FakeCatalog::failing()),
        None,
    );
    harness.menu.initialize().unwrap();

    harness.menu.process(MenuEvent::AppsLoaded {
        generation: 1,
        entries: vec![make_activity("Clock").to_entry(Default::default())],
    });
    assert_eq!(labels(harness.menu.entries()), vec!["Clock"]);

    harness.menu.process(MenuEvent::QueryChanged {
        query: "c".to_string(),
    });
    harness.settle_refresh().await;

    assert_eq!(labels(harness.menu.entries()), vec!["Clock"]);
    assert_eq!(harness.menu.placeholder(), None);
}

#[tokio::test]
async fn test_failed_pass_stops_refreshing() {
    let catalog = Arc::new(FakeCatalog::failing());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut pipeline = RefreshPipeline::new(catalog, tx);

    let generation = pipeline.refresh(None);
    assert!(pipeline.is_refreshing());

    let Some(MenuEvent::RefreshFailed { generation: failed }) = rx.recv().await else {
        panic!("expected RefreshFailed");
    };
    assert_eq!(failed, generation);
    assert!(pipeline.accept(failed));
    assert!(!pipeline.is_refreshing());
}

#[tokio::test]
async fn test_failed_initial_pass_leaves_list_empty_without_placeholder() {
    let mut harness = Harness::with_catalog(
        Config::default(),
        FakeSurface::new(),
        FakeLauncher::new(),
        Arc::new(FakeCatalog::failing()),
        None,
    );
    harness.menu.initialize().unwrap();

    harness.settle_refresh().await;

    assert!(harness.menu.entries().is_empty());
    assert_eq!(harness.menu.placeholder(), None);
    assert!(harness.surface.last_entries().is_none());
}

#[tokio::test]
async fn test_pipeline_rejects_finished_pass_once_superseded() {
    let catalog: Arc<dyn AppCatalog> = Arc::new(FakeCatalog::new(zoo_activities()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut pipeline = RefreshPipeline::new(catalog, tx);

    let first = pipeline.refresh(None);
    let Some(MenuEvent::AppsLoaded { generation, .. }) = rx.recv().await else {
        panic!("expected AppsLoaded");
    };
    assert_eq!(generation, first);

    // The first pass already posted; a new pass starts before it is applied
    let second = pipeline.refresh(Some("an".to_string()));
    assert!(!pipeline.accept(first));

    let Some(MenuEvent::AppsLoaded {
        generation,
        entries,
    }) = rx.recv().await
    else {
        panic!("expected AppsLoaded");
    };
    assert_eq!(generation, second);
    assert_eq!(labels(&entries), vec!["Banana"]);
    assert!(pipeline.accept(second));
}

#[tokio::test]
async fn test_menu_ignores_posted_result_of_superseded_pass() {
    let mut harness = Harness::new(Config::default(), FakeSurface::new(), FakeLauncher::new());
    harness.menu.initialize().unwrap();

    // Let the initial pass finish and post, but hold its result back
    let stale = harness.events.recv().await.unwrap();
    assert!(matches!(stale, MenuEvent::AppsLoaded { generation: 1, .. }));

    harness.menu.process(MenuEvent::QueryChanged {
        query: "an".to_string(),
    });
    harness.menu.process(stale);

    assert!(harness.menu.entries().is_empty());
    assert!(harness.surface.last_entries().is_none());
    assert!(harness.menu.is_refreshing());

    harness.settle_refresh().await;
    assert_eq!(labels(harness.menu.entries()), vec!["Banana"]);
}

#[tokio::test]
async fn test_query_changes_restart_pipeline() {
    let mut harness = Harness::started().await;

    for query in ["b", "ba", "ban"] {
        harness.menu.process(MenuEvent::QueryChanged {
            query: query.to_string(),
        });
    }
    harness.settle_refresh().await;

    assert_eq!(labels(harness.menu.entries()), vec!["Banana"]);
    assert_eq!(harness.menu.query().text.as_deref(), Some("ban"));
}
