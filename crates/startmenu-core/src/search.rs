//! Ordering and filtering of the app list.

use crate::catalog::LauncherActivity;
use std::cmp::Ordering;

/// Compare two display labels the way the menu lists them.
///
/// Case-folded comparison first so "apple" sorts before "Banana", then the
/// raw labels so the order stays total.
#[must_use]
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort activities by label; equal labels fall back to package then activity.
pub fn sort_activities(activities: &mut [LauncherActivity]) {
    activities.sort_by(|a, b| {
        compare_labels(&a.label, &b.label)
            .then_with(|| a.package.cmp(&b.package))
            .then_with(|| a.activity.cmp(&b.activity))
    });
}

/// Case-insensitive substring match. The empty query matches everything.
#[must_use]
pub fn matches_query(label: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    label.to_lowercase().contains(&query.to_lowercase())
}

/// Keep the activities whose label matches `query`, preserving order.
#[must_use]
pub fn filter_activities(
    activities: Vec<LauncherActivity>,
    query: Option<&str>,
) -> Vec<LauncherActivity> {
    match query {
        None | Some("") => activities,
        Some(query) => activities
            .into_iter()
            .filter(|activity| matches_query(&activity.label, query))
            .collect(),
    }
}
