//! Tests for list ordering and query filtering
//!
//! Hand-written scenarios plus property tests for the invariants the
//! refresh pipeline relies on: sorting is total and stable across runs,
//! filtering preserves order and never invents entries.

use super::fixtures::{make_activity, zoo_activities};
use crate::catalog::LauncherActivity;
use crate::search::{compare_labels, filter_activities, matches_query, sort_activities};
use proptest::prelude::*;
use std::cmp::Ordering;

fn sorted_labels(mut activities: Vec<LauncherActivity>) -> Vec<String> {
    sort_activities(&mut activities);
    activities.into_iter().map(|a| a.label).collect()
}

#[test]
fn test_sort_is_case_insensitive() {
    assert_eq!(
        sorted_labels(zoo_activities()),
        vec!["apple", "Banana", "Zebra"]
    );
}

#[test]
fn test_sort_ties_break_on_package() {
    let mut activities = vec![
        LauncherActivity::new("com.b.mail", "com.b.mail.Main", "Mail"),
        LauncherActivity::new("com.a.mail", "com.a.mail.Main", "Mail"),
    ];
    sort_activities(&mut activities);

    assert_eq!(activities[0].package, "com.a.mail");
    assert_eq!(activities[1].package, "com.b.mail");
}

#[test]
fn test_sort_ties_break_on_activity() {
    let mut activities = vec![
        LauncherActivity::new("com.a.tools", "com.a.tools.Second", "Tools"),
        LauncherActivity::new("com.a.tools", "com.a.tools.First", "Tools"),
    ];
    sort_activities(&mut activities);

    assert_eq!(activities[0].activity, "com.a.tools.First");
}

#[test]
fn test_filter_none_and_empty_keep_everything() {
    assert_eq!(filter_activities(zoo_activities(), None).len(), 3);
    assert_eq!(filter_activities(zoo_activities(), Some("")).len(), 3);
}

#[test]
fn test_filter_substring_match() {
    let matched = filter_activities(zoo_activities(), Some("an"));
    let labels: Vec<_> = matched.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, vec!["Banana"]);
}

#[test]
fn test_filter_is_case_insensitive() {
    let matched = filter_activities(zoo_activities(), Some("ZEB"));
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].label, "Zebra");
}

#[test]
fn test_filter_no_matches() {
    assert!(filter_activities(zoo_activities(), Some("xyz")).is_empty());
}

#[test]
fn test_filter_matches_label_not_package() {
    let activities = vec![make_activity("Clock")];
    assert!(filter_activities(activities, Some("example")).is_empty());
}

#[test]
fn test_matches_query_unicode_labels() {
    assert!(matches_query("Ärzte Finder", "ärzte"));
    assert!(matches_query("Календарь", "кал"));
}

fn arb_label() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zA-Z0-9 ]{0,12}").unwrap()
}

fn arb_activities() -> impl Strategy<Value = Vec<LauncherActivity>> {
    proptest::collection::vec(
        (arb_label(), "[a-c]{1,3}").prop_map(|(label, pkg)| {
            LauncherActivity::new(
                &format!("com.{pkg}"),
                &format!("com.{pkg}.Main"),
                &label,
            )
        }),
        0..24,
    )
}

proptest! {
    #[test]
    fn prop_sort_orders_labels(activities in arb_activities()) {
        let mut sorted = activities;
        sort_activities(&mut sorted);

        for pair in sorted.windows(2) {
            prop_assert_ne!(
                compare_labels(&pair[0].label, &pair[1].label),
                Ordering::Greater
            );
        }
    }

    #[test]
    fn prop_sort_independent_of_input_order(activities in arb_activities()) {
        let mut forward = activities.clone();
        let mut reversed: Vec<_> = activities.into_iter().rev().collect();
        sort_activities(&mut forward);
        sort_activities(&mut reversed);

        prop_assert_eq!(forward, reversed);
    }

    #[test]
    fn prop_filter_is_ordered_subset(
        activities in arb_activities(),
        query in "[a-zA-Z]{0,3}",
    ) {
        let mut sorted = activities;
        sort_activities(&mut sorted);
        let matched = filter_activities(sorted.clone(), Some(query.as_str()));

        let mut remaining = sorted.iter();
        for activity in &matched {
            prop_assert!(matches_query(&activity.label, &query));
            prop_assert!(remaining.any(|a| a == activity));
        }

        let expected = sorted
            .iter()
            .filter(|a| matches_query(&a.label, &query))
            .count();
        prop_assert_eq!(matched.len(), expected);
    }
}
