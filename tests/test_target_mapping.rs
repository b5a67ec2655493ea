//! Tests for deal outcome mapping and filtering

use clinch::pipeline::{
    count_classes, create_target_mask, filter_resolved_deals, outcome_labels, PrepareError,
    TargetMapping,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

fn status_dataframe(values: &[&str]) -> DataFrame {
    df! {
        "Deal Status" => values,
    }
    .unwrap()
}

#[test]
fn test_target_mapping_new() {
    let mapping = TargetMapping::new("Closed".to_string(), "Dropped".to_string());
    assert_eq!(mapping.event_value, "Closed");
    assert_eq!(mapping.non_event_value, "Dropped");
    assert_eq!(mapping.label("Closed"), Some(1));
    assert_eq!(mapping.label("Dropped"), Some(0));
}

#[test]
fn test_default_mapping_is_deal_outcome() {
    let mapping = TargetMapping::default();
    assert_eq!(mapping, TargetMapping::deal_outcome());
    assert_eq!(mapping.label("Completed"), Some(1));
    assert_eq!(mapping.label("Terminated"), Some(0));
}

#[test]
fn test_status_match_is_exact() {
    let mapping = TargetMapping::deal_outcome();
    assert_eq!(mapping.label("completed"), None);
    assert_eq!(mapping.label("Completed "), None);
    assert_eq!(mapping.label("Pending"), None);
}

#[test]
fn test_create_target_mask_with_ignored_values() {
    let df = status_dataframe(&["Completed", "Pending", "Terminated", "Withdrawn"]);

    let mask =
        create_target_mask(&df, "Deal Status", &TargetMapping::deal_outcome()).unwrap();

    assert_eq!(mask, vec![Some(1), None, Some(0), None]);
}

#[test]
fn test_create_target_mask_with_nulls() {
    let df = df! {
        "Deal Status" => [Some("Completed"), None, Some("Terminated")],
    }
    .unwrap();

    let mask =
        create_target_mask(&df, "Deal Status", &TargetMapping::deal_outcome()).unwrap();

    assert_eq!(mask, vec![Some(1), None, Some(0)]);
}

#[test]
fn test_nonexistent_status_column_fails() {
    let df = status_dataframe(&["Completed"]);
    let result = create_target_mask(&df, "Status", &TargetMapping::deal_outcome());
    assert!(result.is_err());
}

#[test]
fn test_filter_resolved_deals_drops_pending() {
    let df = common::create_deal_dataframe();
    let mapping = TargetMapping::deal_outcome();

    let resolved = filter_resolved_deals(&df, &mapping).unwrap();
    let labels = outcome_labels(&resolved, &mapping).unwrap();

    assert_eq!(resolved.height(), 36);
    assert_eq!(count_classes(&labels), (24, 12));
}

#[test]
fn test_no_resolved_deals_fails() {
    let df = status_dataframe(&["Pending", "Pending", "Withdrawn"]);

    let err = filter_resolved_deals(&df, &TargetMapping::deal_outcome()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PrepareError>(),
        Some(PrepareError::NoResolvedDeals)
    ));
}

#[test]
fn test_outcome_labels_reject_unresolved_rows() {
    let df = status_dataframe(&["Completed", "Pending"]);
    let result = outcome_labels(&df, &TargetMapping::deal_outcome());
    assert!(result.is_err(), "Unfiltered frames should not be labelled");
}
