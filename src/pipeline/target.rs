//! Deal outcome filtering and binary label mapping
//!
//! Only deals with a terminal outcome are usable for training. Completed deals
//! map to 1, terminated deals map to 0, everything else (pending, withdrawn,
//! blank) is removed before fitting.

use anyhow::{Context, Result};
use polars::prelude::*;

use super::error::PrepareError;
use super::schema::{COMPLETED, DEAL_STATUS, TERMINATED};

/// Mapping configuration for converting outcome values to binary 0/1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMapping {
    /// Value that maps to 1 (event)
    pub event_value: String,
    /// Value that maps to 0 (non-event)
    pub non_event_value: String,
}

impl TargetMapping {
    /// Create a new target mapping
    pub fn new(event_value: String, non_event_value: String) -> Self {
        Self {
            event_value,
            non_event_value,
        }
    }

    /// Completed deals are events, terminated deals are non-events
    pub fn deal_outcome() -> Self {
        Self::new(COMPLETED.to_string(), TERMINATED.to_string())
    }

    /// Map a single value, `None` when it matches neither side
    pub fn label(&self, value: &str) -> Option<u8> {
        if value == self.event_value {
            Some(1)
        } else if value == self.non_event_value {
            Some(0)
        } else {
            None
        }
    }
}

impl Default for TargetMapping {
    fn default() -> Self {
        Self::deal_outcome()
    }
}

/// Create a binary target mask based on the mapping
///
/// Returns a Vec<Option<u8>> where:
/// - Some(1) for event values
/// - Some(0) for non-event values
/// - None for values that don't match either
pub fn create_target_mask(
    df: &DataFrame,
    target: &str,
    mapping: &TargetMapping,
) -> Result<Vec<Option<u8>>> {
    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;

    let mask = column_to_string_vec(target_col)?
        .iter()
        .map(|v| v.as_deref().and_then(|s| mapping.label(s)))
        .collect();

    Ok(mask)
}

/// Keep only deals whose status is Completed or Terminated
pub fn filter_resolved_deals(df: &DataFrame, mapping: &TargetMapping) -> Result<DataFrame> {
    let mask = create_target_mask(df, DEAL_STATUS, mapping)?;
    let keep: Vec<bool> = mask.iter().map(|m| m.is_some()).collect();

    if !keep.iter().any(|&k| k) {
        return Err(PrepareError::NoResolvedDeals.into());
    }

    let keep = BooleanChunked::new("resolved".into(), keep);
    Ok(df.filter(&keep)?)
}

/// Binary labels for a frame that has already been filtered to resolved deals
pub fn outcome_labels(df: &DataFrame, mapping: &TargetMapping) -> Result<Vec<u8>> {
    create_target_mask(df, DEAL_STATUS, mapping)?
        .into_iter()
        .enumerate()
        .map(|(row, label)| {
            label.ok_or_else(|| anyhow::anyhow!("Row {} has an unresolved deal status", row))
        })
        .collect()
}

/// Count (completed, terminated) labels
pub fn count_classes(labels: &[u8]) -> (usize, usize) {
    let completed = labels.iter().filter(|&&l| l == 1).count();
    (completed, labels.len() - completed)
}

/// Convert a column to a Vec of Option<String> for comparison
pub(crate) fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.filter(|n| !n.is_nan()).map(|n| format!("{}", n)))
                .collect()
        }
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}
