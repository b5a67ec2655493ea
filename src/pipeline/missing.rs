//! Missing value analysis and incomplete-row removal

use anyhow::Result;
use polars::prelude::*;

use super::error::PrepareError;

/// Analyze missing values in the given columns.
///
/// A null counts as missing, and so does NaN in a float column.
/// Returns `(column, missing_ratio)` sorted by ratio descending.
pub fn analyze_missing_values(df: &DataFrame, columns: &[&str]) -> Result<Vec<(String, f64)>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let total = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = Vec::with_capacity(columns.len());

    for col_name in columns {
        let missing = missing_mask(df.column(col_name)?)?
            .iter()
            .filter(|&&m| m)
            .count();
        missing_ratios.push((col_name.to_string(), missing as f64 / total));
    }

    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(missing_ratios)
}

/// Drop every row with a missing value in any of the given columns.
///
/// There is no imputation. An empty result is an error because nothing can be
/// fitted on it.
pub fn drop_incomplete_rows(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let mut keep = vec![true; df.height()];

    for col_name in columns {
        for (k, missing) in keep.iter_mut().zip(missing_mask(df.column(col_name)?)?) {
            *k &= !missing;
        }
    }

    if !keep.iter().any(|&k| k) {
        return Err(PrepareError::EmptyTrainingSet.into());
    }

    let keep = BooleanChunked::new("complete".into(), keep);
    Ok(df.filter(&keep)?)
}

fn missing_mask(column: &Column) -> Result<Vec<bool>> {
    let mask = match column.dtype() {
        DataType::Float32 | DataType::Float64 => {
            let cast = column.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map_or(true, |x| x.is_nan()))
                .collect()
        }
        _ => column
            .as_materialized_series()
            .iter()
            .map(|v| v.is_null())
            .collect(),
    };
    Ok(mask)
}
