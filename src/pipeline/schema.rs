//! Column contract of the deal history file

use anyhow::Result;
use polars::prelude::*;

use super::error::PrepareError;
use super::target::column_to_string_vec;

/// Outcome column
pub const DEAL_STATUS: &str = "Deal Status";
/// Deal size in USD million
pub const SIZE: &str = "Size";
/// Premium as a fraction (0.25 = 25%)
pub const DEAL_PREMIUM: &str = "Deal Premium";
/// Expected length in days. The misspelling matches the source file header.
pub const DEAL_LENGTH: &str = "Deal Lenght";
pub const DEAL_TYPE: &str = "Deal Type";
pub const NATURE_OF_BID: &str = "Nature Of Bid";
pub const PAYMENT_TYPE: &str = "Payment Type";

/// Numeric features, passed through the encoder unchanged
pub const NUMERIC_FEATURES: [&str; 3] = [SIZE, DEAL_PREMIUM, DEAL_LENGTH];

/// Categorical features, one-hot encoded
pub const CATEGORICAL_FEATURES: [&str; 3] = [DEAL_TYPE, NATURE_OF_BID, PAYMENT_TYPE];

/// Feature table column order expected by the pipeline
pub const FEATURE_COLUMNS: [&str; 6] = [
    SIZE,
    DEAL_PREMIUM,
    DEAL_LENGTH,
    DEAL_TYPE,
    NATURE_OF_BID,
    PAYMENT_TYPE,
];

/// Status value mapped to label 1
pub const COMPLETED: &str = "Completed";
/// Status value mapped to label 0
pub const TERMINATED: &str = "Terminated";

/// Check that every contract column is present.
///
/// The error lists all missing columns at once, not just the first.
pub fn validate_columns(df: &DataFrame) -> Result<(), PrepareError> {
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let missing: Vec<String> = std::iter::once(DEAL_STATUS)
        .chain(FEATURE_COLUMNS)
        .filter(|name| !available.iter().any(|a| a == name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PrepareError::MissingColumns { missing, available })
    }
}

/// Cast feature columns to the types the pipeline works with.
///
/// Numeric features become `Float64`; values that cannot be cast and NaN become
/// null. Categorical features become `String`, numbers rendered as text.
/// Other columns are left untouched.
pub fn coerce_feature_types(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();

    for name in NUMERIC_FEATURES {
        let cast = df.column(name)?.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        out.with_column(Column::new(name.into(), values))?;
    }

    for name in CATEGORICAL_FEATURES {
        let values = column_to_string_vec(df.column(name)?)?;
        out.with_column(Column::new(name.into(), values))?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_columns_partition() {
        for name in NUMERIC_FEATURES.iter().chain(CATEGORICAL_FEATURES.iter()) {
            assert!(FEATURE_COLUMNS.contains(name));
        }
        assert_eq!(FEATURE_COLUMNS.len(), 6);
    }

    #[test]
    fn test_validate_reports_all_missing_columns() {
        let df = df! {
            "Deal Status" => ["Completed"],
            "Size" => [1.0f64],
        }
        .unwrap();

        match validate_columns(&df) {
            Err(PrepareError::MissingColumns { missing, available }) => {
                assert_eq!(missing.len(), 5);
                assert!(missing.contains(&"Deal Lenght".to_string()));
                assert_eq!(available, vec!["Deal Status", "Size"]);
            }
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_coerce_feature_types() {
        let df = df! {
            "Deal Status" => ["Completed", "Terminated"],
            "Size" => ["1500", "n/a"],
            "Deal Premium" => [0.3f64, f64::NAN],
            "Deal Lenght" => [120i64, 200],
            "Deal Type" => ["Merger", "Tender Offer"],
            "Nature Of Bid" => ["Friendly", "Hostile"],
            "Payment Type" => [1i64, 2],
        }
        .unwrap();

        let out = coerce_feature_types(&df).unwrap();

        let size: Vec<Option<f64>> = out.column("Size").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(size, vec![Some(1500.0), None]);

        let premium = out.column("Deal Premium").unwrap();
        assert_eq!(premium.null_count(), 1, "NaN should become null");

        let length = out.column("Deal Lenght").unwrap();
        assert_eq!(length.dtype(), &DataType::Float64);

        let payment: Vec<Option<&str>> = out.column("Payment Type").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(payment, vec![Some("1"), Some("2")]);
    }
}
