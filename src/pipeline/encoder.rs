//! One-hot encoding of categorical deal terms with numeric passthrough
//!
//! The encoded design matrix has the indicator columns first, one block per
//! categorical feature in [`CATEGORICAL_FEATURES`] order with categories sorted
//! within a block, followed by the numeric features in [`NUMERIC_FEATURES`]
//! order. A category that was not seen during fitting encodes to all zeros.

use anyhow::{Context, Result};
use faer::Mat;
use polars::prelude::*;

use super::error::PrepareError;
use super::schema::{CATEGORICAL_FEATURES, NUMERIC_FEATURES};

/// Learned categories for one categorical feature
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBlock {
    pub column: String,
    /// Sorted, de-duplicated categories seen during fitting
    pub categories: Vec<String>,
}

/// Categorical encoder plus numeric passthrough
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    blocks: Vec<CategoryBlock>,
    is_fitted: bool,
}

impl FeatureEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the category set of each categorical feature
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.blocks = CATEGORICAL_FEATURES
            .iter()
            .map(|name| {
                Ok(CategoryBlock {
                    column: name.to_string(),
                    categories: distinct_values(df, name)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.is_fitted = true;
        Ok(self)
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn blocks(&self) -> &[CategoryBlock] {
        &self.blocks
    }

    /// Number of encoded columns
    pub fn n_features(&self) -> usize {
        self.blocks.iter().map(|b| b.categories.len()).sum::<usize>() + NUMERIC_FEATURES.len()
    }

    /// Encoded column names, `"<column>_<category>"` for indicators
    pub fn feature_names(&self) -> Vec<String> {
        self.blocks
            .iter()
            .flat_map(|b| {
                b.categories
                    .iter()
                    .map(move |c| format!("{}_{}", b.column, c))
            })
            .chain(NUMERIC_FEATURES.iter().map(|n| n.to_string()))
            .collect()
    }

    /// Encode a frame into a dense `rows x n_features` matrix
    pub fn transform(&self, df: &DataFrame) -> Result<Mat<f64>> {
        if !self.is_fitted {
            return Err(PrepareError::NotFitted.into());
        }

        let n_rows = df.height();
        let mut x = Mat::<f64>::zeros(n_rows, self.n_features());
        let mut offset = 0;

        for block in &self.blocks {
            let ca = df
                .column(&block.column)
                .with_context(|| format!("Column '{}' not found", block.column))?
                .str()?;

            for (row, value) in ca.into_iter().enumerate() {
                if let Some(pos) = value.and_then(|v| block.position(v)) {
                    x[(row, offset + pos)] = 1.0;
                }
            }
            offset += block.categories.len();
        }

        for name in NUMERIC_FEATURES {
            let cast = df
                .column(name)
                .with_context(|| format!("Column '{}' not found", name))?
                .cast(&DataType::Float64)?;

            for (row, value) in cast.f64()?.into_iter().enumerate() {
                x[(row, offset)] = value
                    .ok_or_else(|| anyhow::anyhow!("Missing value in '{}' at row {}", name, row))?;
            }
            offset += 1;
        }

        Ok(x)
    }
}

impl CategoryBlock {
    fn position(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }
}

/// Sorted distinct non-null values of a string column
pub fn distinct_values(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let ca = df
        .column(column)
        .with_context(|| format!("Column '{}' not found", column))?
        .str()?;

    let mut values: Vec<String> = ca.into_iter().flatten().map(|s| s.to_string()).collect();
    values.sort();
    values.dedup();
    Ok(values)
}
