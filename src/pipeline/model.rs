//! Deal-closure model: feature encoder plus logistic regression

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::encoder::{distinct_values, FeatureEncoder};
use super::error::PrepareError;
use super::logistic::LogisticRegression;
use super::schema::{
    DEAL_LENGTH, DEAL_PREMIUM, DEAL_TYPE, FEATURE_COLUMNS, NATURE_OF_BID, PAYMENT_TYPE, SIZE,
};

/// Default deal size in USD million
pub const DEFAULT_SIZE: f64 = 5000.0;
/// Default premium fraction
pub const DEFAULT_PREMIUM: f64 = 0.25;
/// Default expected length in days
pub const DEFAULT_LENGTH: f64 = 180.0;

/// Terms of one deal to score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealTerms {
    /// Deal size in USD million
    pub size: f64,
    /// Premium as a fraction (0.25 = 25%)
    pub premium: f64,
    /// Expected length in days
    pub length: f64,
    pub deal_type: String,
    pub nature_of_bid: String,
    pub payment_type: String,
}

impl DealTerms {
    /// One-row feature table in the column order the pipeline expects
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns = vec![
            Column::new(SIZE.into(), [self.size]),
            Column::new(DEAL_PREMIUM.into(), [self.premium]),
            Column::new(DEAL_LENGTH.into(), [self.length]),
            Column::new(DEAL_TYPE.into(), [self.deal_type.as_str()]),
            Column::new(NATURE_OF_BID.into(), [self.nature_of_bid.as_str()]),
            Column::new(PAYMENT_TYPE.into(), [self.payment_type.as_str()]),
        ];
        debug_assert!(columns
            .iter()
            .map(|c| c.name().as_str())
            .eq(FEATURE_COLUMNS.iter().copied()));
        Ok(DataFrame::new(columns)?)
    }
}

/// Option lists for the categorical form fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormOptions {
    pub deal_types: Vec<String>,
    pub natures_of_bid: Vec<String>,
    pub payment_types: Vec<String>,
}

impl FormOptions {
    /// Sorted distinct non-missing values of each categorical column
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            deal_types: distinct_values(df, DEAL_TYPE)?,
            natures_of_bid: distinct_values(df, NATURE_OF_BID)?,
            payment_types: distinct_values(df, PAYMENT_TYPE)?,
        })
    }

    /// Form defaults: numeric defaults and the first option of every select
    pub fn default_terms(&self) -> DealTerms {
        let first = |v: &[String]| v.first().cloned().unwrap_or_default();
        DealTerms {
            size: DEFAULT_SIZE,
            premium: DEFAULT_PREMIUM,
            length: DEFAULT_LENGTH,
            deal_type: first(&self.deal_types),
            nature_of_bid: first(&self.natures_of_bid),
            payment_type: first(&self.payment_types),
        }
    }
}

/// Fitted encoder and classifier. Immutable after [`DealPipeline::fit`].
#[derive(Debug, Clone)]
pub struct DealPipeline {
    encoder: FeatureEncoder,
    classifier: LogisticRegression,
}

impl DealPipeline {
    /// Fit the encoder on the training categories, then the classifier on the
    /// encoded training rows
    pub fn fit(train: &DataFrame, labels: &[u8], classifier: LogisticRegression) -> Result<Self> {
        let mut encoder = FeatureEncoder::new();
        encoder.fit(train)?;
        let x = encoder.transform(train)?;

        let mut classifier = classifier;
        classifier.fit(&x, labels)?;

        Ok(Self {
            encoder,
            classifier,
        })
    }

    /// Probability of `Completed` for every row of a feature table
    pub fn predict_proba(&self, df: &DataFrame) -> Result<Vec<f64>> {
        if !self.classifier.is_fitted() {
            return Err(PrepareError::NotFitted.into());
        }
        let x = self.encoder.transform(df)?;
        self.classifier.predict_proba(&x)
    }

    /// Probability that a deal with these terms closes
    pub fn predict(&self, terms: &DealTerms) -> Result<f64> {
        let probs = self.predict_proba(&terms.to_frame()?)?;
        probs
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("No prediction returned"))
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }
}
