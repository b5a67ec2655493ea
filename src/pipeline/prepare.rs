//! Startup preparation: clean the deal history and fit the pipeline
//!
//! The steps are exposed individually so the binary can report progress
//! between them; [`prepare_model`] runs them back to back.

use std::path::Path;

use anyhow::Result;
use polars::prelude::*;

use super::loader::{load_dataset, LoadOptions};
use super::logistic::{LogisticRegression, DEFAULT_MAX_ITER};
use super::missing::{analyze_missing_values, drop_incomplete_rows};
use super::model::{DealPipeline, FormOptions};
use super::schema::{coerce_feature_types, validate_columns, FEATURE_COLUMNS};
use super::split::{stratified_split, TrainTestSplit, DEFAULT_SEED, DEFAULT_TEST_SIZE};
use super::target::{count_classes, filter_resolved_deals, outcome_labels, TargetMapping};

/// Split and solver settings
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Share of rows held out (computed, never evaluated)
    pub test_size: f64,
    pub seed: u64,
    pub max_iter: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SEED,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

/// Deal history after outcome filtering and missing-value removal
#[derive(Debug, Clone)]
pub struct CleanedDeals {
    pub rows_loaded: usize,
    /// Deals with a Completed or Terminated status, incomplete rows included
    pub resolved: DataFrame,
    /// Resolved deals with every feature present
    pub complete: DataFrame,
    /// Label per row of `complete`, 1 = Completed
    pub labels: Vec<u8>,
    /// Missing ratio per feature among resolved deals, descending
    pub missing_ratios: Vec<(String, f64)>,
    pub options: FormOptions,
}

/// Fitted pipeline together with the split that produced it
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub pipeline: DealPipeline,
    pub split: TrainTestSplit,
}

/// Counts describing how the model was prepared
#[derive(Debug, Clone, PartialEq)]
pub struct PreparationStats {
    pub rows_loaded: usize,
    pub rows_resolved: usize,
    pub rows_complete: usize,
    pub missing_ratios: Vec<(String, f64)>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub completed: usize,
    pub terminated: usize,
    /// Row weights for (Terminated, Completed)
    pub class_weights: [f64; 2],
    pub n_iter: usize,
    pub converged: bool,
}

impl PreparationStats {
    pub fn new(cleaned: &CleanedDeals, fitted: &FittedModel) -> Self {
        let (completed, terminated) = count_classes(&cleaned.labels);
        let classifier = fitted.pipeline.classifier();
        Self {
            rows_loaded: cleaned.rows_loaded,
            rows_resolved: cleaned.resolved.height(),
            rows_complete: cleaned.complete.height(),
            missing_ratios: cleaned.missing_ratios.clone(),
            train_rows: fitted.split.train.len(),
            test_rows: fitted.split.test.len(),
            completed,
            terminated,
            class_weights: classifier.class_weights(),
            n_iter: classifier.n_iter(),
            converged: classifier.converged(),
        }
    }
}

/// Everything the form needs: the fitted pipeline and its option lists
#[derive(Debug, Clone)]
pub struct PreparedModel {
    pub pipeline: DealPipeline,
    pub options: FormOptions,
    pub stats: PreparationStats,
}

/// Validate, type, filter and complete the raw deal history
pub fn clean_deals(raw: &DataFrame) -> Result<CleanedDeals> {
    validate_columns(raw)?;
    let typed = coerce_feature_types(raw)?;

    let mapping = TargetMapping::deal_outcome();
    let resolved = filter_resolved_deals(&typed, &mapping)?;
    let options = FormOptions::from_frame(&resolved)?;
    let missing_ratios = analyze_missing_values(&resolved, &FEATURE_COLUMNS)?;

    let complete = drop_incomplete_rows(&resolved, &FEATURE_COLUMNS)?;
    let labels = outcome_labels(&complete, &mapping)?;

    Ok(CleanedDeals {
        rows_loaded: raw.height(),
        resolved,
        complete,
        labels,
        missing_ratios,
        options,
    })
}

/// Split the cleaned deals and fit the pipeline on the training partition
pub fn fit_model(cleaned: &CleanedDeals, config: &TrainingConfig) -> Result<FittedModel> {
    let split = stratified_split(&cleaned.labels, config.test_size, config.seed)?;

    let train_idx: Vec<IdxSize> = split.train.iter().map(|&i| i as IdxSize).collect();
    let train = cleaned
        .complete
        .take(&IdxCa::from_vec("train".into(), train_idx))?;
    let train_labels: Vec<u8> = split.train.iter().map(|&i| cleaned.labels[i]).collect();

    let classifier = LogisticRegression::new().with_max_iter(config.max_iter);
    let pipeline = DealPipeline::fit(&train, &train_labels, classifier)?;

    Ok(FittedModel { pipeline, split })
}

/// Load the file and run every preparation step
pub fn prepare_model(
    path: &Path,
    load: &LoadOptions,
    config: &TrainingConfig,
) -> Result<PreparedModel> {
    let raw = load_dataset(path, load)?;
    let cleaned = clean_deals(&raw)?;
    let fitted = fit_model(&cleaned, config)?;
    let stats = PreparationStats::new(&cleaned, &fitted);

    Ok(PreparedModel {
        pipeline: fitted.pipeline,
        options: cleaned.options,
        stats,
    })
}
