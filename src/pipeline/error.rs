//! Error types for data preparation and model fitting.

use thiserror::Error;

/// Failures that stop the model from being prepared.
///
/// Every variant is fatal at startup; there is no retry or fallback.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// File extension is not one of the supported formats.
    #[error("Unsupported file format: '{0}'. Supported formats: xlsx, xls, xlsm, ods, csv, parquet")]
    UnsupportedFormat(String),

    /// Workbook has no sheets, the requested sheet is absent, or the sheet has no header row.
    #[error("Workbook has no usable sheet: {0}")]
    EmptyWorkbook(String),

    /// One or more contract columns are absent from the dataset.
    #[error("Missing required column(s) {missing:?}. Available columns: {available:?}")]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// No row carries a Completed or Terminated outcome.
    #[error("No deals with a resolved outcome (Completed or Terminated)")]
    NoResolvedDeals,

    /// Every resolved row is missing at least one feature value.
    #[error("Training set is empty: every resolved deal is missing a feature value")]
    EmptyTrainingSet,

    /// All training labels belong to one class.
    #[error("Training data contains only one class ({0}); at least two are required")]
    SingleClass(&'static str),

    /// A class has too few rows for a stratified split.
    #[error("The least populated class ({class}) has only {count} member(s); at least 2 are required")]
    UnderpopulatedClass { class: &'static str, count: usize },

    /// The Newton system could not be factorized.
    #[error("Logistic regression Hessian is not positive definite")]
    SingularSystem,

    /// Inference was attempted before fitting.
    #[error("Model has not been fitted")]
    NotFitted,
}
