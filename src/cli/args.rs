//! Command-line argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{DealTerms, FormOptions, LoadOptions, TrainingConfig};

/// Clinch - estimate the probability that an M&A deal closes
#[derive(Parser, Debug)]
#[command(name = "clinch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Deal history file (xlsx, xls, ods, CSV or Parquet).
    /// Must contain Deal Status, Size, Deal Premium, Deal Lenght,
    /// Deal Type, Nature Of Bid and Payment Type columns.
    #[arg(short, long, global = true, default_value = "Book1.xlsx")]
    pub input: PathBuf,

    /// Worksheet to read from a spreadsheet. Defaults to the first sheet.
    #[arg(long, global = true)]
    pub sheet: Option<String>,

    /// Share of deals held out from fitting (0.0 to 1.0, exclusive)
    #[arg(long, global = true, default_value = "0.25", value_parser = validate_test_size)]
    pub test_size: f64,

    /// Seed for the stratified train/test shuffle
    #[arg(long, global = true, default_value = "42")]
    pub seed: u64,

    /// Maximum solver iterations for the logistic regression
    #[arg(long, global = true, default_value = "1000", value_parser = validate_max_iter)]
    pub max_iter: usize,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, global = true, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Use line-by-line prompts instead of the full-screen form
    #[arg(long, default_value = "false")]
    pub plain: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one deal from flags and exit
    Predict(PredictArgs),
}

/// Deal terms for a one-shot prediction. Unset fields take the form defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct PredictArgs {
    /// Deal size in USD million [default: 5000]
    #[arg(long)]
    pub size: Option<f64>,

    /// Premium as a fraction, 0.25 = 25% [default: 0.25]
    #[arg(long, value_parser = validate_premium)]
    pub premium: Option<f64>,

    /// Expected length in days [default: 180]
    #[arg(long)]
    pub length: Option<f64>,

    /// Deal type [default: first observed value]
    #[arg(long)]
    pub deal_type: Option<String>,

    /// Nature of bid [default: first observed value]
    #[arg(long)]
    pub nature_of_bid: Option<String>,

    /// Payment type [default: first observed value]
    #[arg(long)]
    pub payment_type: Option<String>,

    /// Print the terms and probability as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,
}

impl PredictArgs {
    /// Merge the given flags over the form defaults
    pub fn terms(&self, options: &FormOptions) -> DealTerms {
        let defaults = options.default_terms();
        DealTerms {
            size: self.size.unwrap_or(defaults.size),
            premium: self.premium.unwrap_or(defaults.premium),
            length: self.length.unwrap_or(defaults.length),
            deal_type: self.deal_type.clone().unwrap_or(defaults.deal_type),
            nature_of_bid: self.nature_of_bid.clone().unwrap_or(defaults.nature_of_bid),
            payment_type: self.payment_type.clone().unwrap_or(defaults.payment_type),
        }
    }
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sheet: self.sheet.clone(),
            infer_schema_length: self.infer_schema_length,
        }
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            test_size: self.test_size,
            seed: self.seed,
            max_iter: self.max_iter,
        }
    }
}

/// Validator for test_size parameter
fn validate_test_size(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "test_size must be between 0.0 and 1.0 (exclusive), got {}",
            value
        ))
    }
}

/// Validator for premium parameter
fn validate_premium(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("premium must be between 0.0 and 1.0, got {}", value))
    }
}

/// Validator for max_iter parameter
fn validate_max_iter(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid iteration count", s))?;

    if value == 0 {
        Err("max_iter must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
