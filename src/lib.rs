//! Clinch: Deal-Closure Probability Library
//!
//! Fits a class-balanced logistic regression on a history of resolved M&A
//! deals and scores new deal terms with the probability that they close.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
