//! CLI module - argument parsing and the prediction forms

mod args;
pub mod form;
mod prompts;

pub use args::{Cli, Commands, PredictArgs};
pub use form::run_form;
pub use prompts::*;
