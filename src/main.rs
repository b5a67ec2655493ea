//! Clinch: Deal-Closure Probability CLI Tool
//!
//! Fits a model on a history of resolved M&A deals at startup, then serves a
//! single-page form that estimates the probability a new deal closes.

mod cli;
mod pipeline;
mod report;
mod utils;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use cli::{run_form, run_prompt_form, Cli, Commands, PredictArgs};
use pipeline::{
    clean_deals, dataset_stats, fit_model, load_dataset, prepare_model, PreparationStats,
};
use report::TrainingSummary;
use utils::{
    abandon, create_spinner, finish_with_success, finish_with_warning, format_probability,
    print_banner, print_config, print_count, print_info, print_prediction, print_step_header,
    print_step_time, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Predict(args) => run_predict(&cli, args),
        };
    }

    let load_options = cli.load_options();
    let config = cli.training_config();

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    print_config(&cli.input, &config);

    // Step 1: Load deal history
    print_step_header(1, "Load Deal History");

    let step_start = Instant::now();
    let spinner = create_spinner("Reading deal history...");
    let raw = match load_dataset(&cli.input, &load_options) {
        Ok(df) => df,
        Err(e) => {
            abandon(&spinner);
            return Err(e);
        }
    };
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, cols, memory_mb) = dataset_stats(&raw);
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    let load_elapsed = step_start.elapsed();
    print_step_time(load_elapsed);

    // Step 2: Keep resolved deals with every feature present
    print_step_header(2, "Clean Deals");

    let step_start = Instant::now();
    let cleaned = clean_deals(&raw)?;

    print_count(
        "resolved deal(s)",
        cleaned.resolved.height(),
        Some("(Completed or Terminated)"),
    );
    let dropped = cleaned.resolved.height() - cleaned.complete.height();
    if dropped == 0 {
        print_info("No resolved deal is missing a feature");
    } else {
        print_count(
            "deal(s) with missing features",
            dropped,
            Some("(dropped)"),
        );
    }
    print_success(&format!(
        "{} deal(s) ready for fitting",
        cleaned.complete.height()
    ));

    let clean_elapsed = step_start.elapsed();
    print_step_time(clean_elapsed);

    // Step 3: Split and fit
    print_step_header(3, "Fit Model");

    let step_start = Instant::now();
    let spinner = create_spinner("Fitting class-balanced logistic regression...");
    let fitted = match fit_model(&cleaned, &config) {
        Ok(fitted) => fitted,
        Err(e) => {
            abandon(&spinner);
            return Err(e);
        }
    };
    let classifier = fitted.pipeline.classifier();
    if classifier.converged() {
        finish_with_success(
            &spinner,
            &format!("Converged after {} iteration(s)", classifier.n_iter()),
        );
    } else {
        finish_with_warning(&spinner, "Solver stopped before reaching the tolerance");
        print_warning("Coefficients are from the last iteration and may be imprecise");
    }

    let fit_elapsed = step_start.elapsed();
    print_step_time(fit_elapsed);

    // Display summary
    let mut summary = TrainingSummary::new(PreparationStats::new(&cleaned, &fitted));
    summary.set_load_time(load_elapsed);
    summary.set_clean_time(clean_elapsed);
    summary.set_fit_time(fit_elapsed);
    summary.display();

    // Serve the form
    if cli.plain {
        println!();
        run_prompt_form(&fitted.pipeline, &cleaned.options)?;
    } else {
        run_form(&fitted.pipeline, cleaned.options)?;
    }

    println!("    {}", style("Goodbye.").dim());
    Ok(())
}

/// Fit quietly, score one deal from flags and print the result
fn run_predict(cli: &Cli, args: &PredictArgs) -> Result<()> {
    let prepared = prepare_model(&cli.input, &cli.load_options(), &cli.training_config())?;
    let terms = args.terms(&prepared.options);
    let probability = prepared.pipeline.predict(&terms)?;

    if args.json {
        let report = serde_json::json!({
            "terms": terms,
            "probability": probability,
            "display": format_probability(probability),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_prediction(probability);
    }

    Ok(())
}
