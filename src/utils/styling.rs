//! Terminal styling utilities for console output

use std::path::Path;
use std::time::Duration;

use console::{style, Emoji};

use crate::pipeline::TrainingConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static HANDSHAKE: Emoji<'_, '_> = Emoji("🤝 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SPLIT: Emoji<'_, '_> = Emoji("✂️  ", "");
pub static SEED: Emoji<'_, '_> = Emoji("🌱 ", "");
pub static LOOP: Emoji<'_, '_> = Emoji("🔁 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     ██████╗██╗     ██╗███╗   ██╗ ██████╗██╗  ██╗
    ██╔════╝██║     ██║████╗  ██║██╔════╝██║  ██║
    ██║     ██║     ██║██╔██╗ ██║██║     ███████║
    ██║     ██║     ██║██║╚██╗██║██║     ██╔══██║
    ╚██████╗███████╗██║██║ ╚████║╚██████╗██║  ██║
     ╚═════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝╚═╝  ╚═╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}{}",
        HANDSHAKE,
        style("Deal-closure probability from deal terms").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, config: &TrainingConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Input:     {:<36}│",
        FOLDER,
        truncate_path(input, 35)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Held out:  {:<36}│",
        SPLIT,
        style(format!("{:.0}%", config.test_size * 100.0)).yellow()
    );
    println!(
        "    │  {} Seed:      {:<36}│",
        SEED,
        style(config.seed).yellow()
    );
    println!(
        "    │  {} Max iter:  {:<36}│",
        LOOP,
        style(config.max_iter).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print elapsed time for a step
pub fn print_step_time(elapsed: Duration) {
    println!("    {}", style(format!("⏱  {:.2?}", elapsed)).dim());
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

/// Whole-percent rendering of a probability, e.g. `0.634` -> `63%`
pub fn format_probability(probability: f64) -> String {
    format!("{:.0}%", probability * 100.0)
}

/// Print the prediction result line
pub fn print_prediction(probability: f64) {
    println!();
    println!(
        "    {} Estimated probability of {}: {}",
        style("✓").green().bold(),
        style("closing").bold(),
        style(format_probability(probability)).green().bold()
    );
    println!();
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}
