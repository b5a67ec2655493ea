//! Line-by-line prediction form using dialoguer

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::pipeline::{DealPipeline, DealTerms, FormOptions};
use crate::utils::print_prediction;

/// Ask for deal terms and print a prediction until the user stops
pub fn run_prompt_form(pipeline: &DealPipeline, options: &FormOptions) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut terms = options.default_terms();

    loop {
        terms = prompt_terms(&theme, options, &terms)?;
        let probability = pipeline.predict(&terms)?;
        print_prediction(probability);

        if !confirm_step("Predict another deal?")? {
            return Ok(());
        }
    }
}

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// One pass over every field, starting from the previous answers
fn prompt_terms(
    theme: &ColorfulTheme,
    options: &FormOptions,
    previous: &DealTerms,
) -> Result<DealTerms> {
    let size: f64 = Input::with_theme(theme)
        .with_prompt("Deal Size (USD million)")
        .default(previous.size)
        .interact_text()?;

    let premium: f64 = Input::with_theme(theme)
        .with_prompt("Premium (0-1 = 0%-100%)")
        .default(previous.premium)
        .validate_with(|value: &f64| -> Result<(), &str> {
            if (0.0..=1.0).contains(value) {
                Ok(())
            } else {
                Err("Premium must be between 0 and 1")
            }
        })
        .interact_text()?;

    let length: i64 = Input::with_theme(theme)
        .with_prompt("Expected Length (days)")
        .default(previous.length.round() as i64)
        .interact_text()?;

    let deal_type = select_option(theme, "Deal Type", &options.deal_types, &previous.deal_type)?;
    let nature_of_bid = select_option(
        theme,
        "Nature of Bid",
        &options.natures_of_bid,
        &previous.nature_of_bid,
    )?;
    let payment_type = select_option(
        theme,
        "Payment Type",
        &options.payment_types,
        &previous.payment_type,
    )?;

    Ok(DealTerms {
        size,
        premium,
        length: length as f64,
        deal_type,
        nature_of_bid,
        payment_type,
    })
}

fn select_option(
    theme: &ColorfulTheme,
    prompt: &str,
    items: &[String],
    previous: &str,
) -> Result<String> {
    if items.is_empty() {
        return Ok(String::new());
    }

    let default = items.iter().position(|item| item == previous).unwrap_or(0);
    let selection = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()?;

    Ok(items[selection].clone())
}
