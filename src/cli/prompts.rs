//! Interactive prompts using dialoguer

use std::str::FromStr;

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}

/// Let the user pick one of `items`; returns its index
pub fn select_item<T: ToString>(prompt: &str, items: &[T], default: usize) -> Result<usize> {
    let index = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default.min(items.len().saturating_sub(1)))
        .interact()?;
    Ok(index)
}

/// Prompt for a value, re-asking until it parses and passes `check`
pub fn input_value<T>(prompt: &str, default: T, check: fn(&T) -> Result<(), String>) -> Result<T>
where
    T: Clone + ToString + FromStr,
    <T as FromStr>::Err: ToString,
{
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .validate_with(|raw: &String| -> Result<(), String> {
            let parsed = raw.trim().parse::<T>().map_err(|e| e.to_string())?;
            check(&parsed)
        })
        .interact_text()?;

    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!(e.to_string()))
}
