// 💬 Filter Prompt - ask the user for region / amount bounds
// Generic over reader and writer so it runs against stdin or a test buffer

use crate::validation::{FilterCriteria, FilterOptions};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("{field} must be a number, got {value:?}")]
    InvalidAmount { field: &'static str, value: String },
}

/// Show the filter hints, then ask whether and how to filter
///
/// Returns `None` when the user declines (or input ends).
pub fn prompt_filter_criteria<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    options: &FilterOptions,
) -> Result<Option<FilterCriteria>, PromptError> {
    writeln!(output, "\n--- Filter Options ---")?;
    writeln!(output, "Available Regions: {}", options.regions.join(", "))?;
    if let Some((min, max)) = options.amount_range {
        writeln!(output, "Transaction Amount Range: {:.2} - {:.2}", min, max)?;
    }

    let wants_filter = ask(input, output, "\nDo you want to filter data? (y/n): ")?
        .map(|answer| answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
        .unwrap_or(false);
    if !wants_filter {
        return Ok(None);
    }

    writeln!(output, "\n--- Filter Criteria ---")?;
    let region = ask(input, output, "Enter Region (Leave empty to skip): ")?;
    let min_amount = ask(input, output, "Enter Min Amount (Leave empty to skip): ")?;
    let max_amount = ask(input, output, "Enter Max Amount (Leave empty to skip): ")?;

    Ok(Some(FilterCriteria {
        region,
        min_amount: parse_amount("Min Amount", min_amount)?,
        max_amount: parse_amount("Max Amount", max_amount)?,
    }))
}

/// Print a question and read one trimmed answer; blank or EOF → None
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<Option<String>> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

fn parse_amount(field: &'static str, raw: Option<String>) -> Result<Option<f64>, PromptError> {
    raw.map(|value| {
        value
            .replace(',', "")
            .parse::<f64>()
            .map_err(|_| PromptError::InvalidAmount { field, value: value.clone() })
    })
    .transpose()
}

// ============================================================================
// TESTS
// ============================================================================
