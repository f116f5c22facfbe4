//! Filter command implementation.
//!
//! Prints the OData filter string for a JSON filter expression without
//! contacting the service.

use azure_vector_store_rs::filter::{translate, FilterExpression};
use owo_colors::OwoColorize;

use super::{CommandContext, CommandError, Result};

/// Parses a JSON filter expression.
pub fn parse_filter_expression(input: &str) -> Result<FilterExpression> {
    serde_json::from_str(input)
        .map_err(|e| CommandError::Input(format!("invalid filter expression: {e}")))
}

/// Executes the filter command.
pub fn execute(ctx: &CommandContext, expression: &str) -> Result<()> {
    let filter = parse_filter_expression(expression)?;
    let translated = translate(Some(&filter));

    if ctx.json_output {
        let output = serde_json::json!({ "filter": translated });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        match translated {
            Some(filter) => println!("{filter}"),
            None if ctx.use_colors => println!("{}", "(empty filter)".dimmed()),
            None => println!("(empty filter)"),
        }
    }

    Ok(())
}
