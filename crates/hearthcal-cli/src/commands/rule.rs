//! Rule commands.

use std::io::Write;

use hearthcal_core::{RecurrenceRule, describe_rule};

use crate::error::CliResult;

/// Prints the human-readable summary of `text`.
///
/// Uses the same lenient reading as expansion, so this never fails on odd
/// input.
pub fn describe(text: &str, out: &mut impl Write) -> CliResult<()> {
    writeln!(out, "{}", describe_rule(Some(text)))?;
    Ok(())
}

/// Validates `text` strictly and prints its canonical form and summary.
pub fn check(text: &str, out: &mut impl Write) -> CliResult<()> {
    let rule: RecurrenceRule = text.parse()?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", rule.describe())?;
    Ok(())
}
