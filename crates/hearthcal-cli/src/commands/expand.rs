//! The `expand` command.

use std::io::Write;
use std::path::Path;

use hearthcal_core::{CategoryFilter, Expander, Occurrence, StoredEvent, TimeWindow};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::render;

/// Arguments for `expand`.
#[derive(Debug, Clone, Default)]
pub struct ExpandOptions {
    pub from: String,
    pub to: String,
    pub category: Option<String>,
    pub json: bool,
    pub max_occurrences: Option<usize>,
}

/// Loads `file` and prints its occurrences within the requested range.
pub fn run(
    config: &CliConfig,
    file: &Path,
    options: &ExpandOptions,
    out: &mut impl Write,
) -> CliResult<()> {
    let events = super::load_events(file)?;
    write_occurrences(config, &events, options, out)
}

/// Expands already loaded events and writes them to `out`.
pub fn write_occurrences(
    config: &CliConfig,
    events: &[StoredEvent],
    options: &ExpandOptions,
    out: &mut impl Write,
) -> CliResult<()> {
    let window = TimeWindow::new(
        super::parse_date_arg(&options.from)?,
        super::parse_date_arg(&options.to)?,
    );
    if window.is_inverted() {
        return Err(CliError::InvertedRange {
            from: options.from.clone(),
            to: options.to.clone(),
        });
    }

    let occurrences = expand(config, events, &window, options)?;

    if options.json {
        writeln!(out, "{}", render::to_json(&render::json_output(&occurrences))?)?;
    } else {
        writeln!(
            out,
            "{}",
            render::render_list(&occurrences, &config.display.no_events_text)
        )?;
    }
    Ok(())
}

fn expand(
    config: &CliConfig,
    events: &[StoredEvent],
    window: &TimeWindow,
    options: &ExpandOptions,
) -> CliResult<Vec<Occurrence>> {
    let mut expansion = config.expansion.clone();
    if let Some(max) = options.max_occurrences {
        expansion = expansion.with_max_occurrences(max);
        expansion.validate()?;
    }

    let occurrences = Expander::new(expansion).expand(events, window);
    Ok(CategoryFilter::from_option(options.category.clone()).apply(occurrences))
}
