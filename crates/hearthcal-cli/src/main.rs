//! hearthcal CLI entry point.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use hearthcal_cli::cli::{Cli, Command, ConfigAction, RuleAction};
use hearthcal_cli::commands::{self, expand::ExpandOptions, view::ViewOptions};
use hearthcal_cli::config::CliConfig;
use hearthcal_cli::error::CliResult;
use hearthcal_core::tracing::init_tracing;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.tracing_config()) {
        eprintln!("warning: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);

    // An explicit path must exist; the default one may not.
    let config = if cli.config.is_some() {
        CliConfig::load_from(&config_path)?
    } else {
        CliConfig::load()?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Expand {
            file,
            from,
            to,
            category,
            json,
            max_occurrences,
        } => {
            let options = ExpandOptions {
                from,
                to,
                category,
                json,
                max_occurrences,
            };
            commands::expand::run(&config, &file, &options, &mut out)?;
        }
        Command::View {
            file,
            view,
            date,
            category,
            json,
        } => {
            let options = ViewOptions {
                view: view.into(),
                date,
                category,
                json,
            };
            commands::view::run(&config, &file, &options, &mut out)?;
        }
        Command::Rule { action } => match action {
            RuleAction::Describe { rule } => commands::rule::describe(&rule, &mut out)?,
            RuleAction::Check { rule } => commands::rule::check(&rule, &mut out)?,
        },
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path, &mut out)?,
            ConfigAction::Path => commands::config::path(&config_path, &mut out)?,
        },
    }

    out.flush()?;
    Ok(())
}
