//! save-knowledge entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use skillbox_client::bootstrap::{load_config, setup_tracing};
use skillbox_client::cli::KnowledgeCli;
use skillbox_client::commands::knowledge::{self, SaveReport};
use skillbox_client::error::ClientResult;
use skillbox_knowledge::GitRunner;

fn main() -> ExitCode {
    let cli = KnowledgeCli::parse();
    setup_tracing(&cli.global);

    match run(cli) {
        Ok(report) if report.is_failure() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: KnowledgeCli) -> ClientResult<SaveReport> {
    let config = load_config(&cli.global)?;
    let cwd = std::env::current_dir()?;
    let mut stdout = io::stdout().lock();

    let report = knowledge::save(
        &GitRunner::new(),
        &cwd,
        cli.title.as_deref(),
        cli.content.as_deref(),
        &config.knowledge,
        &mut stdout,
    )?;
    Ok(report)
}
