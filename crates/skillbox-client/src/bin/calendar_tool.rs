//! calendar-tool entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use skillbox_client::bootstrap::{access_token, load_config, setup_tracing};
use skillbox_client::cli::{CalendarCli, CalendarCommand};
use skillbox_client::commands::calendar;
use skillbox_client::error::ClientResult;
use skillbox_providers::GoogleCalendarClient;
use skillbox_providers::auth::CALENDAR_SCOPE;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = CalendarCli::parse();
    setup_tracing(&cli.global);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: CalendarCli) -> ClientResult<()> {
    let mut stdout = io::stdout().lock();

    let Some(command) = cli.command else {
        calendar::banner(&mut stdout)?;
        return Ok(());
    };

    let config = load_config(&cli.global)?;
    let token = access_token(&config, &[CALENDAR_SCOPE]).await?;
    let client = GoogleCalendarClient::new(token, config.http.timeout())?;

    match command {
        CalendarCommand::List => calendar::list(&client, &config.calendar, &mut stdout).await?,
        CalendarCommand::Create { args } => {
            calendar::create(&client, &args, &config.calendar, &mut stdout).await?
        }
    }
    Ok(())
}
