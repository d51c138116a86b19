//! drive-tool entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use skillbox_client::bootstrap::{access_token, load_config, setup_tracing};
use skillbox_client::cli::{DriveCli, DriveCommand};
use skillbox_client::commands::drive;
use skillbox_client::error::ClientResult;
use skillbox_providers::GoogleDriveClient;
use skillbox_providers::auth::DRIVE_SCOPE;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = DriveCli::parse();
    setup_tracing(&cli.global);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: DriveCli) -> ClientResult<()> {
    let mut stdout = io::stdout().lock();

    let Some(command) = cli.command else {
        drive::banner(&mut stdout)?;
        return Ok(());
    };

    let config = load_config(&cli.global)?;
    let token = access_token(&config, &[DRIVE_SCOPE]).await?;
    let client = GoogleDriveClient::new(token, config.http.timeout())?;
    let settings = &config.drive;

    match command {
        DriveCommand::List { args } => drive::list(&client, &args, settings, &mut stdout).await?,
        DriveCommand::Search { args } => drive::search(&client, &args, &mut stdout).await?,
        DriveCommand::Read { args } => drive::read(&client, &args, &mut stdout).await?,
        DriveCommand::Upload { args } => {
            drive::upload(&client, &args, settings, &mut stdout).await?
        }
        DriveCommand::Create { args } => {
            drive::create(&client, &args, settings, &mut stdout).await?
        }
    }
    Ok(())
}
