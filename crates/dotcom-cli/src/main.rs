#![forbid(unsafe_code)]

mod cli_input;
mod errors;
mod log;

use std::process::ExitCode;

use clap::Parser;
use cli_input::{Args, CheckCommand, ListCommand, SubCommand};
use dotcom_client::{CancellationToken, DotcomClient};
use errors::CliError;

/// Exit code for a token that does not resolve to a subscription.
const NOT_FOUND: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    log::init(args.log_level, args.log_style);

    let cancel = CancellationToken::new();

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupted, cancelling");
                cancel.cancel();
            }
        }
    });

    match run(args, &cancel).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, cancel: &CancellationToken) -> Result<ExitCode, CliError> {
    let client = DotcomClient::from_config(&args.config()?)?;

    match args.command {
        SubCommand::Check(command) => check(&client, cancel, command).await,
        SubCommand::List(command) => list(&client, cancel, command).await,
    }
}

async fn check(client: &DotcomClient, cancel: &CancellationToken, command: CheckCommand) -> Result<ExitCode, CliError> {
    match client.check_access_token(cancel, &command.token).await? {
        Some(subscription) => {
            println!("{}", serde_json::to_string_pretty(&subscription)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No product subscription found for this access token");
            Ok(ExitCode::from(NOT_FOUND))
        }
    }
}

async fn list(client: &DotcomClient, cancel: &CancellationToken, command: ListCommand) -> Result<ExitCode, CliError> {
    let mut cursor = command.after;
    let mut fetched = 0;

    loop {
        let page = client.list_subscriptions(cancel, cursor.as_deref()).await?;
        fetched += page.nodes.len();

        println!("{}", serde_json::to_string_pretty(&page)?);

        cursor = page.next_cursor().map(str::to_owned);

        if !command.all || cursor.is_none() {
            tracing::info!(fetched, total = page.total_count, "done listing product subscriptions");
            break;
        }
    }

    Ok(ExitCode::SUCCESS)
}
