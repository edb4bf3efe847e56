#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Result;

mod cli;
mod utils;

use cli::{ArgumentCommands, init, reconcile::ReconcileArguments};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let arguments = init();

    let config = arguments.load_config()?;

    match arguments.commands {
        ArgumentCommands::Database { subcommands } => {
            cli::database::run(&config, subcommands).await?;
            Ok(ExitCode::SUCCESS)
        }
        ArgumentCommands::Health { ready, timeout } => {
            cli::health::run(&config, ready, timeout).await
        }
        ArgumentCommands::Reconcile {
            mappings,
            assets,
            dry_run,
            yes,
        } => {
            cli::reconcile::run(
                &config,
                ReconcileArguments {
                    mappings,
                    assets,
                    dry_run,
                    yes,
                },
            )
            .await
        }
    }
}
