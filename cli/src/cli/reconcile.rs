use std::{path::PathBuf, process::ExitCode};

use anyhow::{Result, anyhow};
use console::style;
use log::{info, warn};
use storefront::{
    Config, Database,
    tasks::{
        CategoryImageMappings, ReconcileReport, ReconcileTask,
        reconcile::{ReconcileEntry, ReconcileOutcome},
    },
};

use crate::utils::interactive::prompt_confirm;

pub struct ReconcileArguments {
    pub mappings: Option<PathBuf>,
    pub assets: Option<PathBuf>,
    pub dry_run: bool,
    pub yes: bool,
}

pub async fn run(config: &Config, arguments: ReconcileArguments) -> Result<ExitCode> {
    config.database.persistent()?;

    let path = arguments
        .mappings
        .or_else(|| config.reconcile.mappings.clone())
        .ok_or_else(|| anyhow!("No mappings file provided (argument or `reconcile.mappings`)"))?;

    let mappings = CategoryImageMappings::load(&path)?;
    info!("Loaded {} mappings from {}", mappings.len(), path.display());
    if mappings.is_empty() {
        warn!("Nothing to reconcile");
        return Ok(ExitCode::SUCCESS);
    }

    if !arguments.dry_run
        && !arguments.yes
        && !prompt_confirm(&format!("Update the image of {} categories?", mappings.len()))?
    {
        info!("Aborted");
        return Ok(ExitCode::SUCCESS);
    }

    let mut task = ReconcileTask::new(mappings).dry_run(arguments.dry_run);
    if let Some(assets) = arguments.assets.or_else(|| config.reconcile.assets.clone()) {
        task = task.assets(assets);
    }

    let database = Database::open(&config.database).await?;
    let report = task.run_with(&database, print_entry).await;
    // Release the connection whether or not the task ran
    database.close();
    let report = report?;

    print_report(&report);

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_entry(entry: &ReconcileEntry) {
    let marker = match entry.outcome {
        ReconcileOutcome::Updated => style("✔").green(),
        ReconcileOutcome::Unchanged | ReconcileOutcome::Skipped => style("•").blue(),
        ReconcileOutcome::Failed { .. } => style("✘").red(),
    };
    println!(" {} {}", marker, entry);
}

fn print_report(report: &ReconcileReport) {
    println!(
        "\n{} succeeded, {} failed",
        style(report.successes()).green(),
        style(report.failures()).red()
    );
}
