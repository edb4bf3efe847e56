use std::{process::ExitCode, time::Duration};

use anyhow::Result;
use chrono::Utc;
use log::debug;
use storefront::{
    Config, Database, DatabaseConfig, Prober, STOREFRONT_VERSION,
    health::{HealthStatus, ReadinessStatus},
};

pub async fn run(config: &Config, ready: bool, timeout: Option<u64>) -> Result<ExitCode> {
    let mut prober = Prober::from_config(&config.health, STOREFRONT_VERSION);
    if let Some(timeout) = timeout {
        prober = prober.with_timeout(Duration::from_millis(timeout));
    }

    let (passed, output) = probe(&config.database, &prober, ready).await?;

    debug!("Probe passed :: {}", passed);
    println!("{}", output);

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Run one probe, returning whether it passed and the JSON status
async fn probe(
    database: &DatabaseConfig,
    prober: &Prober,
    ready: bool,
) -> Result<(bool, String)> {
    // Unconfigured or unreachable databases are failed probes, not CLI errors
    let opened = match database.persistent() {
        Ok(_) => Database::open(database).await,
        Err(error) => Err(error),
    };

    match opened {
        Ok(database) => {
            let result = if ready {
                let status = prober.check_readiness(&database).await;
                (status.is_ready(), serde_json::to_string_pretty(&status)?)
            } else {
                let status = prober.check_liveness(&database).await;
                (status.is_healthy(), serde_json::to_string_pretty(&status)?)
            };
            database.close();
            Ok(result)
        }
        Err(error) if ready => {
            let status = ReadinessStatus::NotReady {
                error: error.to_string(),
                timestamp: Utc::now(),
            };
            Ok((false, serde_json::to_string_pretty(&status)?))
        }
        Err(error) => {
            let status = HealthStatus::Unhealthy {
                error: error.to_string(),
                timestamp: Utc::now(),
            };
            Ok((false, serde_json::to_string_pretty(&status)?))
        }
    }
}
