use std::{path::PathBuf, sync::Arc};

use anyhow::{Result, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand};
use power_sync::{
    config::{SyncConfig, database_url},
    destination::connect_store,
    errors::PersistenceError,
    pipeline::Pipeline,
    runner::{RetryPolicy, run_with_retries, schedule},
    window::RunTrigger,
};
use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(version, about = "Half-hourly wind/solar generation sync")]
struct Cli {
    /// TOML config file; defaults apply when omitted.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the sync once. Without --from/--to the latest published slot is fetched.
    Run {
        #[arg(long, value_name = "DATE", requires = "to")]
        from: Option<String>,
        #[arg(long, value_name = "DATE", requires = "from")]
        to: Option<String>,
        /// Ignore the configured retries.
        #[arg(long)]
        no_retry: bool,
    },
    /// Keep running on the configured cron schedule until Ctrl-C.
    Schedule,
    /// Create the destination table and exit.
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,power_sync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let cfg = SyncConfig::load(cli.config.as_deref())?;

    match cli.cmd {
        Cmd::InitDb => {
            let url = database_url()?;
            tokio::task::spawn_blocking(move || -> Result<(), PersistenceError> {
                let mut store = connect_store(url.expose_secret())?;
                store.ensure_schema()
            })
            .await??;
            tracing::info!("power_data schema is up to date");
        }
        Cmd::Run { from, to, no_retry } => {
            let pipeline = Pipeline::from_config(&cfg, database_url()?)?;
            let trigger = match (from, to) {
                (Some(from), Some(to)) => RunTrigger::manual(from, to),
                _ => RunTrigger::scheduled(Utc::now()),
            };
            let policy = if no_retry {
                RetryPolicy::none()
            } else {
                cfg.schedule.retry_policy()
            };

            let report = run_with_retries(&pipeline, &trigger, policy).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Cmd::Schedule => {
            let pipeline = Arc::new(Pipeline::from_config(&cfg, database_url()?)?);
            let mut sched = schedule(pipeline, &cfg.schedule.cron, cfg.schedule.retry_policy())
                .await
                .map_err(|e| anyhow!("failed to start scheduler: {e:?}"))?;

            tokio::signal::ctrl_c().await?;
            tracing::info!("shutting down scheduler");
            sched
                .shutdown()
                .await
                .map_err(|e| anyhow!("scheduler shutdown failed: {e:?}"))?;
        }
    }

    Ok(())
}
