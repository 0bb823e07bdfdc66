use clap::Parser;
use etl_cli::app;
use etl_cli::cli::{Cli, Commands};
use etl_core::o11y;
use etl_core::{EtlConfig, Store};
use std::process::ExitCode;

const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = Cli::parse().into_command();

    let log_cfg = app::log_config(&cmd, |key| std::env::var(key).ok())?;
    let guard = o11y::init_global(&log_cfg)?;
    match &guard.log_file {
        Some(path) => tracing::info!(log_file = %path.display(), "logging initialized"),
        None => tracing::debug!("logging initialized without a log file"),
    }

    let cfg = match EtlConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return Ok(ExitCode::FAILURE);
        }
    };

    match cmd {
        Commands::Run(args) => {
            tracing::info!(
                batch_size = args.batch_size.get(),
                activity_source = ?cfg.sources.activity_source,
                "starting ETL pipeline"
            );
            let store = app::build_store(&cfg);
            let engine = app::build_engine(&cfg, store)?;

            tokio::select! {
                ok = engine.run(args.batch_size) => {
                    if ok {
                        tracing::info!("ETL pipeline completed successfully");
                        Ok(ExitCode::SUCCESS)
                    } else {
                        tracing::error!("ETL pipeline failed");
                        Ok(ExitCode::FAILURE)
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("pipeline interrupted by user");
                    Ok(ExitCode::from(EXIT_INTERRUPTED))
                }
            }
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&app::config_json(&cfg))?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            let store = app::build_store(&cfg);
            match store.ping().await {
                Ok(()) => {
                    println!("postgres: ok");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    println!("postgres: error ({e})");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
