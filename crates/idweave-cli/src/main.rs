#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::io::{BufWriter, Write};

use clap::Parser;
use config::{CliArgs, CliConfig};
use idweave::{CancellationToken, GeneratorRegistry};
use telemetry::init_tracing;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_tracing(config.log_json)?;
    log_startup_info(&config);

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let clock = config.clock();
    let mut out = BufWriter::new(std::io::stdout().lock());

    if let Some(short_length) = config.short_length {
        let generator = config.string_generator()?;
        for _ in 0..config.count {
            let id = generator
                .generate_short_id_async(&*clock, short_length, &cancel)
                .await?;
            writeln!(out, "{id}")?;
        }
    } else {
        let registry = GeneratorRegistry::from_configuration(config.generators()?);
        let generator = registry.get_generator_by_type(config.kind.id_type())?;
        for _ in 0..config.count {
            let id = generator.generate_object_async(&*clock, &cancel).await?;
            writeln!(out, "{id}")?;
        }
    }

    out.flush()?;
    tracing::debug!(count = config.count, "done");
    Ok(())
}

fn log_startup_info(config: &CliConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("Generating ids with full config: {:#?}", config);
    } else {
        tracing::debug!(kind = ?config.kind, count = config.count, "Generating ids");
    }
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if let Err(err) = signal::ctrl_c().await {
        tracing::warn!(%err, "failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Received Ctrl+C signal, stopping");
    cancel.cancel();
}
