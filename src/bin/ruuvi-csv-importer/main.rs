mod args;
mod csv;

use std::{fs::File, process::ExitCode, sync::Arc};

use anyhow::{Context as _, Result};
use args::Args;
use clap::Parser as _;
use ruuvi_collector::{
    config::load_filters,
    db::{InfluxDbSink, MeasurementWriter},
    filter::{FilterResolver, SharedFilterResolver},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::csv::CsvMeasurementIter;

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let filters = match &args.config {
        Some(path) => load_filters(path)
            .with_context(|| format!("failed to load configuration: {path:?}"))?,
        None => FilterResolver::default(),
    };

    let mut sink = InfluxDbSink::new(&args.influx_url, &args.influx_database)
        .context("failed to configure InfluxDB sink")?;
    if let Some(rp) = &args.influx_retention_policy {
        sink = sink.with_retention_policy(rp);
    }
    if let Some(user) = &args.influx_user {
        sink = sink.with_credentials(user, args.influx_password.clone());
    }

    let writer = MeasurementWriter::new(Arc::new(SharedFilterResolver::new(filters)), sink);

    let file =
        File::open(&args.file).with_context(|| format!("failed to open file: {:?}", args.file))?;
    let iter = CsvMeasurementIter::new(file, args.device_id, args.timezone)
        .context("failed to create CSV measurement iterator")?;

    let mut total = 0;
    for (line, result) in iter.enumerate() {
        let measurement =
            result.with_context(|| format!("failed to parse CSV record {}", line + 1))?;

        writer
            .save(&measurement)
            .await
            .context("failed to save measurement")?;
        total += 1;
    }

    info!(total, file = ?args.file, "imported measurements");

    Ok(())
}
