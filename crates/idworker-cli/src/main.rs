mod driver;

use clap::Parser;
use driver::config::{CliArgs, DriverConfig};
use driver::telemetry::init_telemetry;
use std::io::{self, BufWriter};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_telemetry()?;
    let config = DriverConfig::try_from(args)?;

    log_startup_info(&config);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    driver::run(&config, &mut out)
}

fn log_startup_info(config: &DriverConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("Starting id worker with full config: {:#?}", config);
    }
    tracing::info!(
        epoch = config.worker.epoch(),
        worker_id = config.worker.worker_id(),
        datacenter_id = config.worker.datacenter_id(),
        count = config.count,
        "Starting id worker"
    );
}
