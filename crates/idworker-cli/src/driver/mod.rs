pub mod config;
pub mod telemetry;

use anyhow::Context;
use config::{ClockKind, DriverConfig, OutputFormat};
use idworker::{BasicIdWorker, MonotonicClock, SnowflakeId, SystemClock, TimeSource};
use std::io::Write;

/// Generates `config.count` IDs and writes one per line to `out`.
///
/// # Errors
///
/// Fails on the first generation error (clock regression, timestamp out of
/// range) or if `out` cannot be written.
pub fn run(config: &DriverConfig, out: &mut impl Write) -> anyhow::Result<()> {
    match config.clock {
        ClockKind::System => generate(&BasicIdWorker::new(config.worker, SystemClock), config, out),
        ClockKind::Monotonic => generate(
            &BasicIdWorker::new(config.worker, MonotonicClock::new()),
            config,
            out,
        ),
    }
}

fn generate<T>(
    generator: &BasicIdWorker<T>,
    config: &DriverConfig,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    T: TimeSource,
{
    for n in 1..=config.count {
        let id = generator
            .next_id()
            .with_context(|| format!("failed to generate id #{n}"))?;
        write_id(out, id, config.format)?;

        if config.log_every.is_some_and(|every| n % every.get() == 0) {
            tracing::info!(n, %id, "generated id");
        }
    }

    out.flush().context("failed to flush output")?;
    tracing::debug!(count = config.count, "done");
    Ok(())
}

fn write_id(out: &mut impl Write, id: SnowflakeId, format: OutputFormat) -> anyhow::Result<()> {
    let written = match format {
        OutputFormat::Decimal => writeln!(out, "{id}"),
        OutputFormat::Padded => writeln!(out, "{}", id.to_padded_string()),
        OutputFormat::Decoded => writeln!(
            out,
            "{id} {} {} {} {}",
            id.timestamp(),
            id.datacenter_id(),
            id.worker_id(),
            id.sequence()
        ),
    };
    written.context("failed to write id")
}
