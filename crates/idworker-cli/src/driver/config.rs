use clap::{Parser, ValueEnum};
use core::num::NonZeroU64;
use idworker::{TWITTER_EPOCH, WorkerConfig};

/// Runtime configuration for the `idworker` binary.
///
/// Every value can come from a CLI flag or an environment variable; a `.env`
/// file in the working directory is loaded first.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idworker",
    version,
    about = "Prints Snowflake IDs for one (datacenter, worker) identity"
)]
pub struct CliArgs {
    /// Reference instant in milliseconds since the Unix epoch.
    ///
    /// Every ID stores its time relative to this value. It must not lie in
    /// the future.
    ///
    /// Environment variable: `IDWORKER_EPOCH`
    #[arg(long, env = "IDWORKER_EPOCH", default_value_t = TWITTER_EPOCH)]
    pub epoch: u64,

    /// Worker ID (0-31), unique within the datacenter.
    ///
    /// Environment variable: `IDWORKER_WORKER_ID`
    #[arg(
        long,
        env = "IDWORKER_WORKER_ID",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub worker_id: i64,

    /// Datacenter ID (0-31).
    ///
    /// Environment variable: `IDWORKER_DATACENTER_ID`
    #[arg(
        long,
        env = "IDWORKER_DATACENTER_ID",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub datacenter_id: i64,

    /// Number of IDs to print.
    ///
    /// Environment variable: `IDWORKER_COUNT`
    #[arg(long, env = "IDWORKER_COUNT", default_value_t = 10)]
    pub count: u64,

    /// Emit an `info` event every N IDs. Zero disables it.
    ///
    /// Environment variable: `IDWORKER_LOG_EVERY`
    #[arg(long, env = "IDWORKER_LOG_EVERY", default_value_t = 10_000)]
    pub log_every: u64,

    /// Time source driving the generator.
    ///
    /// Environment variable: `IDWORKER_CLOCK`
    #[arg(long, env = "IDWORKER_CLOCK", value_enum, default_value_t = ClockKind::System)]
    pub clock: ClockKind,

    /// Print IDs zero-padded to 20 digits.
    #[arg(long, default_value_t = false, conflicts_with = "decode")]
    pub padded: bool,

    /// Print each ID followed by its timestamp, datacenter, worker and
    /// sequence fields.
    #[arg(long, default_value_t = false)]
    pub decode: bool,
}

/// Which [`idworker::TimeSource`] backs the generator.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockKind {
    /// Operating system wall clock. Clock regressions are reported as errors.
    System,
    /// Wall clock sampled once, then advanced monotonically.
    Monotonic,
}

/// How each ID is written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Decimal,
    Padded,
    Decoded,
}

#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub worker: WorkerConfig,
    pub count: u64,
    pub log_every: Option<NonZeroU64>,
    pub clock: ClockKind,
    pub format: OutputFormat,
}

impl TryFrom<CliArgs> for DriverConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let worker = WorkerConfig::new(args.epoch, args.worker_id, args.datacenter_id)?;

        let format = if args.decode {
            OutputFormat::Decoded
        } else if args.padded {
            OutputFormat::Padded
        } else {
            OutputFormat::Decimal
        };

        Ok(Self {
            worker,
            count: args.count,
            log_every: NonZeroU64::new(args.log_every),
            clock: args.clock,
            format,
        })
    }
}
