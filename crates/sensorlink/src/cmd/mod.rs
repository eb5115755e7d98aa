use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod run;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate and transmit measurement records on a fixed cadence.
    Run(RunArgs),
    /// Frame and transmit a single record.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Serial device to write frames to.
    pub device: PathBuf,
    /// Line speed in baud.
    #[arg(long, env = "SENSORLINK_BAUD", default_value_t = sensorlink_transport::DEFAULT_BAUD)]
    pub baud: u32,
    /// Idle time between cycles (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    pub interval: String,
    /// Stop after N cycles. Default: run until interrupted.
    #[arg(long)]
    pub count: Option<u64>,
    /// Seed for the record source. Default: entropy-seeded.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Bound each write with a deadline (e.g. 5s, 500ms).
    #[arg(long)]
    pub write_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device to write the frame to.
    pub device: PathBuf,
    /// Line speed in baud.
    #[arg(long, env = "SENSORLINK_BAUD", default_value_t = sensorlink_transport::DEFAULT_BAUD)]
    pub baud: u32,
    /// Record category tag.
    #[arg(long, default_value_t = 0)]
    pub category: u8,
    /// Signal strength in dBm.
    #[arg(long, default_value_t = -50, allow_negative_numbers = true)]
    pub rssi: i8,
    /// Payload as hex bytes (e.g. "AABBCC").
    #[arg(long, conflicts_with = "text")]
    pub payload: Option<String>,
    /// Payload as a UTF-8 string.
    #[arg(long, conflicts_with = "payload")]
    pub text: Option<String>,
    /// Capture timestamp, seconds since the Unix epoch. Default: now.
    #[arg(long)]
    pub timestamp: Option<u32>,
    /// Bound the write with a deadline (e.g. 5s, 500ms).
    #[arg(long)]
    pub write_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
