mod cmd;
mod cycle;
mod exit;
mod generator;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "sensorlink", version, about = "Sensor telemetry link CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_subcommand() {
        let cli = Cli::try_parse_from([
            "sensorlink",
            "run",
            "/dev/ttyUSB0",
            "--interval",
            "500ms",
            "--count",
            "3",
        ])
        .expect("run args should parse");

        assert!(matches!(cli.command, Command::Run(_)));
    }

    #[test]
    fn parses_send_with_negative_rssi() {
        let cli = Cli::try_parse_from([
            "sensorlink",
            "send",
            "/dev/ttyUSB0",
            "--rssi",
            "-42",
            "--payload",
            "AABBCC",
        ])
        .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert_eq!(args.rssi, -42);
                assert_eq!(args.payload.as_deref(), Some("AABBCC"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "sensorlink",
            "send",
            "/dev/ttyUSB0",
            "--payload",
            "AA",
            "--text",
            "hello",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_version_subcommand() {
        let cli = Cli::try_parse_from(["sensorlink", "version", "--extended"])
            .expect("version args should parse");
        assert!(matches!(cli.command, Command::Version(_)));
    }
}
