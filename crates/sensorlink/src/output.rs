use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::cycle::{CycleOutcome, CycleReport};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_report(report: &CycleReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CATEGORY", "SIGNAL", "LENGTH", "CAPTURED", "OUTCOME"])
                .add_row(vec![
                    report.category.to_string(),
                    format!("{} dBm", report.signal_strength),
                    report.payload_length.to_string(),
                    report.captured_at.to_string(),
                    outcome_summary(&report.outcome),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "category={} signal={}dBm length={} captured_at={} {}",
                report.category,
                report.signal_strength,
                report.payload_length,
                report.captured_at,
                outcome_summary(&report.outcome)
            );
        }
    }
}

fn outcome_summary(outcome: &CycleOutcome) -> String {
    match outcome {
        CycleOutcome::Sent {
            bytes_written,
            frame_hex,
        } => format!("sent {bytes_written} bytes: {frame_hex}"),
        CycleOutcome::EncodeFailed { reason } => format!("encode failed: {reason}"),
        CycleOutcome::WriteFailed { reason } => format!("write failed: {reason}"),
    }
}
