use bytes::Bytes;
use sensorlink_frame::Record;
use sensorlink_transport::{validate_baud, SerialConfig, SerialLink};

use crate::cmd::{parse_duration, SendArgs};
use crate::cycle::{run_cycle, CycleOutcome};
use crate::exit::{frame_error, transport_error, CliError, CliResult, SUCCESS, USAGE};
use crate::generator::unix_now;
use crate::output::{print_report, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let write_timeout = args
        .write_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?;
    validate_baud(args.baud).map_err(|err| CliError::new(USAGE, err.to_string()))?;

    let payload = resolve_payload(&args)?;
    let record = Record::new(
        args.category,
        args.rssi,
        payload,
        args.timestamp.unwrap_or_else(unix_now),
    )
    .map_err(|err| frame_error("record rejected", err))?;

    let mut link = SerialLink::new(
        &args.device,
        SerialConfig {
            baud: args.baud,
            write_timeout,
        },
    );
    let report = run_cycle(&mut link, record);
    print_report(&report, format);

    match report.outcome {
        CycleOutcome::Sent { .. } => Ok(SUCCESS),
        CycleOutcome::EncodeFailed { reason } => Err(frame_error("encode failed", reason)),
        CycleOutcome::WriteFailed { reason } => Err(transport_error("transmit failed", reason)),
    }
}

fn resolve_payload(args: &SendArgs) -> CliResult<Bytes> {
    if let Some(payload) = &args.payload {
        let cleaned: String = payload.split_whitespace().collect();
        let bytes = hex::decode(&cleaned)
            .map_err(|err| CliError::new(USAGE, format!("invalid hex payload: {err}")))?;
        return Ok(Bytes::from(bytes));
    }
    if let Some(text) = &args.text {
        return Ok(Bytes::copy_from_slice(text.as_bytes()));
    }
    Ok(Bytes::new())
}
