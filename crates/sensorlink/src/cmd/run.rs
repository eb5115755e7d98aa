use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use sensorlink_transport::{validate_baud, SerialConfig, SerialLink};
use tracing::{info, warn};

use crate::cmd::{parse_duration, RunArgs};
use crate::cycle::run_cycle;
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::generator::RecordSource;
use crate::output::{print_report, OutputFormat};

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    let write_timeout = args
        .write_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?;
    validate_baud(args.baud).map_err(|err| CliError::new(USAGE, err.to_string()))?;

    let mut link = SerialLink::new(
        &args.device,
        SerialConfig {
            baud: args.baud,
            write_timeout,
        },
    );
    let mut source = match args.seed {
        Some(seed) => RecordSource::with_seed(seed),
        None => RecordSource::new(),
    };

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    if let Err(err) = ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst)) {
        warn!(%err, "ctrl-c handler not installed");
    }

    info!(device = %args.device.display(), baud = args.baud, "telemetry loop started");

    let mut cycles = 0u64;
    while running.load(Ordering::SeqCst) {
        let record = source.next_record();
        let report = run_cycle(&mut link, record);
        if !report.succeeded() {
            // Failures never stop the loop; the next cycle is independent.
            warn!(category = report.category, "cycle failed");
        }
        print_report(&report, format);

        cycles += 1;
        if args.count.is_some_and(|count| cycles >= count) {
            break;
        }
        thread::sleep(interval);
    }

    info!(cycles, "telemetry loop stopped");
    Ok(SUCCESS)
}
