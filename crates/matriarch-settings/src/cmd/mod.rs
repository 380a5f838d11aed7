use std::time::Duration;

use clap::Args;
use matriarch_session::{DeviceSession, ParamAccess, SessionConfig};
use matriarch_transport::{find_port, MidiPort, MidirInput, MidirOutput, DEFAULT_CLIENT_NAME};
use tracing::{debug, error, info};

use crate::exit::{session_error, transport_error, CliError, CliResult, SUCCESS};
use crate::output::OutputFormat;
use crate::timeout::parse_response_timeout;

pub mod dump;
pub mod ports;
pub mod query;
pub mod set;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Parameter ID to query (repeatable, comma-separated).
    #[arg(short = 'q', long, value_name = "ID", value_delimiter = ',')]
    pub query_param: Vec<String>,

    /// Parameter to set as ID=VALUE (repeatable, comma-separated).
    #[arg(short = 's', long, value_name = "ID=VALUE", value_delimiter = ',')]
    pub set_param: Vec<String>,

    /// Substring of the MIDI port name to connect to.
    #[arg(long, value_name = "NAME", env = "MATRIARCH_DEVICE", default_value = "Matriarch")]
    pub device: String,

    /// Time to wait for each response (e.g. 1s, 1.5s, 500ms; at most 10s).
    #[arg(long, value_name = "DURATION", env = "MATRIARCH_TIMEOUT", default_value = "1s")]
    pub timeout: String,

    /// List visible MIDI ports and exit.
    #[arg(long)]
    pub list_ports: bool,
}

pub type MidiSession = DeviceSession<MidirInput, MidirOutput>;

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_response_timeout(&args.timeout)?;

    if args.list_ports {
        return ports::run(format);
    }

    let session = connect(&args.device, timeout)?;
    execute(&session, &args.query_param, &args.set_param, format)
}

/// Run the requested queries, then the requested writes. With neither,
/// dump every parameter.
///
/// Every step runs even after an earlier one failed; the first failure
/// decides the exit code.
pub fn execute<S: ParamAccess + ?Sized>(
    store: &S,
    queries: &[String],
    sets: &[String],
    format: OutputFormat,
) -> CliResult<i32> {
    if queries.is_empty() && sets.is_empty() {
        return dump::run(store, format);
    }

    let mut code = SUCCESS;
    if !queries.is_empty() {
        code = query::run(store, queries, format)?;
    }

    if !sets.is_empty() {
        match set::run(store, sets, format) {
            Ok(set_code) if code == SUCCESS => code = set_code,
            Ok(_) => {}
            Err(err) if code == SUCCESS => return Err(err),
            Err(err) => error!("{err}"),
        }
    }

    Ok(code)
}

/// Find the device's input and output ports, then open both.
fn connect(device: &str, timeout: Duration) -> CliResult<MidiSession> {
    let mut input = MidirInput::new(DEFAULT_CLIENT_NAME)
        .map_err(|err| transport_error("MIDI input unavailable", err))?;
    let mut output = MidirOutput::new(DEFAULT_CLIENT_NAME)
        .map_err(|err| transport_error("MIDI output unavailable", err))?;

    let in_port = find_port(&input, device).map_err(not_detected)?;
    let out_port = find_port(&output, device).map_err(not_detected)?;

    input
        .open(in_port.index)
        .map_err(|err| transport_error("failed to open input port", err))?;
    output
        .open(out_port.index)
        .map_err(|err| transport_error("failed to open output port", err))?;
    info!(input = %in_port.name, output = %out_port.name, "connected");

    let config = SessionConfig {
        response_timeout: timeout,
    };
    debug!(?timeout, "session configured");
    DeviceSession::with_config(input, output, config)
        .map_err(|err| session_error("failed to start session", err))
}

fn not_detected(err: matriarch_transport::TransportError) -> CliError {
    transport_error("device not detected, connect it over USB", err)
}
