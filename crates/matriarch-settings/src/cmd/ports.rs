use matriarch_transport::{MidiPort, MidirInput, MidirOutput, DEFAULT_CLIENT_NAME};

use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_ports, OutputFormat};

/// Print the ports the MIDI backend can see without opening any.
pub fn run(format: OutputFormat) -> CliResult<i32> {
    let inputs = MidirInput::new(DEFAULT_CLIENT_NAME)
        .and_then(|input| input.list_ports())
        .map_err(|err| transport_error("failed to list input ports", err))?;
    let outputs = MidirOutput::new(DEFAULT_CLIENT_NAME)
        .and_then(|output| output.list_ports())
        .map_err(|err| transport_error("failed to list output ports", err))?;

    print_ports(&inputs, &outputs, format);
    Ok(SUCCESS)
}
