mod cmd;
mod exit;
mod logging;
mod output;
mod timeout;

use clap::Parser;

use crate::cmd::RunArgs;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "matriarch-settings",
    version,
    about = "Query and change Moog Matriarch global settings",
    long_about = "Query and change Moog Matriarch global settings.\n\n\
        With neither --query-param nor --set-param, every parameter is read and printed."
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level for this tool (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        env = "MATRIARCH_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    log_level: LogLevel,

    /// Extra log filter directives, e.g. `matriarch_transport=trace` to dump sysex frames.
    #[arg(long, value_name = "DIRECTIVES", env = "MATRIARCH_LOG", global = true)]
    log_filter: Option<String>,

    #[command(flatten)]
    run: RunArgs,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.log_format, cli.log_level, cli.log_filter.as_deref()) {
        eprintln!("error: {err}");
        std::process::exit(err.code);
    }

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.run, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
