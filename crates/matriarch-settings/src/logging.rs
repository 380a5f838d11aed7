use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

use crate::exit::{CliError, CliResult, USAGE};

/// Targets that `--log-level` applies to. Dependencies stay at `warn`.
const TOOL_TARGETS: [&str; 4] = [
    "matriarch_settings",
    "matriarch_session",
    "matriarch_transport",
    "matriarch_frame",
];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Event filter for `level`, with `extra` directives in `EnvFilter` syntax
/// layered on top (`matriarch_transport=trace` dumps every sysex frame).
pub fn build_filter(level: LogLevel, extra: Option<&str>) -> CliResult<EnvFilter> {
    let base = level.min(LogLevel::Warn).directive();
    let mut directives = vec![base.to_string()];
    directives.extend(
        TOOL_TARGETS
            .iter()
            .map(|target| format!("{target}={}", level.directive())),
    );
    if let Some(extra) = extra.map(str::trim).filter(|extra| !extra.is_empty()) {
        directives.push(extra.to_string());
    }

    EnvFilter::try_new(directives.join(",")).map_err(|err| {
        CliError::new(
            USAGE,
            format!("invalid log filter '{}': {err}", extra.unwrap_or_default()),
        )
    })
}

/// Install the stderr subscriber. Stdout is reserved for results.
///
/// Event targets are shown once output is verbose enough to mix layers.
pub fn init_logging(format: LogFormat, level: LogLevel, extra: Option<&str>) -> CliResult<()> {
    let filter = build_filter(level, extra)?;
    let show_targets = level >= LogLevel::Debug || extra.is_some();

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(show_targets);

    // A second install only happens in tests; the first subscriber stays.
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    Ok(())
}
