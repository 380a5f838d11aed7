use std::time::Duration;

use crate::exit::{CliError, CliResult, USAGE};

/// Longest accepted response wait. The device answers within milliseconds,
/// so anything longer only delays reporting a dead connection.
pub const MAX_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Parse a response timeout: `750ms`, `2s`, `1.5s` or bare seconds (`2`).
///
/// Zero and anything above [`MAX_RESPONSE_TIMEOUT`] are usage errors.
pub fn parse_response_timeout(text: &str) -> CliResult<Duration> {
    let text = text.trim();
    let invalid = |reason: &str| CliError::new(USAGE, format!("invalid timeout '{text}': {reason}"));

    let timeout = match text.strip_suffix("ms") {
        Some(millis) => millis
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| invalid("expected whole milliseconds, e.g. 500ms"))?,
        None => text
            .strip_suffix('s')
            .unwrap_or(text)
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .ok_or_else(|| invalid("expected seconds, e.g. 1 or 1.5s"))?,
    };

    if timeout.is_zero() {
        return Err(invalid("must be greater than zero"));
    }
    if timeout > MAX_RESPONSE_TIMEOUT {
        return Err(invalid(&format!(
            "must not exceed {}s",
            MAX_RESPONSE_TIMEOUT.as_secs()
        )));
    }
    Ok(timeout)
}
