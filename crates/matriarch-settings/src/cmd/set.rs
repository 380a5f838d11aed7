use matriarch_session::{BatchUpdater, ParamAccess};
use tracing::warn;

use crate::exit::{batch_error, CliResult, SUCCESS, VERIFY_WARNING};
use crate::output::{print_outcomes, OutputFormat};

/// Apply `ID=VALUE` directives in order.
pub fn run<S: ParamAccess + ?Sized>(
    store: &S,
    directives: &[String],
    format: OutputFormat,
) -> CliResult<i32> {
    let report = BatchUpdater::new(store).apply(directives);
    print_outcomes(&report.outcomes, format);

    if let Some(failure) = report.failure {
        let context = format!(
            "stopped at directive {} of {}",
            failure.index + 1,
            directives.len()
        );
        return Err(batch_error(&context, failure.error));
    }

    if report.has_warnings() {
        warn!("some writes could not be verified");
        return Ok(VERIFY_WARNING);
    }
    Ok(SUCCESS)
}
