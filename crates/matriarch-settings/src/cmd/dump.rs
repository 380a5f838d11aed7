use matriarch_session::{dump_all, ParamAccess};

use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_values, OutputFormat};

/// Print every parameter, stopping at the first read that fails.
pub fn run<S: ParamAccess + ?Sized>(store: &S, format: OutputFormat) -> CliResult<i32> {
    let report = dump_all(store);
    print_values(&report.values, format);

    match report.failure {
        Some(failure) => Err(session_error(
            &format!("failure retrieving parameter {}", failure.id),
            failure.error,
        )),
        None => Ok(SUCCESS),
    }
}
