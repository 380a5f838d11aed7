use matriarch_session::{parse_param_id, ParamAccess, ParamValue};
use tracing::error;

use crate::exit::{session_code, CliResult, SUCCESS, USAGE};
use crate::output::{print_values, OutputFormat};

/// Read each requested ID in order.
///
/// Bad tokens and failed reads are logged and skipped; the returned code
/// is that of the first one.
pub fn run<S: ParamAccess + ?Sized>(
    store: &S,
    tokens: &[String],
    format: OutputFormat,
) -> CliResult<i32> {
    let mut code = SUCCESS;
    let mut values = Vec::with_capacity(tokens.len());

    for token in tokens {
        let id = match parse_param_id(token) {
            Ok(id) => id,
            Err(err) => {
                error!("{err}");
                first_failure(&mut code, USAGE);
                continue;
            }
        };

        match store.get_param(id) {
            Ok(value) => values.push(ParamValue { id, value }),
            Err(err) => {
                error!(param = id, "failure retrieving parameter: {err}");
                first_failure(&mut code, session_code(&err));
            }
        }
    }

    print_values(&values, format);
    Ok(code)
}

fn first_failure(code: &mut i32, failure: i32) {
    if *code == SUCCESS {
        *code = failure;
    }
}
