//! Parameter exchanges with a single Matriarch.
//!
//! This is the layer callers use. It turns the transport's asynchronous,
//! callback-delivered input into blocking `get_param` / `set_param` calls
//! bounded by a response timeout, and builds the batch update and query
//! workflows on top of them.
//!
//! - [`ExchangeState`] — hand-off cell between the delivery thread and the caller
//! - [`DeviceSession`] — owns the ports, encodes requests, enforces single-flight
//! - [`BatchUpdater`] — read, compare, write, verify for `ID=VALUE` directives
//! - [`dump_all`] / [`query_params`] — read-only workflows

pub mod batch;
pub mod directive;
pub mod error;
pub mod exchange;
pub mod query;
pub mod session;

pub use batch::{BatchError, BatchFailure, BatchReport, BatchUpdater, DirectiveOutcome};
pub use directive::{parse_param_id, Directive, DirectiveError};
pub use error::{Result, SessionError};
pub use exchange::ExchangeState;
pub use query::{dump_all, query_params, DumpFailure, DumpReport, ParamValue};
pub use session::{DeviceSession, ParamAccess, SessionConfig, DEFAULT_RESPONSE_TIMEOUT};

pub use matriarch_frame::MAX_PARAMS;
