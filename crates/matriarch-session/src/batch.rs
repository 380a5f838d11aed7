use serde::Serialize;
use tracing::{info, trace, warn};

use crate::directive::{Directive, DirectiveError};
use crate::error::SessionError;
use crate::session::ParamAccess;

/// What happened to one directive that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DirectiveOutcome {
    /// The parameter already held the requested value; nothing was written.
    Unchanged { id: u16, value: u16 },
    /// Written and confirmed by read-back.
    Applied { id: u16, previous: u16, value: u16 },
    /// Written, but read-back returned a different value.
    VerificationMismatch {
        id: u16,
        previous: u16,
        expected: u16,
        actual: u16,
    },
    /// Written, but the read-back itself failed.
    VerifyReadFailed {
        id: u16,
        previous: u16,
        expected: u16,
        error: String,
    },
}

impl DirectiveOutcome {
    /// The parameter this outcome is about.
    pub fn id(&self) -> u16 {
        match *self {
            Self::Unchanged { id, .. }
            | Self::Applied { id, .. }
            | Self::VerificationMismatch { id, .. }
            | Self::VerifyReadFailed { id, .. } => id,
        }
    }

    /// Whether the write happened but could not be confirmed.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::VerificationMismatch { .. } | Self::VerifyReadFailed { .. }
        )
    }
}

/// Why a batch stopped early.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The directive text was malformed.
    #[error("invalid directive '{text}': {source}")]
    Parse {
        text: String,
        #[source]
        source: DirectiveError,
    },

    /// The current value could not be read, so no write was attempted.
    #[error("failed to read parameter {id}, not attempting write: {source}")]
    ReadFailed {
        id: u16,
        #[source]
        source: SessionError,
    },

    /// The write request could not be sent.
    #[error("failed to set parameter {id}: {source}")]
    WriteFailed {
        id: u16,
        #[source]
        source: SessionError,
    },
}

/// The directive a batch stopped at.
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the failing directive in the input.
    pub index: usize,
    pub error: BatchError,
}

/// Result of applying a batch.
///
/// Directives before the failure point have taken effect on the device and
/// are not rolled back.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per directive that ran to completion, in input order.
    pub outcomes: Vec<DirectiveOutcome>,
    pub failure: Option<BatchFailure>,
}

impl BatchReport {
    /// True when every directive ran to completion.
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// Index of the directive the batch stopped at.
    pub fn failed_at(&self) -> Option<usize> {
        self.failure.as_ref().map(|failure| failure.index)
    }

    /// True when any completed directive could not be verified.
    pub fn has_warnings(&self) -> bool {
        self.outcomes.iter().any(DirectiveOutcome::is_warning)
    }
}

/// Applies `ID=VALUE` directives with read, compare, write, verify.
pub struct BatchUpdater<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: ParamAccess + ?Sized> BatchUpdater<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Apply `directives` in order, stopping at the first parse, read or
    /// write failure.
    pub fn apply<T: AsRef<str>>(&self, directives: &[T]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, text) in directives.iter().enumerate() {
            let text = text.as_ref();
            let result = text
                .parse::<Directive>()
                .map_err(|source| BatchError::Parse {
                    text: text.to_string(),
                    source,
                })
                .and_then(|directive| self.apply_one(directive));

            match result {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(error) => {
                    report.failure = Some(BatchFailure { index, error });
                    break;
                }
            }
        }

        report
    }

    fn apply_one(&self, directive: Directive) -> Result<DirectiveOutcome, BatchError> {
        let Directive { id, value } = directive;

        let previous = self
            .store
            .get_param(id)
            .map_err(|source| BatchError::ReadFailed { id, source })?;

        if previous == value {
            warn!(
                param = id,
                value, "ignoring write request as no change is required"
            );
            return Ok(DirectiveOutcome::Unchanged { id, value });
        }
        trace!(param = id, previous, "read current value");

        self.store
            .set_param(id, value)
            .map_err(|source| BatchError::WriteFailed { id, source })?;

        let outcome = match self.store.get_param(id) {
            Ok(actual) if actual == value => {
                info!(param = id, previous, value, "read back verification successful");
                DirectiveOutcome::Applied {
                    id,
                    previous,
                    value,
                }
            }
            Ok(actual) => {
                warn!(
                    param = id,
                    expected = value,
                    actual,
                    "read back verification not successful"
                );
                DirectiveOutcome::VerificationMismatch {
                    id,
                    previous,
                    expected: value,
                    actual,
                }
            }
            Err(err) => {
                warn!(param = id, %err, "failed to read back parameter after write");
                DirectiveOutcome::VerifyReadFailed {
                    id,
                    previous,
                    expected: value,
                    error: err.to_string(),
                }
            }
        };

        Ok(outcome)
    }
}
