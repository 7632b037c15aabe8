use crate::driver::StatementOutcome;

/// Error types for sqlx-prepared-batch
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error during SQL template parsing
    #[error("Failed to parse SQL template: {0}")]
    Parse(#[from] regex::Error),

    /// Argument count did not match the template's placeholder count
    #[error("Template expects {expected} parameter(s), {actual} were bound")]
    Binding { expected: usize, actual: usize },

    /// One of the statements in a submitted batch failed at the backend
    #[error(transparent)]
    Execution(#[from] BatchFailure),

    /// The row mapper could not project a column of a result row
    #[error("Failed to map column '{column}': {reason}")]
    Mapping { column: String, reason: String },

    /// Failure acquiring or releasing a statement or cursor resource
    #[error("Statement resource error: {0}")]
    Resource(String),

    /// Error from SQLx database operations
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The batch was already executed; a batch runs at most once
    #[error("Batch was already executed; build a new batch to run again")]
    BatchConsumed,
}

impl Error {
    /// Builds a [`Error::Mapping`] for `column`, preserving the failure text.
    pub fn mapping(column: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Mapping {
            column: column.into(),
            reason: reason.to_string(),
        }
    }
}

/// A batch that failed partway through at the backend.
///
/// Carries everything the driver reported: the per-statement outcomes that
/// were produced around the failure, which entry failed, whether the backend
/// kept executing the remaining entries, and the native driver error as the
/// `source` so callers can downcast to it (e.g. to [`sqlx::Error`]).
///
/// ```rust
/// # use sqlx_prepared_batch::Error;
/// fn native(err: &Error) -> Option<&sqlx::Error> {
///     match err {
///         Error::Execution(failure) => failure.source.downcast_ref::<sqlx::Error>(),
///         _ => None,
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
#[error("Batch entry {failed_index} of {} failed: {source}", .outcomes.len())]
pub struct BatchFailure {
    /// Outcome of every entry the backend reported on, in submission order.
    pub outcomes: Vec<StatementOutcome>,
    /// Zero-based index of the entry that failed.
    pub failed_index: usize,
    /// Whether the backend continued executing entries after the failure.
    pub continued: bool,
    /// The native driver error for the failed entry.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl BatchFailure {
    /// The failure reported by a backend that stops at the first bad entry.
    pub fn halted(
        outcomes: Vec<StatementOutcome>,
        failed_index: usize,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        BatchFailure {
            outcomes,
            failed_index,
            continued: false,
            source: Box::new(source),
        }
    }

    /// Number of entries the backend completed successfully.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }
}

/// Result type alias for sqlx-prepared-batch operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_failure_reports_failed_entry() {
        let failure = BatchFailure::halted(
            vec![StatementOutcome::Succeeded(1), StatementOutcome::Failed],
            1,
            sqlx::Error::Protocol("duplicate key".into()),
        );
        let text = failure.to_string();
        assert!(text.contains("entry 1"), "{text}");
        assert_eq!(failure.succeeded(), 1);
    }

    #[test]
    fn batch_failure_source_downcasts_to_native_error() {
        let failure = BatchFailure::halted(
            vec![StatementOutcome::Failed],
            0,
            sqlx::Error::Protocol("boom".into()),
        );
        let err = Error::from(failure);
        let Error::Execution(failure) = &err else {
            panic!("expected Execution variant");
        };
        assert!(failure.source.downcast_ref::<sqlx::Error>().is_some());
    }
}
