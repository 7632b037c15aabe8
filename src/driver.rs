//! The seam between the batching layer and a concrete database backend.
//!
//! Everything above this trait is backend-agnostic; everything below it
//! (connections, wire protocol, dialect) belongs to the driver. The bundled
//! [`MySqlBatchDriver`](crate::mysql::MySqlBatchDriver) implements it over
//! SQLx; tests implement it in memory.

use crate::error::BatchFailure;
use crate::row::Row;
use crate::value::Value;
use async_trait::async_trait;

/// How a backend hands generated keys back for a batch.
///
/// Selected once per driver at construction time; the retrieval layer picks
/// the matching extraction path and callers see identical ordering either
/// way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRetrieval {
    /// One combined result set spanning the whole batch, rows in submission
    /// order, one row per affected row per statement.
    CombinedRows,
    /// Keys must be pulled per statement after execution; the retrieval
    /// layer flattens them in submission order.
    PerStatement,
}

/// Result of one statement within an executed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementOutcome {
    /// The statement executed; carries the affected-row count. A count of
    /// zero is still a success (e.g. an update matching nothing, or a void
    /// procedure call).
    Succeeded(u64),
    /// The backend reported a failure for this statement.
    Failed,
}

impl StatementOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StatementOutcome::Succeeded(_))
    }

    /// Affected-row count, if the statement succeeded.
    pub fn rows_affected(&self) -> Option<u64> {
        match self {
            StatementOutcome::Succeeded(n) => Some(*n),
            StatementOutcome::Failed => None,
        }
    }
}

/// A database backend able to execute statements and batches.
///
/// Implementations own a single connection (or equivalent session); the
/// batching layer borrows the driver mutably for the duration of each call,
/// so no other statement can interleave mid-batch. Implementations perform
/// no retry; errors surface exactly once.
#[async_trait]
pub trait BatchDriver: Send {
    /// Which generated-key extraction path this backend supports.
    fn key_retrieval(&self) -> KeyRetrieval;

    /// Executes a single statement, returning the affected-row count.
    async fn execute(&mut self, sql: &str, params: &[Value]) -> crate::Result<u64>;

    /// Executes a single row-returning statement.
    async fn query(&mut self, sql: &str, params: &[Value]) -> crate::Result<Vec<Row>>;

    /// Executes every parameter set against `sql` as one batch.
    ///
    /// On success returns one affected-row count per entry, in submission
    /// order. On failure returns a [`BatchFailure`] carrying the outcomes
    /// produced around the failure, the failing entry's index, and the
    /// native backend error.
    async fn execute_batch(
        &mut self,
        sql: &str,
        entries: &[Vec<Value>],
    ) -> Result<Vec<u64>, BatchFailure>;

    /// Executes the batch while requesting `columns` back for every affected
    /// row, as one combined result set in submission order.
    ///
    /// An empty `columns` slice requests the backend's default generated-key
    /// column. Only meaningful for [`KeyRetrieval::CombinedRows`] backends;
    /// others should return [`Error::Resource`](crate::Error::Resource).
    async fn execute_batch_returning(
        &mut self,
        sql: &str,
        entries: &[Vec<Value>],
        columns: &[String],
    ) -> crate::Result<Vec<Row>>;

    /// Executes the batch, then extracts generated rows statement by
    /// statement: element `i` of the result holds the generated rows of
    /// entry `i` (possibly empty).
    ///
    /// Only meaningful for [`KeyRetrieval::PerStatement`] backends; others
    /// should return [`Error::Resource`](crate::Error::Resource).
    async fn execute_batch_keys_per_statement(
        &mut self,
        sql: &str,
        entries: &[Vec<Value>],
        columns: &[String],
    ) -> crate::Result<Vec<Vec<Row>>>;
}
