//! [`BatchDriver`] implementation over a SQLx MySQL connection.
//!
//! MySQL has no combined generated-keys result set, so the driver defaults
//! to [`KeyRetrieval::PerStatement`], synthesizing one key row per affected
//! row from `LAST_INSERT_ID()`. Servers that support `RETURNING` clauses
//! (MariaDB 10.5+) can opt into [`KeyRetrieval::CombinedRows`] with
//! [`MySqlBatchDriver::with_combined_rows`], in which case each statement's
//! inline result rows are concatenated in submission order.

use crate::driver::{BatchDriver, KeyRetrieval, StatementOutcome};
use crate::error::BatchFailure;
use crate::row::Row;
use crate::value::Value;
use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Connection, MySql, Row as _};
use std::sync::Arc;

/// Name MySQL exposes the auto-increment value under when no explicit
/// generated column is requested.
const DEFAULT_KEY_COLUMN: &str = "generated_key";

/// A [`BatchDriver`] over one owned [`MySqlConnection`].
///
/// Owning the connection makes the single-owner rule structural: while a
/// batch borrows the driver, nothing else can interleave a statement on the
/// session. Batches are emulated as sequential executions of the prepared
/// statement on this connection; execution halts at the first failing entry.
pub struct MySqlBatchDriver {
    conn: MySqlConnection,
    retrieval: KeyRetrieval,
}

impl MySqlBatchDriver {
    /// Connects to `url` with per-statement key retrieval.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(url: &str) -> crate::Result<Self> {
        let conn = MySqlConnection::connect(url).await?;
        Ok(MySqlBatchDriver {
            conn,
            retrieval: KeyRetrieval::PerStatement,
        })
    }

    /// Wraps an already-open connection.
    pub fn from_connection(conn: MySqlConnection) -> Self {
        MySqlBatchDriver {
            conn,
            retrieval: KeyRetrieval::PerStatement,
        }
    }

    /// Switches to combined-rows key retrieval for servers where the batched
    /// statements return their generated rows inline (e.g. MariaDB
    /// `INSERT ... RETURNING`).
    pub fn with_combined_rows(mut self) -> Self {
        self.retrieval = KeyRetrieval::CombinedRows;
        self
    }

    /// Closes the underlying connection cleanly.
    pub async fn close(self) -> crate::Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

fn bind_values<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &[Value],
) -> Query<'q, MySql, MySqlArguments> {
    for value in params {
        query = match value {
            Value::Null => query.bind(Option::<i64>::None),
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            Value::Float(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.clone()),
            Value::Bytes(v) => query.bind(v.clone()),
        };
    }
    query
}

fn decode_column(row: &MySqlRow, index: usize, name: &str) -> crate::Result<Value> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::Int));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::Float));
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::Text));
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::Bytes));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Ok(v.map_or(Value::Null, Value::Bool));
    }
    Err(crate::Error::mapping(name, "unsupported column type"))
}

fn convert_rows(rows: Vec<MySqlRow>) -> crate::Result<Vec<Row>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let columns: Arc<Vec<String>> = Arc::new(
        first
            .columns()
            .iter()
            .map(|c| c.name().to_owned())
            .collect(),
    );
    rows.iter()
        .map(|row| {
            let values = columns
                .iter()
                .enumerate()
                .map(|(index, name)| decode_column(row, index, name))
                .collect::<crate::Result<Vec<Value>>>()?;
            Ok(Row::with_columns(Arc::clone(&columns), values))
        })
        .collect()
}

#[async_trait]
impl BatchDriver for MySqlBatchDriver {
    fn key_retrieval(&self) -> KeyRetrieval {
        self.retrieval
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> crate::Result<u64> {
        let result = bind_values(sqlx::query::<MySql>(sql), params)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn query(&mut self, sql: &str, params: &[Value]) -> crate::Result<Vec<Row>> {
        let rows = bind_values(sqlx::query::<MySql>(sql), params)
            .fetch_all(&mut self.conn)
            .await?;
        convert_rows(rows)
    }

    async fn execute_batch(
        &mut self,
        sql: &str,
        entries: &[Vec<Value>],
    ) -> Result<Vec<u64>, BatchFailure> {
        let mut counts = Vec::with_capacity(entries.len());
        for (index, params) in entries.iter().enumerate() {
            let result = bind_values(sqlx::query::<MySql>(sql), params)
                .execute(&mut self.conn)
                .await;
            match result {
                Ok(done) => counts.push(done.rows_affected()),
                Err(err) => {
                    tracing::debug!(entry = index, error = %err, "batch entry failed");
                    let mut outcomes: Vec<StatementOutcome> = counts
                        .iter()
                        .map(|n| StatementOutcome::Succeeded(*n))
                        .collect();
                    outcomes.push(StatementOutcome::Failed);
                    return Err(BatchFailure::halted(outcomes, index, err));
                }
            }
        }
        Ok(counts)
    }

    async fn execute_batch_returning(
        &mut self,
        sql: &str,
        entries: &[Vec<Value>],
        _columns: &[String],
    ) -> crate::Result<Vec<Row>> {
        // The RETURNING clause in the statement text decides the columns;
        // each entry's inline rows are concatenated in submission order.
        let mut combined = Vec::new();
        let mut counts: Vec<u64> = Vec::with_capacity(entries.len());
        for (index, params) in entries.iter().enumerate() {
            let fetched = bind_values(sqlx::query::<MySql>(sql), params)
                .fetch_all(&mut self.conn)
                .await;
            match fetched {
                Ok(rows) => {
                    counts.push(rows.len() as u64);
                    combined.extend(convert_rows(rows)?);
                }
                Err(err) => {
                    let mut outcomes: Vec<StatementOutcome> = counts
                        .iter()
                        .map(|n| StatementOutcome::Succeeded(*n))
                        .collect();
                    outcomes.push(StatementOutcome::Failed);
                    return Err(BatchFailure::halted(outcomes, index, err).into());
                }
            }
        }
        Ok(combined)
    }

    async fn execute_batch_keys_per_statement(
        &mut self,
        sql: &str,
        entries: &[Vec<Value>],
        columns: &[String],
    ) -> crate::Result<Vec<Vec<Row>>> {
        if columns.len() > 1 {
            return Err(crate::Error::Resource(format!(
                "MySQL returns a single auto-increment value per statement; \
                 {} generated columns were requested",
                columns.len()
            )));
        }
        let key_column = columns
            .first()
            .map_or(DEFAULT_KEY_COLUMN, String::as_str)
            .to_owned();
        let header = Arc::new(vec![key_column]);

        let mut per_statement = Vec::with_capacity(entries.len());
        for (index, params) in entries.iter().enumerate() {
            let result = bind_values(sqlx::query::<MySql>(sql), params)
                .execute(&mut self.conn)
                .await;
            match result {
                Ok(done) => {
                    let first_id = done.last_insert_id();
                    let affected = done.rows_affected();
                    // LAST_INSERT_ID() is the first id of a multi-row
                    // insert; consecutive ids assume auto_increment_increment=1.
                    let rows = if first_id == 0 {
                        Vec::new()
                    } else {
                        (0..affected)
                            .map(|offset| {
                                Row::with_columns(
                                    Arc::clone(&header),
                                    vec![Value::Int(first_id as i64 + offset as i64)],
                                )
                            })
                            .collect()
                    };
                    per_statement.push(rows);
                }
                Err(err) => {
                    let mut outcomes: Vec<StatementOutcome> = per_statement
                        .iter()
                        .map(|rows: &Vec<Row>| StatementOutcome::Succeeded(rows.len() as u64))
                        .collect();
                    outcomes.push(StatementOutcome::Failed);
                    return Err(BatchFailure::halted(outcomes, index, err).into());
                }
            }
        }
        Ok(per_statement)
    }
}
