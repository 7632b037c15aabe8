//! # sqlx-prepared-batch
//!
//! Prepared statement batching for SQLx with generated-key retrieval and
//! per-row record mapping.
//!
//! ## Features
//!
//! - **Prepared Batches**: Bind N parameter sets against one statement
//!   template and send them in a single round trip
//! - **Generated-Key Retrieval**: Get server-assigned values back (auto
//!   increment ids, default timestamps) in per-row correspondence with the
//!   order entries were added
//! - **Row Mapping**: Project raw rows into typed records through a
//!   caller-supplied mapper closure or a single-column mapper
//! - **Typed Failures**: Batch failures carry per-statement outcomes and the
//!   native driver error, so partial failures are never collapsed into a
//!   generic message
//! - **Named Placeholders**: Templates may use `:param_name` instead of `?`;
//!   conversion happens at template parse time
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sqlx = { version = "0.8", features = ["mysql", "runtime-tokio"] }
//! sqlx-prepared-batch = "0.1"
//! ```
//!
//! ## Examples
//!
//! ### Batch insert with generated keys
//!
//! ```rust,no_run
//! use sqlx_prepared_batch::{column, PreparedBatch};
//! use sqlx_prepared_batch::mysql::MySqlBatchDriver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut driver = MySqlBatchDriver::connect("mysql://localhost/test").await?;
//!
//! let mut batch = PreparedBatch::new(
//!     &mut driver,
//!     "insert into something (name) values (:name)",
//! )?;
//! batch.add(("Brian",))?.add(("Thom",))?;
//!
//! let ids = batch
//!     .execute_and_generate_keys(column::<i64>("id"), &["id"])
//!     .await?
//!     .list()?;
//! assert_eq!(ids, vec![1, 2]);
//! # Ok(())
//! # }
//! ```
//!
//! ### Multi-column key retrieval with a mapper closure
//!
//! ```rust,no_run
//! use sqlx_prepared_batch::{PreparedBatch, Row};
//! use sqlx_prepared_batch::mysql::MySqlBatchDriver;
//!
//! struct IdCreateTime {
//!     id: i64,
//!     create_time: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let mut driver = MySqlBatchDriver::connect("mysql://localhost/test").await?;
//! let mut batch = PreparedBatch::new(
//!     &mut driver,
//!     "insert into something (name) values (:name)",
//! )?;
//! batch.add(("Brian",))?.add(("Thom",))?;
//!
//! let records = batch
//!     .execute_and_generate_keys(
//!         |_index: usize, row: &Row| -> sqlx_prepared_batch::Result<IdCreateTime> {
//!             Ok(IdCreateTime {
//!                 id: row.get("id")?,
//!                 create_time: row.get("create_time")?,
//!             })
//!         },
//!         &["id", "create_time"],
//!     )
//!     .await?
//!     .list()?;
//! assert_eq!(records.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ### Unwrapping a partial batch failure
//!
//! ```rust,no_run
//! use sqlx_prepared_batch::{Error, PreparedBatch};
//! use sqlx_prepared_batch::mysql::MySqlBatchDriver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let mut driver = MySqlBatchDriver::connect("mysql://localhost/test").await?;
//! let mut batch = PreparedBatch::new(&mut driver, "select insert_func(:name)")?;
//! batch.add(("Brian",))?.add(("Thom",))?;
//!
//! match batch.execute().await {
//!     Ok(counts) => assert_eq!(counts.len(), 2),
//!     Err(Error::Execution(failure)) => {
//!         eprintln!(
//!             "entry {} failed after {} succeeded: {}",
//!             failure.failed_index,
//!             failure.succeeded(),
//!             failure.source,
//!         );
//!     }
//!     Err(other) => return Err(other.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## How It Works
//!
//! 1. **Parse**: the statement template is parsed once; named placeholders
//!    become positional and the placeholder count is fixed
//! 2. **Accumulate**: each `add` validates the argument count and appends an
//!    ordered, owned parameter set; nothing touches the network
//! 3. **Execute**: the batch goes to the driver in one call, which returns
//!    per-entry affected counts or a typed partial failure
//! 4. **Retrieve**: for key generation, the driver's capability flag selects
//!    between one combined result set and per-statement extraction; either
//!    way rows come back in submission order, re-aligned by row count per
//!    statement, and are mapped lazily
//!
//! The driver seam is the [`BatchDriver`] trait; the bundled
//! [`mysql::MySqlBatchDriver`] implements it over a SQLx MySQL connection
//! and any backend can be plugged in by implementing the trait.
//!
//! ## Limitations
//!
//! - The bundled driver targets MySQL; per-statement key synthesis assumes
//!   `auto_increment_increment = 1`
//! - Multi-column key retrieval on MySQL requires a server with `RETURNING`
//!   support (MariaDB 10.5+) and combined-rows mode
//! - Placeholder names must match `[a-zA-Z0-9_]+`
//!
//! ## License
//!
//! Licensed under either of Apache License, Version 2.0 or MIT license at
//! your option.

pub mod batch;
pub mod builder;
pub mod driver;
pub mod error;
pub mod keys;
pub mod mapper;
pub mod mysql;
pub mod query;
pub mod query_as;
pub mod row;
pub mod value;

pub use batch::PreparedBatch;
pub use driver::{BatchDriver, KeyRetrieval, StatementOutcome};
pub use error::{BatchFailure, Error, Result};
pub use keys::GeneratedKeys;
pub use mapper::{column, RowMapper};
pub use query::PreparedQuery;
pub use query_as::{FromRow, PreparedQueryAs};
pub use row::Row;
pub use value::{FromValue, Params, ToValue, Value};

/// Convenience re-exports for common use cases
pub mod prelude {
    pub use crate::batch::PreparedBatch;
    pub use crate::driver::{BatchDriver, KeyRetrieval, StatementOutcome};
    pub use crate::error::{BatchFailure, Error, Result};
    pub use crate::mapper::{column, RowMapper};
    pub use crate::query::PreparedQuery;
    pub use crate::query_as::{FromRow, PreparedQueryAs};
    pub use crate::row::Row;
    pub use crate::value::Value;
}
