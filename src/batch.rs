use crate::builder::StatementTemplate;
use crate::driver::{BatchDriver, KeyRetrieval};
use crate::keys::GeneratedKeys;
use crate::mapper::RowMapper;
use crate::value::{Params, Value};

/// A batch of parameter sets prepared against one statement template.
///
/// Entries are accumulated with [`add`](PreparedBatch::add) and sent to the
/// backend in one round trip by [`execute`](PreparedBatch::execute) or
/// [`execute_and_generate_keys`](PreparedBatch::execute_and_generate_keys).
/// Submission order is preserved end-to-end: outcome `i` belongs to entry
/// `i`, and generated rows come back in entry order, re-aligned by row count
/// per statement.
///
/// A batch borrows its driver mutably, so nothing else can run on the same
/// connection mid-batch, and it executes at most once.
///
/// # Examples
///
/// ```rust,no_run
/// use sqlx_prepared_batch::{column, PreparedBatch};
/// use sqlx_prepared_batch::mysql::MySqlBatchDriver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut driver = MySqlBatchDriver::connect("mysql://localhost/test").await?;
///
/// let mut batch = PreparedBatch::new(
///     &mut driver,
///     "insert into something (name) values (:name)",
/// )?;
/// batch.add(("Brian",))?.add(("Thom",))?;
///
/// let ids = batch
///     .execute_and_generate_keys(column::<i64>("id"), &["id"])
///     .await?
///     .list()?;
/// assert_eq!(ids, vec![1, 2]);
/// # Ok(())
/// # }
/// ```
pub struct PreparedBatch<'c, D: BatchDriver> {
    driver: &'c mut D,
    template: StatementTemplate,
    entries: Vec<Vec<Value>>,
    consumed: bool,
}

impl<'c, D: BatchDriver> PreparedBatch<'c, D> {
    /// Prepares a batch over `template`, which may use named (`:name`) or
    /// positional (`?`) placeholders.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be parsed.
    pub fn new(driver: &'c mut D, template: impl Into<String>) -> crate::Result<Self> {
        Ok(PreparedBatch {
            driver,
            template: StatementTemplate::parse(template)?,
            entries: Vec::new(),
            consumed: false,
        })
    }

    /// Binds one parameter set and appends it to the batch.
    ///
    /// Returns the batch for chaining. A rejected add leaves previously
    /// added entries intact.
    ///
    /// # Errors
    ///
    /// [`Error::Binding`](crate::Error::Binding) if the argument count does
    /// not match the template's placeholder count, and
    /// [`Error::BatchConsumed`](crate::Error::BatchConsumed) if the batch
    /// already executed.
    pub fn add<P: Params>(&mut self, params: P) -> crate::Result<&mut Self> {
        if self.consumed {
            return Err(crate::Error::BatchConsumed);
        }
        let values = params.into_values();
        if values.len() != self.template.parameter_count() {
            return Err(crate::Error::Binding {
                expected: self.template.parameter_count(),
                actual: values.len(),
            });
        }
        self.entries.push(values);
        Ok(self)
    }

    /// Number of entries added so far.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// The driver-ready SQL of the template.
    pub fn sql(&self) -> &str {
        self.template.sql()
    }

    /// Sends all entries to the backend as one batch.
    ///
    /// Returns one affected-row count per entry, in submission order. A
    /// count of zero is a success; statements executed for side effects
    /// (e.g. procedure calls) report zero affected rows.
    ///
    /// # Errors
    ///
    /// [`Error::Execution`](crate::Error::Execution) carrying the
    /// [`BatchFailure`](crate::BatchFailure) the backend reported, or
    /// [`Error::BatchConsumed`](crate::Error::BatchConsumed) on reuse.
    pub async fn execute(&mut self) -> crate::Result<Vec<u64>> {
        self.take()?;
        tracing::debug!(entries = self.entries.len(), sql = self.sql(), "executing batch");
        let counts = self
            .driver
            .execute_batch(self.template.sql(), &self.entries)
            .await?;
        Ok(counts)
    }

    /// Executes the batch while retrieving the named generated columns for
    /// every affected row.
    ///
    /// An empty `columns` slice requests the backend's default generated-key
    /// column. Each returned row is handed to `mapper` together with its
    /// zero-based position in the combined stream; record `n` corresponds to
    /// the `n`-th affected row across the batch in submission order. Entries
    /// affecting zero rows contribute nothing and do not shift later
    /// records.
    ///
    /// The extraction path follows the driver's
    /// [`KeyRetrieval`](crate::KeyRetrieval) capability; both paths produce
    /// identical caller-visible ordering.
    ///
    /// # Errors
    ///
    /// As [`execute`](PreparedBatch::execute); mapper failures surface later,
    /// per row, while iterating the returned sequence.
    pub async fn execute_and_generate_keys<T, M>(
        &mut self,
        mapper: M,
        columns: &[&str],
    ) -> crate::Result<GeneratedKeys<T, M>>
    where
        M: RowMapper<T>,
    {
        self.take()?;
        let columns: Vec<String> = columns.iter().map(|c| (*c).to_owned()).collect();
        tracing::debug!(
            entries = self.entries.len(),
            sql = self.sql(),
            columns = ?columns,
            "executing batch with key generation"
        );
        let rows = match self.driver.key_retrieval() {
            KeyRetrieval::CombinedRows => {
                self.driver
                    .execute_batch_returning(self.template.sql(), &self.entries, &columns)
                    .await?
            }
            KeyRetrieval::PerStatement => {
                let per_statement = self
                    .driver
                    .execute_batch_keys_per_statement(self.template.sql(), &self.entries, &columns)
                    .await?;
                per_statement.into_iter().flatten().collect()
            }
        };
        Ok(GeneratedKeys::new(rows, mapper))
    }

    fn take(&mut self) -> crate::Result<()> {
        if self.consumed {
            return Err(crate::Error::BatchConsumed);
        }
        self.consumed = true;
        Ok(())
    }
}

impl<D: BatchDriver> std::fmt::Debug for PreparedBatch<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedBatch")
            .field("sql", &self.template.sql())
            .field("entries", &self.entries.len())
            .field("consumed", &self.consumed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::StatementOutcome;
    use crate::error::BatchFailure;
    use crate::row::Row;
    use async_trait::async_trait;

    /// Driver stub that records what reached it; batch population never
    /// touches the network, so every call here is a test failure.
    struct UnreachableDriver;

    #[async_trait]
    impl BatchDriver for UnreachableDriver {
        fn key_retrieval(&self) -> KeyRetrieval {
            KeyRetrieval::CombinedRows
        }

        async fn execute(&mut self, _sql: &str, _params: &[Value]) -> crate::Result<u64> {
            panic!("driver reached during accumulation");
        }

        async fn query(&mut self, _sql: &str, _params: &[Value]) -> crate::Result<Vec<Row>> {
            panic!("driver reached during accumulation");
        }

        async fn execute_batch(
            &mut self,
            _sql: &str,
            _entries: &[Vec<Value>],
        ) -> Result<Vec<u64>, BatchFailure> {
            panic!("driver reached during accumulation");
        }

        async fn execute_batch_returning(
            &mut self,
            _sql: &str,
            _entries: &[Vec<Value>],
            _columns: &[String],
        ) -> crate::Result<Vec<Row>> {
            panic!("driver reached during accumulation");
        }

        async fn execute_batch_keys_per_statement(
            &mut self,
            _sql: &str,
            _entries: &[Vec<Value>],
            _columns: &[String],
        ) -> crate::Result<Vec<Vec<Row>>> {
            panic!("driver reached during accumulation");
        }
    }

    #[test]
    fn test_add_validates_parameter_count() {
        let mut driver = UnreachableDriver;
        let mut batch =
            PreparedBatch::new(&mut driver, "insert into t (a, b) values (:a, :b)").unwrap();
        batch.add(("x", 1i32)).unwrap();

        let err = batch.add(("only-one",)).unwrap_err();
        match err {
            crate::Error::Binding { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected Binding error, got {other:?}"),
        }
        // The rejected add must not disturb what was already accumulated.
        assert_eq!(batch.size(), 1);
    }

    #[test]
    fn test_add_chains() {
        let mut driver = UnreachableDriver;
        let mut batch =
            PreparedBatch::new(&mut driver, "insert into t (name) values (:name)").unwrap();
        batch.add(("Brian",)).unwrap().add(("Thom",)).unwrap();
        assert_eq!(batch.size(), 2);
        assert_eq!(batch.sql(), "insert into t (name) values (?)");
    }

    #[test]
    fn test_debug_renders_without_driver() {
        let mut driver = UnreachableDriver;
        let mut batch =
            PreparedBatch::new(&mut driver, "insert into t (name) values (:name)").unwrap();
        batch.add(("Brian",)).unwrap();
        let rendered = format!("{batch:?}");
        assert!(rendered.contains("insert into t (name) values (?)"), "{rendered}");
        assert!(rendered.contains("entries: 1"), "{rendered}");
    }

    #[test]
    fn test_statement_outcome_accessors() {
        assert!(StatementOutcome::Succeeded(0).is_success());
        assert_eq!(StatementOutcome::Succeeded(3).rows_affected(), Some(3));
        assert_eq!(StatementOutcome::Failed.rows_affected(), None);
    }
}
