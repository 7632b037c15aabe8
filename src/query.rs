use crate::builder::StatementTemplate;
use crate::driver::BatchDriver;
use crate::mapper::RowMapper;
use crate::value::{Params, Value};

/// A single prepared statement with mapper-driven row retrieval.
///
/// The one-statement companion to [`PreparedBatch`](crate::PreparedBatch),
/// typically used for the follow-up reads around a batch: execute the batch,
/// then query the table back through the same driver. Unlike a batch, a
/// query is reusable; [`bind`](PreparedQuery::bind) replaces the previous
/// parameter set.
///
/// # Examples
///
/// ```rust,no_run
/// use sqlx_prepared_batch::{PreparedQuery, Row};
/// use sqlx_prepared_batch::mysql::MySqlBatchDriver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut driver = MySqlBatchDriver::connect("mysql://localhost/test").await?;
///
/// let mut query = PreparedQuery::new(
///     &mut driver,
///     "select id, name from something where id > :min_id",
/// )?;
/// query.bind((0i64,))?;
///
/// let rows = query
///     .fetch_all(|_i: usize, row: &Row| -> sqlx_prepared_batch::Result<(i64, String)> {
///         Ok((row.get("id")?, row.get("name")?))
///     })
///     .await?;
/// # let _ = rows;
/// # Ok(())
/// # }
/// ```
pub struct PreparedQuery<'c, D: BatchDriver> {
    driver: &'c mut D,
    template: StatementTemplate,
    params: Vec<Value>,
}

impl<'c, D: BatchDriver> PreparedQuery<'c, D> {
    /// Prepares a statement over `template` (named or positional
    /// placeholders).
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be parsed.
    pub fn new(driver: &'c mut D, template: impl Into<String>) -> crate::Result<Self> {
        Ok(PreparedQuery {
            driver,
            template: StatementTemplate::parse(template)?,
            params: Vec::new(),
        })
    }

    /// Binds the parameter set for the next execution, replacing any
    /// previous one.
    ///
    /// # Errors
    ///
    /// [`Error::Binding`](crate::Error::Binding) on an argument count
    /// mismatch; the previous parameter set is kept in that case.
    pub fn bind<P: Params>(&mut self, params: P) -> crate::Result<&mut Self> {
        let values = params.into_values();
        if values.len() != self.template.parameter_count() {
            return Err(crate::Error::Binding {
                expected: self.template.parameter_count(),
                actual: values.len(),
            });
        }
        self.params = values;
        Ok(self)
    }

    /// Executes the statement, returning the affected-row count.
    pub async fn execute(&mut self) -> crate::Result<u64> {
        self.check_bound()?;
        tracing::debug!(sql = self.template.sql(), "executing statement");
        self.driver
            .execute(self.template.sql(), &self.params)
            .await
    }

    /// Fetches all rows, mapped through `mapper` in result order.
    pub async fn fetch_all<T, M: RowMapper<T>>(&mut self, mut mapper: M) -> crate::Result<Vec<T>> {
        self.check_bound()?;
        let rows = self.driver.query(self.template.sql(), &self.params).await?;
        rows.iter()
            .enumerate()
            .map(|(index, row)| mapper.map(index, row))
            .collect()
    }

    /// Fetches at most one row.
    ///
    /// # Errors
    ///
    /// [`Error::Resource`](crate::Error::Resource) if more than one row
    /// comes back.
    pub async fn fetch_optional<T, M: RowMapper<T>>(
        &mut self,
        mut mapper: M,
    ) -> crate::Result<Option<T>> {
        self.check_bound()?;
        let rows = self.driver.query(self.template.sql(), &self.params).await?;
        if rows.len() > 1 {
            return Err(crate::Error::Resource(format!(
                "expected at most one row, query returned {}",
                rows.len()
            )));
        }
        rows.first().map(|row| mapper.map(0, row)).transpose()
    }

    /// Fetches exactly one row.
    ///
    /// # Errors
    ///
    /// [`Error::Resource`](crate::Error::Resource) if zero or more than one
    /// row comes back.
    pub async fn fetch_one<T, M: RowMapper<T>>(&mut self, mapper: M) -> crate::Result<T> {
        self.fetch_optional(mapper)
            .await?
            .ok_or_else(|| crate::Error::Resource("query returned no rows".into()))
    }

    fn check_bound(&self) -> crate::Result<()> {
        if self.params.len() != self.template.parameter_count() {
            return Err(crate::Error::Binding {
                expected: self.template.parameter_count(),
                actual: self.params.len(),
            });
        }
        Ok(())
    }
}
