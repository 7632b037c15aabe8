use crate::driver::BatchDriver;
use crate::query::PreparedQuery;
use crate::row::Row;

/// Whole-row projection into a concrete record type.
///
/// Implemented by hand per record; field extraction goes through the typed
/// [`Row`] getters, so a missing or mismatched column fails with a mapping
/// error naming the column.
pub trait FromRow: Sized {
    /// # Errors
    ///
    /// Returns [`Error::Mapping`](crate::Error::Mapping) if a column is
    /// missing or does not convert.
    fn from_row(row: &Row) -> crate::Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> crate::Result<Self> {
        Ok(row.clone())
    }
}

/// A prepared statement returning strongly-typed records.
///
/// Thin wrapper over [`PreparedQuery`] that maps every row through
/// [`FromRow`] instead of a per-call mapper.
///
/// # Examples
///
/// ```rust,no_run
/// use sqlx_prepared_batch::{FromRow, PreparedQueryAs, Row};
/// use sqlx_prepared_batch::mysql::MySqlBatchDriver;
///
/// struct Something {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for Something {
///     fn from_row(row: &Row) -> sqlx_prepared_batch::Result<Self> {
///         Ok(Something {
///             id: row.get("id")?,
///             name: row.get("name")?,
///         })
///     }
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut driver = MySqlBatchDriver::connect("mysql://localhost/test").await?;
/// let mut query = PreparedQueryAs::<Something>::new(
///     &mut driver,
///     "select id, name from something order by id",
/// )?;
/// let rows = query.fetch_all().await?;
/// # let _ = rows;
/// # Ok(())
/// # }
/// ```
pub struct PreparedQueryAs<'c, R, D: BatchDriver = crate::mysql::MySqlBatchDriver> {
    inner: PreparedQuery<'c, D>,
    _marker: std::marker::PhantomData<fn() -> R>,
}

impl<'c, R: FromRow, D: BatchDriver> PreparedQueryAs<'c, R, D> {
    /// Prepares a typed statement over `template`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be parsed.
    pub fn new(driver: &'c mut D, template: impl Into<String>) -> crate::Result<Self> {
        Ok(PreparedQueryAs {
            inner: PreparedQuery::new(driver, template)?,
            _marker: std::marker::PhantomData,
        })
    }

    /// Binds the parameter set for the next execution.
    ///
    /// # Errors
    ///
    /// [`Error::Binding`](crate::Error::Binding) on an argument count
    /// mismatch.
    pub fn bind<P: crate::value::Params>(&mut self, params: P) -> crate::Result<&mut Self> {
        self.inner.bind(params)?;
        Ok(self)
    }

    /// Fetches all matching records in result order.
    pub async fn fetch_all(&mut self) -> crate::Result<Vec<R>> {
        self.inner
            .fetch_all(|_index: usize, row: &Row| R::from_row(row))
            .await
    }

    /// Fetches exactly one record.
    pub async fn fetch_one(&mut self) -> crate::Result<R> {
        self.inner
            .fetch_one(|_index: usize, row: &Row| R::from_row(row))
            .await
    }

    /// Fetches at most one record.
    pub async fn fetch_optional(&mut self) -> crate::Result<Option<R>> {
        self.inner
            .fetch_optional(|_index: usize, row: &Row| R::from_row(row))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[derive(Debug, PartialEq)]
    struct Something {
        id: i64,
        name: String,
    }

    impl FromRow for Something {
        fn from_row(row: &Row) -> crate::Result<Self> {
            Ok(Something {
                id: row.get("id")?,
                name: row.get("name")?,
            })
        }
    }

    #[test]
    fn test_from_row_reports_missing_column() {
        let row = Row::new(vec!["id".into()], vec![Value::Int(1)]);
        let err = Something::from_row(&row).unwrap_err();
        match err {
            crate::Error::Mapping { column, .. } => assert_eq!(column, "name"),
            other => panic!("expected Mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_row_projects_fields() {
        let row = Row::new(
            vec!["id".into(), "name".into()],
            vec![Value::Int(2), Value::Text("Thom".into())],
        );
        assert_eq!(
            Something::from_row(&row).unwrap(),
            Something {
                id: 2,
                name: "Thom".into()
            }
        );
    }
}
