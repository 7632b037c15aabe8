use crate::row::Row;
use crate::value::FromValue;

/// Caller-supplied projection of one result row into a typed record.
///
/// `index` is the zero-based position of the row within the overall result
/// stream. The trait is blanket-implemented for closures, so call sites
/// pass a closure directly:
///
/// ```
/// use sqlx_prepared_batch::{Row, RowMapper};
///
/// struct IdName {
///     id: i64,
///     name: String,
/// }
///
/// fn mapper() -> impl RowMapper<IdName> {
///     |_index: usize, row: &Row| -> sqlx_prepared_batch::Result<IdName> {
///         Ok(IdName {
///             id: row.get("id")?,
///             name: row.get("name")?,
///         })
///     }
/// }
/// # let _ = mapper();
/// ```
pub trait RowMapper<T> {
    /// # Errors
    ///
    /// A [`Error::Mapping`](crate::Error::Mapping) (or any other error)
    /// returned here propagates to the caller for this row; it does not
    /// disturb records already produced.
    fn map(&mut self, index: usize, row: &Row) -> crate::Result<T>;
}

impl<T, F> RowMapper<T> for F
where
    F: FnMut(usize, &Row) -> crate::Result<T>,
{
    fn map(&mut self, index: usize, row: &Row) -> crate::Result<T> {
        self(index, row)
    }
}

/// A mapper picking a single named column of every row.
///
/// The batched analogue of projecting one generated column, e.g. the
/// auto-increment id of each inserted row:
///
/// ```
/// use sqlx_prepared_batch::{column, Row, RowMapper};
/// use sqlx_prepared_batch::value::Value;
///
/// let mut ids = column::<i64>("id");
/// let row = Row::new(vec!["id".into()], vec![Value::Int(5)]);
/// assert_eq!(ids.map(0, &row)?, 5);
/// # Ok::<(), sqlx_prepared_batch::Error>(())
/// ```
pub fn column<T: FromValue>(name: &str) -> impl FnMut(usize, &Row) -> crate::Result<T> {
    let column = name.to_owned();
    move |_index, row| row.get(&column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_closure_mapper_sees_position() {
        let row = Row::new(vec!["id".into()], vec![Value::Int(10)]);
        let mut mapper = |index: usize, row: &Row| -> crate::Result<(usize, i64)> {
            Ok((index, row.get::<i64>("id")?))
        };
        assert_eq!(mapper.map(3, &row).unwrap(), (3, 10));
    }

    #[test]
    fn test_column_mapper_missing_column() {
        let row = Row::new(vec!["id".into()], vec![Value::Int(10)]);
        let mut mapper = column::<i64>("created_at");
        let err = mapper.map(0, &row).unwrap_err();
        assert!(matches!(err, crate::Error::Mapping { .. }));
    }
}
