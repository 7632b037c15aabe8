use crate::value::{FromValue, Value};
use std::sync::Arc;

/// A single result row with column access by name or position.
///
/// Access is strictly typed: each getter converts through [`FromValue`] and
/// a missing column or incompatible type fails with
/// [`Error::Mapping`](crate::Error::Mapping) carrying the column name.
///
/// # Examples
///
/// ```
/// use sqlx_prepared_batch::Row;
/// use sqlx_prepared_batch::value::Value;
///
/// let row = Row::new(
///     vec!["id".into(), "name".into()],
///     vec![Value::Int(1), Value::Text("Brian".into())],
/// );
/// assert_eq!(row.get::<i32>("id")?, 1);
/// assert_eq!(row.get::<String>("name")?, "Brian");
/// assert!(row.get::<i32>("name").is_err());
/// # Ok::<(), sqlx_prepared_batch::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<Vec<String>>,
    values: Vec<Value>,
}

impl Row {
    /// Builds a row from parallel column-name and value vectors.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Row {
            columns: Arc::new(columns),
            values,
        }
    }

    /// Builds a row sharing an already-constructed column list.
    ///
    /// Rows of one result set share their column names; drivers use this to
    /// avoid re-allocating the header per row.
    pub fn with_columns(columns: Arc<Vec<String>>, values: Vec<Value>) -> Self {
        Row { columns, values }
    }

    /// Column names in result-set order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Typed access by column name.
    ///
    /// # Errors
    ///
    /// [`Error::Mapping`](crate::Error::Mapping) if the column does not
    /// exist or its value does not convert to `T`.
    pub fn get<T: FromValue>(&self, column: &str) -> crate::Result<T> {
        let index = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| crate::Error::mapping(column, "no such column"))?;
        let value = self
            .values
            .get(index)
            .ok_or_else(|| crate::Error::mapping(column, "no value at column position"))?;
        T::from_value(value).map_err(|reason| crate::Error::mapping(column, reason))
    }

    /// Typed access by zero-based column position.
    pub fn get_at<T: FromValue>(&self, index: usize) -> crate::Result<T> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| crate::Error::mapping(index.to_string(), "no such column index"))?;
        let column = self
            .columns
            .get(index)
            .map_or_else(|| index.to_string(), Clone::clone);
        T::from_value(value).map_err(|reason| crate::Error::mapping(column, reason))
    }

    /// The raw value of a column, if present.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        Row::new(
            vec!["id".into(), "name".into(), "deleted_at".into()],
            vec![Value::Int(7), Value::Text("Thom".into()), Value::Null],
        )
    }

    #[test]
    fn test_get_by_name() {
        let row = sample();
        assert_eq!(row.get::<i64>("id").unwrap(), 7);
        assert_eq!(row.get::<String>("name").unwrap(), "Thom");
        assert_eq!(row.get::<Option<String>>("deleted_at").unwrap(), None);
    }

    #[test]
    fn test_missing_column_names_offender() {
        let row = sample();
        let err = row.get::<i64>("nope").unwrap_err();
        match err {
            crate::Error::Mapping { column, .. } => assert_eq!(column, "nope"),
            other => panic!("expected Mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_names_offender() {
        let row = sample();
        let err = row.get::<i64>("name").unwrap_err();
        match err {
            crate::Error::Mapping { column, reason } => {
                assert_eq!(column, "name");
                assert!(reason.contains("expected int"), "{reason}");
            }
            other => panic!("expected Mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_short_value_vector_is_an_error() {
        // A driver may hand over more column names than values; access past
        // the values must fail, not panic.
        let row = Row::new(vec!["id".into(), "name".into()], vec![Value::Int(7)]);
        let err = row.get::<String>("name").unwrap_err();
        match err {
            crate::Error::Mapping { column, .. } => assert_eq!(column, "name"),
            other => panic!("expected Mapping error, got {other:?}"),
        }
        assert!(row.value("name").is_none());
        assert_eq!(row.get::<i64>("id").unwrap(), 7);
    }

    #[test]
    fn test_get_at_by_position() {
        let row = sample();
        assert_eq!(row.get_at::<i64>(0).unwrap(), 7);
        assert!(row.get_at::<i64>(9).is_err());
    }
}
