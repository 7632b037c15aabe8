use crate::mapper::RowMapper;
use crate::row::Row;

/// Ordered, one-pass sequence of mapped generated-key records.
///
/// The generated rows arrive from the driver in the batch's single round
/// trip; *mapping* them is lazy. Iterating yields `crate::Result<T>` so a
/// mapper failure surfaces for exactly the offending row without disturbing
/// records already produced. Row `n` of the sequence is the `n`-th affected
/// row across the batch in submission order.
///
/// Most callers collect eagerly with [`list`](GeneratedKeys::list), the
/// batched equivalent of fetching all rows.
pub struct GeneratedKeys<T, M> {
    rows: std::vec::IntoIter<Row>,
    mapper: M,
    position: usize,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T, M: RowMapper<T>> GeneratedKeys<T, M> {
    pub(crate) fn new(rows: Vec<Row>, mapper: M) -> Self {
        GeneratedKeys {
            rows: rows.into_iter(),
            mapper,
            position: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Number of generated rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Maps and collects every remaining record.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first mapping failure.
    pub fn list(self) -> crate::Result<Vec<T>> {
        self.collect()
    }

    /// Maps and returns the first record, if any.
    pub fn first(mut self) -> crate::Result<Option<T>> {
        self.next().transpose()
    }
}

impl<T, M: RowMapper<T>> Iterator for GeneratedKeys<T, M> {
    type Item = crate::Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        let index = self.position;
        self.position += 1;
        Some(self.mapper.map(index, &row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::column;
    use crate::value::Value;

    fn id_rows(ids: &[i64]) -> Vec<Row> {
        ids.iter()
            .map(|id| Row::new(vec!["id".into()], vec![Value::Int(*id)]))
            .collect()
    }

    #[test]
    fn test_list_preserves_order() {
        let keys = GeneratedKeys::new(id_rows(&[1, 2, 3]), column::<i64>("id"));
        assert_eq!(keys.list().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_mapper_sees_sequence_position() {
        let mapper = |index: usize, row: &Row| -> crate::Result<(usize, i64)> {
            Ok((index, row.get("id")?))
        };
        let keys = GeneratedKeys::new(id_rows(&[10, 20]), mapper);
        assert_eq!(keys.list().unwrap(), vec![(0, 10), (1, 20)]);
    }

    #[test]
    fn test_failure_mid_stream_keeps_earlier_records() {
        let rows = vec![
            Row::new(vec!["id".into()], vec![Value::Int(1)]),
            Row::new(vec!["id".into()], vec![Value::Text("oops".into())]),
            Row::new(vec!["id".into()], vec![Value::Int(3)]),
        ];
        let mut keys = GeneratedKeys::new(rows, column::<i64>("id"));
        assert_eq!(keys.next().unwrap().unwrap(), 1);
        assert!(keys.next().unwrap().is_err());
        // The stream stays usable past the bad row.
        assert_eq!(keys.next().unwrap().unwrap(), 3);
        assert!(keys.next().is_none());
    }

    #[test]
    fn test_first_on_empty_stream() {
        let keys = GeneratedKeys::new(Vec::new(), column::<i64>("id"));
        assert_eq!(keys.first().unwrap(), None);
    }
}
