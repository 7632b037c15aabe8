use regex::Regex;

/// A parsed SQL statement template.
///
/// Templates may use named placeholders (`:name`), positional placeholders
/// (`?`), or a mix of both; named placeholders are rewritten to positional
/// form before the SQL reaches the driver. The placeholder count is fixed at
/// parse time and every parameter set bound against the template must match
/// it exactly.
///
/// # Examples
///
/// ```
/// use sqlx_prepared_batch::builder::StatementTemplate;
///
/// let template = StatementTemplate::parse("insert into users (name) values (:name)")?;
/// assert_eq!(template.sql(), "insert into users (name) values (?)");
/// assert_eq!(template.parameter_count(), 1);
/// # Ok::<(), sqlx_prepared_batch::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct StatementTemplate {
    sql: String,
    parameter_count: usize,
}

impl StatementTemplate {
    /// Parses a template, rewriting named placeholders and counting the
    /// resulting positional placeholders.
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder pattern cannot be compiled.
    pub fn parse(template: impl Into<String>) -> crate::Result<Self> {
        let template = template.into();
        let sql = build_query(&template)?;
        let parameter_count = sql.matches('?').count();
        Ok(StatementTemplate {
            sql,
            parameter_count,
        })
    }

    /// The driver-ready SQL with positional placeholders only.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of placeholders each bound parameter set must fill.
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }
}

/// Converts named placeholders (`:name`) to positional placeholders (`?`).
///
/// Used internally by [`StatementTemplate::parse`].
///
/// # Examples
///
/// ```
/// use sqlx_prepared_batch::builder::build_query;
///
/// let sql = build_query("SELECT * FROM users WHERE id = :id AND name = :name")?;
/// assert_eq!(sql, "SELECT * FROM users WHERE id = ? AND name = ?");
/// # Ok::<(), sqlx_prepared_batch::Error>(())
/// ```
pub fn build_query(template: &str) -> crate::Result<String> {
    let regex = Regex::new(r":[a-zA-Z0-9_]+")?;
    let replaced = regex.replace_all(template, "?").into_owned();
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_single_param() {
        let result = build_query("SELECT * FROM users WHERE id = :id").unwrap();
        assert_eq!(result, "SELECT * FROM users WHERE id = ?");
    }

    #[test]
    fn test_build_query_repeated_params() {
        let result = build_query("SELECT * FROM users WHERE id = :id OR user_id = :id").unwrap();
        assert_eq!(result, "SELECT * FROM users WHERE id = ? OR user_id = ?");
    }

    #[test]
    fn test_build_query_no_params() {
        let result = build_query("SELECT * FROM users").unwrap();
        assert_eq!(result, "SELECT * FROM users");
    }

    #[test]
    fn test_template_counts_named_placeholders() {
        let template =
            StatementTemplate::parse("insert into something (name) values (:name)").unwrap();
        assert_eq!(template.sql(), "insert into something (name) values (?)");
        assert_eq!(template.parameter_count(), 1);
    }

    #[test]
    fn test_template_counts_positional_placeholders() {
        let template =
            StatementTemplate::parse("insert into something (id, name) values (?, ?)").unwrap();
        assert_eq!(template.parameter_count(), 2);
    }

    #[test]
    fn test_template_mixed_placeholders() {
        let template =
            StatementTemplate::parse("update t set name = :name where id = ?").unwrap();
        assert_eq!(template.sql(), "update t set name = ? where id = ?");
        assert_eq!(template.parameter_count(), 2);
    }
}
