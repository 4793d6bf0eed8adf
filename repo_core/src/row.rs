//! Alias-prefixed row access
//!
//! A hierarchical find flattens several entity "roles" into one joined row:
//! the same address columns appear once as `home_*` and once as
//! `business_*`, the same person columns as `parent_*` and `child_*`. A
//! [`RowView`] restricts a row to one role prefix so a single per-field
//! extraction routine serves every role.

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::errors::RepositoryError;

/// A result row restricted to one role prefix. An empty prefix reads the
/// row's columns as-is.
pub struct RowView<'r> {
    row: &'r PgRow,
    prefix: &'static str,
}

impl<'r> RowView<'r> {
    pub fn new(row: &'r PgRow, prefix: &'static str) -> Self {
        Self { row, prefix }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    fn label(&self, column: &str) -> String {
        let mut label = String::with_capacity(self.prefix.len() + column.len());
        label.push_str(self.prefix);
        label.push_str(column);
        label
    }

    /// Typed lookup of `prefix + column`. A label the statement does not
    /// produce means the query and the extractor have drifted apart, which
    /// is fatal.
    pub fn get<T>(&self, column: &str) -> Result<T, RepositoryError>
    where
        T: for<'a> sqlx::Decode<'a, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    {
        let label = self.label(column);
        self.row
            .try_get::<T, _>(label.as_str())
            .map_err(|e| RepositoryError::extraction(label, e))
    }

    /// Like [`get`](Self::get), but a NULL value is `None`. Role extractors
    /// use this on the identity column to decide whether the role is present
    /// in this row at all.
    pub fn get_opt<T>(&self, column: &str) -> Result<Option<T>, RepositoryError>
    where
        T: for<'a> sqlx::Decode<'a, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    {
        self.get::<Option<T>>(column)
    }
}
