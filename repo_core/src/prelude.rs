//! Convenience re-exports for common repo-core usage

// Engine and its capability set
pub use crate::engine::{CrudEngine, EntityMapping, SqlValue};

// SQL resolution
pub use crate::sql::{CrudOperation, SqlSet};

// Identity access
pub use crate::identity::IdAccessor;

// Row extraction
pub use crate::row::RowView;

// Error types
pub use crate::errors::RepositoryError;

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use sqlx::postgres::PgRow;
pub use sqlx::{PgPool, Row};
