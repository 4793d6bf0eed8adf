//! Error types for the PeopleDb crate
//!
//! This module contains all error types that can be returned by PeopleDb
//! operations. Repository-level failures keep their own taxonomy and pass
//! through untouched.

use repo_core::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeopleDbError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
