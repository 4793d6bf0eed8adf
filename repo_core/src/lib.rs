//! Repo Core - generic persistence engine for peopledb
//!
//! This crate provides the entity-type-polymorphic CRUD engine and its
//! supporting pieces: per-operation SQL resolution, identity write-back,
//! and alias-prefixed extraction of joined result rows.

pub mod engine;
pub mod errors;
pub mod identity;
pub mod prelude;
pub mod row;
pub mod sql;

pub use engine::{CrudEngine, EntityMapping, SqlValue};
pub use errors::RepositoryError;
pub use identity::IdAccessor;
pub use row::RowView;
pub use sql::{CrudOperation, SqlSet};
