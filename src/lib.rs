//! # PeopleDb
//!
//! A generic object-relational persistence layer for PostgreSQL. Domain
//! entities (people, postal addresses, parent/child hierarchies) map onto
//! rows through one reusable CRUD engine instead of hand-written per-entity
//! SQL glue: each repository declares its statements and binder/extractor
//! capabilities, the engine does the rest, including write-back of
//! store-generated identities and reconstruction of a whole person
//! hierarchy from a single flattened join.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use peopledb::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 5432, "peopledb".to_string(),
//!         "postgres".to_string(), "password".to_string(),
//!         1, 5, 30, 600, 3600,
//!     );
//!
//!     let db = PeopleDb::new(config).await?;
//!     db.migrate(false).await?;
//!
//!     let people = db.people();
//!
//!     let mut john = Person::new("John", "Connor", Utc::now());
//!     john.home_address = Some(Address::new(
//!         "123 Bale st", "Apt 1a", "Wala Wala", "WA",
//!         "90210", "Fulton county", "United States", Region::West,
//!     ));
//!
//!     let saved = people.save(john).await?;
//!     println!("Saved person with id {:?}", saved.id);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod migration;
pub mod model;
pub mod prelude;
pub mod repository;

// Re-export the main public types for convenience
pub use crate::core::PeopleDb;
pub use crate::errors::PeopleDbError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig};

// Re-export the engine crate for callers building their own repositories
pub use repo_core;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
