//! Convenience re-exports for common PeopleDb usage
//!
//! # Example
//!
//! ```rust
//! use peopledb::prelude::*;
//!
//! // Now you have access to all the common PeopleDb types
//! ```

// Core PeopleDb components
pub use crate::core::PeopleDb;
pub use crate::errors::PeopleDbError;
pub use crate::migration;

// Domain model
pub use crate::model::{Address, Person, Region};

// Concrete repositories
pub use crate::repository::{AddressRepository, PeopleRepository};

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig};

// Engine types for callers building their own repositories
pub use repo_core::prelude::*;

// Common external dependencies
pub use anyhow;
pub use chrono::{TimeZone, Utc};
pub use rust_decimal::Decimal;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::PgPool;
