//! Core PeopleDb functionality
//!
//! This module contains the main PeopleDb struct, which owns the database
//! pool and hands out the concrete repositories built on it.

use sqlx::PgPool;
use std::time::Duration;

use crate::errors::PeopleDbError;
use crate::repository::{AddressRepository, PeopleRepository};
use config::DatabaseConfig;

/// Pool options from the validated configuration. Every sizing and timeout
/// setting the config carries is applied here; a zero max lifetime means
/// unbounded connection age.
fn pool_options(config: &DatabaseConfig) -> sqlx::postgres::PgPoolOptions {
    let pool_options = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

    if config.max_lifetime_seconds > 0 {
        pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
    } else {
        pool_options.max_lifetime(None)
    }
}

/// Main coordinator owning the database connection pool.
///
/// Transaction boundaries are not managed here; a caller wanting a
/// cascaded save to be atomic wraps the call in its own transaction.
pub struct PeopleDb {
    pool: PgPool,
}

impl PeopleDb {
    /// Create a new PeopleDb with a database connection pool
    pub async fn new(config: DatabaseConfig) -> Result<Self, PeopleDbError> {
        let connection_string = config.connection_string();
        let pool = pool_options(&config).connect(&connection_string).await?;
        Ok(Self { pool })
    }

    /// Wrap an already constructed pool
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Repository for person hierarchies
    pub fn people(&self) -> PeopleRepository {
        PeopleRepository::new(self.pool.clone())
    }

    /// Repository for postal addresses
    pub fn addresses(&self) -> AddressRepository {
        AddressRepository::new(self.pool.clone())
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), PeopleDbError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(max_lifetime_seconds: u64) -> DatabaseConfig {
        DatabaseConfig::new(
            "localhost".to_string(),
            5432,
            "peopledb".to_string(),
            "postgres".to_string(),
            "password".to_string(),
            1,
            5,
            30,
            600,
            max_lifetime_seconds,
        )
    }

    #[test]
    fn pool_options_carry_every_config_setting() {
        let options = pool_options(&test_config(3600));
        assert_eq!(options.get_max_connections(), 5);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(30));
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(600)));
        assert_eq!(options.get_max_lifetime(), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn zero_max_lifetime_leaves_connection_age_unbounded() {
        let options = pool_options(&test_config(0));
        assert_eq!(options.get_max_lifetime(), None);
    }
}
