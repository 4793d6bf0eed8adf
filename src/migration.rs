//! Database migration functionality
//!
//! Schema bootstrap for the two tables the repositories map onto. The
//! schema is fixed, so there is no generated DDL here; identity columns are
//! `BIGSERIAL`, so identity generation stays with the store.

use sqlx::PgPool;

use crate::core::PeopleDb;
use crate::errors::PeopleDbError;

const CREATE_ADDRESSES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS addresses (
    id              BIGSERIAL PRIMARY KEY,
    street_address  TEXT NOT NULL,
    address2        TEXT NOT NULL,
    city            TEXT NOT NULL,
    state           TEXT NOT NULL,
    postcode        TEXT NOT NULL,
    county          TEXT NOT NULL,
    region          TEXT NOT NULL,
    country         TEXT NOT NULL
)
"#;

const CREATE_PEOPLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS people (
    id               BIGSERIAL PRIMARY KEY,
    first_name       TEXT NOT NULL,
    last_name        TEXT NOT NULL,
    dob              TIMESTAMPTZ NOT NULL,
    salary           NUMERIC NOT NULL DEFAULT 0,
    email            TEXT,
    home_address     BIGINT REFERENCES addresses(id),
    business_address BIGINT REFERENCES addresses(id),
    parent_id        BIGINT REFERENCES people(id)
)
"#;

/// Create the addresses and people tables if they are not present.
/// If recreate is true, drops existing tables first.
pub async fn run(pool: &PgPool, recreate: bool) -> Result<(), PeopleDbError> {
    if recreate {
        // people first, it references addresses
        sqlx::query("DROP TABLE IF EXISTS people CASCADE")
            .execute(pool)
            .await?;
        sqlx::query("DROP TABLE IF EXISTS addresses CASCADE")
            .execute(pool)
            .await?;
    }

    sqlx::query(CREATE_ADDRESSES_SQL).execute(pool).await?;
    sqlx::query(CREATE_PEOPLE_SQL).execute(pool).await?;
    Ok(())
}

impl PeopleDb {
    /// Bootstrap the schema on this instance's pool
    pub async fn migrate(&self, recreate: bool) -> Result<(), PeopleDbError> {
        run(self.pool(), recreate).await
    }
}
