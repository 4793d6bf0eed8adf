//! Generic CRUD engine
//!
//! The engine owns the operation-kind-polymorphic save/find/count/update/
//! delete logic for any entity type. A concrete repository supplies the
//! capability set the engine is parameterized by: its SQL declarations, a
//! binder for saves (which may cascade into sub-entity saves), a binder for
//! updates, result extraction, and an identity accessor for write-back of
//! store-generated ids.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use std::fmt::Debug;

use crate::errors::RepositoryError;
use crate::identity::IdAccessor;
use crate::sql::{CrudOperation, SqlSet};

/// A positional statement parameter. The set of column types the schema
/// uses is closed, so binding stays typed end to end; each variant carrying
/// `None` binds a NULL of the matching SQL type.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    BigInt(Option<i64>),
    Text(Option<String>),
    Timestamp(Option<DateTime<Utc>>),
    Decimal(Option<Decimal>),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::BigInt(Some(value))
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(value: Option<i64>) -> Self {
        SqlValue::BigInt(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(Some(value.to_string()))
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(Some(value))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        SqlValue::Text(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(Some(value))
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Decimal(Some(value))
    }
}

fn bind_value(query: Query<'_, Postgres, PgArguments>, value: SqlValue) -> Query<'_, Postgres, PgArguments> {
    match value {
        SqlValue::BigInt(v) => query.bind(v),
        SqlValue::Text(v) => query.bind(v),
        SqlValue::Timestamp(v) => query.bind(v),
        SqlValue::Decimal(v) => query.bind(v),
    }
}

/// Capability set a concrete repository supplies to the engine.
#[async_trait]
pub trait EntityMapping: Send + Sync {
    type Entity: Debug + Send + Sync;

    /// The repository's SQL declarations, kept adjacent to the binder and
    /// extractor code that shapes them.
    fn declared_sql(&self) -> &SqlSet;

    /// Conventional default consulted when an operation has no declared
    /// statement. Repositories that declare everything inherit this
    /// implementation, which reports the operation as undefined.
    fn default_sql(&self, operation: CrudOperation) -> Result<&'static str, RepositoryError> {
        Err(RepositoryError::configuration(format!(
            "no SQL defined for operation {operation}"
        )))
    }

    /// Positional parameters for the insert statement, in placeholder
    /// order. May cascade into sub-entity saves, which is why the pool is
    /// available and the entity is mutable: persisted sub-entities get
    /// their generated ids written back before the owning row is bound.
    async fn bind_save(
        &self,
        entity: &mut Self::Entity,
        pool: &PgPool,
    ) -> Result<Vec<SqlValue>, RepositoryError>;

    /// Positional parameters for the update statement, identity excluded;
    /// the engine binds the identity as the final placeholder.
    fn bind_update(&self, entity: &Self::Entity) -> Result<Vec<SqlValue>, RepositoryError>;

    /// Build one entity from one result row.
    fn extract_row(&self, row: &PgRow) -> Result<Self::Entity, RepositoryError>;

    /// Fold a whole result set into at most one entity. Hierarchical
    /// mappings override this to regroup a flattened join; the default
    /// reads the first row only.
    fn extract_one(&self, rows: &[PgRow]) -> Result<Option<Self::Entity>, RepositoryError> {
        rows.first().map(|row| self.extract_row(row)).transpose()
    }
}

/// Generic store engine, parameterized by an [`EntityMapping`].
///
/// Each public operation is one logical unit of work: sequential store
/// round-trips on the owned pool, no internal transactions, no retries.
/// Callers wanting atomicity across a cascade wrap the call in their own
/// transaction.
pub struct CrudEngine<M: EntityMapping> {
    pool: PgPool,
    mapping: M,
    identity: IdAccessor<M::Entity>,
}

impl<M: EntityMapping> Debug for CrudEngine<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudEngine")
            .field("entity", &std::any::type_name::<M::Entity>())
            .finish_non_exhaustive()
    }
}

impl<M: EntityMapping> CrudEngine<M> {
    pub fn new(pool: PgPool, mapping: M, identity: IdAccessor<M::Entity>) -> Self {
        Self {
            pool,
            mapping,
            identity,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn mapping(&self) -> &M {
        &self.mapping
    }

    fn resolve(&self, operation: CrudOperation) -> Result<&'static str, RepositoryError> {
        self.mapping
            .declared_sql()
            .resolve(operation, || self.mapping.default_sql(operation))
    }

    /// Insert the entity, write the store-generated identity back into it
    /// and return it. The insert statement must end in `RETURNING id`.
    pub async fn save(&self, mut entity: M::Entity) -> Result<M::Entity, RepositoryError> {
        let sql = self.resolve(CrudOperation::Save)?;
        let params = self.mapping.bind_save(&mut entity, &self.pool).await?;

        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_value(query, value);
        }
        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::save(&entity, e))?;

        let id: i64 = row
            .try_get(0)
            .map_err(|e| RepositoryError::extraction("id", e))?;
        self.identity.assign(&mut entity, id);
        tracing::debug!(id, "saved entity");
        Ok(entity)
    }

    /// Fetch by identity. The statement's single placeholder binds the id;
    /// the mapping's extractor may fold several joined rows into the one
    /// returned entity. A miss is `None`, never an error.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<M::Entity>, RepositoryError> {
        let sql = self.resolve(CrudOperation::FindById)?;
        let rows = sqlx::query(sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::find(format!("id {id}"), e))?;
        self.mapping.extract_one(&rows)
    }

    /// All entities, one per row, in result order.
    pub async fn find_all(&self) -> Result<Vec<M::Entity>, RepositoryError> {
        let sql = self.resolve(CrudOperation::FindAll)?;
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::find("all rows", e))?;
        rows.iter().map(|row| self.mapping.extract_row(row)).collect()
    }

    /// First column of the first row, zero when no row comes back.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let sql = self.resolve(CrudOperation::Count)?;
        let row = sqlx::query(sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::count)?;
        match row {
            Some(row) => row
                .try_get(0)
                .map_err(|e| RepositoryError::extraction("count", e)),
            None => Ok(0),
        }
    }

    /// Update the entity's row in place. Non-identity parameters come from
    /// the mapping's update binder, the identity binds last. Last write
    /// wins; there is no concurrency check.
    pub async fn update(&self, entity: &M::Entity) -> Result<(), RepositoryError> {
        let sql = self.resolve(CrudOperation::Update)?;
        let id = self.identity.require(entity)?;

        let mut query = sqlx::query(sql);
        for value in self.mapping.bind_update(entity)? {
            query = bind_value(query, value);
        }
        let result = query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::update(id, e))?;
        tracing::debug!(id, rows = result.rows_affected(), "updated entity");
        Ok(())
    }

    /// Delete the entity's row. The in-memory instance is untouched and
    /// keeps its identity.
    pub async fn delete(&self, entity: &M::Entity) -> Result<(), RepositoryError> {
        let sql = self.resolve(CrudOperation::DeleteOne)?;
        let id = self.identity.require(entity)?;
        let result = sqlx::query(sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::delete(vec![id], e))?;
        tracing::debug!(id, rows = result.rows_affected(), "deleted entity");
        Ok(())
    }

    /// Delete every entity's row in one statement. The ids are bound as a
    /// true array parameter (`id = ANY($1)`), never spliced into the
    /// statement text. Every entity must already be persisted.
    pub async fn delete_many(&self, entities: &[M::Entity]) -> Result<(), RepositoryError> {
        let sql = self.resolve(CrudOperation::DeleteMany)?;
        let ids = entities
            .iter()
            .map(|entity| self.identity.require(entity))
            .collect::<Result<Vec<i64>, _>>()?;

        let result = sqlx::query(sql)
            .bind(ids.as_slice())
            .execute(&self.pool)
            .await;
        let result = result.map_err(|e| RepositoryError::delete(ids.clone(), e))?;
        tracing::debug!(?ids, rows = result.rows_affected(), "deleted entities");
        Ok(())
    }
}
