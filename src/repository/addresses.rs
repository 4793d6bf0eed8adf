//! Address persistence

use repo_core::prelude::*;

use crate::model::{Address, Region};

const SAVE_ADDRESS_SQL: &str = "INSERT INTO addresses \
    (street_address, address2, city, state, postcode, county, region, country) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id";

const FIND_ADDRESS_BY_ID_SQL: &str = "SELECT id, street_address, address2, city, \
    state, postcode, county, region, country FROM addresses WHERE id = $1";

const FIND_ALL_ADDRESSES_SQL: &str = "SELECT id, street_address, address2, city, \
    state, postcode, county, region, country FROM addresses ORDER BY id";

const COUNT_ADDRESSES_SQL: &str = "SELECT COUNT(*) FROM addresses";

const DELETE_ADDRESS_SQL: &str = "DELETE FROM addresses WHERE id = $1";

const DELETE_ADDRESSES_SQL: &str = "DELETE FROM addresses WHERE id = ANY($1)";

/// Build an address from one role of a joined row, or `None` when the
/// role's identity column is NULL (the outer join produced no row for it).
/// A flat address query uses the empty prefix.
pub(crate) fn address_from_view(view: &RowView<'_>) -> Result<Option<Address>, RepositoryError> {
    let Some(id) = view.get_opt::<i64>("id")? else {
        return Ok(None);
    };
    let region = view
        .get::<String>("region")?
        .parse::<Region>()
        .map_err(|e| RepositoryError::extraction(format!("{}region", view.prefix()), e))?;
    let mut address = Address::new(
        view.get::<String>("street_address")?,
        view.get::<String>("address2")?,
        view.get::<String>("city")?,
        view.get::<String>("state")?,
        view.get::<String>("postcode")?,
        view.get::<String>("county")?,
        view.get::<String>("country")?,
        region,
    );
    address.id = Some(id);
    Ok(Some(address))
}

pub struct AddressMapping {
    sql: SqlSet,
}

impl AddressMapping {
    fn new() -> Self {
        Self {
            sql: SqlSet::new()
                .declare(CrudOperation::Save, SAVE_ADDRESS_SQL)
                .declare(CrudOperation::FindById, FIND_ADDRESS_BY_ID_SQL)
                .declare(CrudOperation::FindAll, FIND_ALL_ADDRESSES_SQL)
                .declare(CrudOperation::Count, COUNT_ADDRESSES_SQL)
                .declare(CrudOperation::DeleteOne, DELETE_ADDRESS_SQL)
                .declare(CrudOperation::DeleteMany, DELETE_ADDRESSES_SQL),
        }
    }
}

#[async_trait]
impl EntityMapping for AddressMapping {
    type Entity = Address;

    fn declared_sql(&self) -> &SqlSet {
        &self.sql
    }

    async fn bind_save(
        &self,
        address: &mut Address,
        _pool: &PgPool,
    ) -> Result<Vec<SqlValue>, RepositoryError> {
        Ok(vec![
            address.street_address().into(),
            address.address2().into(),
            address.city().into(),
            address.state().into(),
            address.postcode().into(),
            address.county().into(),
            address.region().as_str().into(),
            address.country().into(),
        ])
    }

    // Addresses are append-only; no update statement is declared, so the
    // engine reports UPDATE as undefined before this binder is reached.
    fn bind_update(&self, _address: &Address) -> Result<Vec<SqlValue>, RepositoryError> {
        Err(RepositoryError::configuration(
            "addresses are append-only; UPDATE is not supported",
        ))
    }

    fn extract_row(&self, row: &PgRow) -> Result<Address, RepositoryError> {
        address_from_view(&RowView::new(row, ""))?
            .ok_or_else(|| RepositoryError::extraction("id", "address row without an id"))
    }
}

/// Store-backed repository for [`Address`] rows.
pub struct AddressRepository {
    engine: CrudEngine<AddressMapping>,
}

impl AddressRepository {
    pub fn new(pool: PgPool) -> Self {
        let identity =
            IdAccessor::new(|a: &Address| a.id, |a: &mut Address, id| a.id = Some(id));
        Self {
            engine: CrudEngine::new(pool, AddressMapping::new(), identity),
        }
    }

    pub async fn save(&self, address: Address) -> Result<Address, RepositoryError> {
        self.engine.save(address).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Address>, RepositoryError> {
        self.engine.find_by_id(id).await
    }

    pub async fn find_all(&self) -> Result<Vec<Address>, RepositoryError> {
        self.engine.find_all().await
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        self.engine.count().await
    }

    pub async fn delete(&self, address: &Address) -> Result<(), RepositoryError> {
        self.engine.delete(address).await
    }

    pub async fn delete_many(&self, addresses: &[Address]) -> Result<(), RepositoryError> {
        self.engine.delete_many(addresses).await
    }
}
