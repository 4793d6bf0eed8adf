//! Identity access for persisted entities
//!
//! Identities here are store-generated `BIGSERIAL` values. An entity type
//! opts in by supplying a getter/setter pair once, at repository
//! construction; there is no field scanning, so "no identity field" is not a
//! reachable misconfiguration.

use crate::errors::RepositoryError;

/// Reads and writes an entity's identity field through plain accessors.
pub struct IdAccessor<T> {
    get: fn(&T) -> Option<i64>,
    set: fn(&mut T, i64),
}

impl<T> IdAccessor<T> {
    pub const fn new(get: fn(&T) -> Option<i64>, set: fn(&mut T, i64)) -> Self {
        Self { get, set }
    }

    /// The identity, if the entity has been persisted.
    pub fn id_of(&self, entity: &T) -> Option<i64> {
        (self.get)(entity)
    }

    /// The identity of an entity expected to already be persisted.
    pub fn require(&self, entity: &T) -> Result<i64, RepositoryError> {
        self.id_of(entity).ok_or_else(|| {
            RepositoryError::configuration("entity has no identity assigned; it was never saved")
        })
    }

    /// Write the store-generated identity back into the entity.
    pub fn assign(&self, entity: &mut T, id: i64) {
        (self.set)(entity, id)
    }
}

impl<T> Clone for IdAccessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IdAccessor<T> {}

impl<T> std::fmt::Debug for IdAccessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdAccessor").finish_non_exhaustive()
    }
}
