//! SQL resolution for repository operations
//!
//! A concrete repository declares its statements in a [`SqlSet`], kept next
//! to the binder/extractor code that shapes their parameters and result
//! columns. The engine resolves each operation against the declarations
//! first and only then asks the repository for a conventional default.

use std::fmt;

use crate::errors::RepositoryError;

/// The operation kinds the engine knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOperation {
    Save,
    FindById,
    FindAll,
    Count,
    Update,
    DeleteOne,
    DeleteMany,
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrudOperation::Save => "SAVE",
            CrudOperation::FindById => "FIND_BY_ID",
            CrudOperation::FindAll => "FIND_ALL",
            CrudOperation::Count => "COUNT",
            CrudOperation::Update => "UPDATE",
            CrudOperation::DeleteOne => "DELETE_ONE",
            CrudOperation::DeleteMany => "DELETE_MANY",
        };
        f.write_str(name)
    }
}

/// Ordered set of per-operation SQL declarations.
///
/// One extraction routine may serve several operations at once, so the same
/// statement-shaped declarations can pile up; lookup returns the first
/// declaration whose operation matches, mirroring declaration order.
#[derive(Debug, Clone, Default)]
pub struct SqlSet {
    entries: Vec<(CrudOperation, &'static str)>,
}

impl SqlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a statement to an operation kind.
    pub fn declare(mut self, operation: CrudOperation, sql: &'static str) -> Self {
        self.entries.push((operation, sql));
        self
    }

    /// First declaration matching `operation`, if any.
    pub fn lookup(&self, operation: CrudOperation) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(declared, _)| *declared == operation)
            .map(|(_, sql)| *sql)
    }

    /// Resolve an operation to SQL text: a declaration wins, otherwise the
    /// fallback supplier is consulted. The fallback is only invoked on a
    /// miss; a fallback that reports "not defined" propagates as a
    /// configuration error at first use.
    pub fn resolve<F>(
        &self,
        operation: CrudOperation,
        fallback: F,
    ) -> Result<&'static str, RepositoryError>
    where
        F: FnOnce() -> Result<&'static str, RepositoryError>,
    {
        match self.lookup(operation) {
            Some(sql) => Ok(sql),
            None => fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_sql_wins_over_fallback() {
        let set = SqlSet::new().declare(CrudOperation::Count, "SELECT COUNT(*) FROM t");
        let resolved = set
            .resolve(CrudOperation::Count, || {
                panic!("fallback must not be consulted when a declaration matches")
            })
            .unwrap();
        assert_eq!(resolved, "SELECT COUNT(*) FROM t");
    }

    #[test]
    fn first_matching_declaration_wins() {
        let set = SqlSet::new()
            .declare(CrudOperation::FindById, "SELECT one")
            .declare(CrudOperation::FindById, "SELECT two");
        assert_eq!(set.lookup(CrudOperation::FindById), Some("SELECT one"));
    }

    #[test]
    fn fallback_is_used_on_a_miss() {
        let set = SqlSet::new().declare(CrudOperation::Save, "INSERT ...");
        let resolved = set
            .resolve(CrudOperation::FindAll, || Ok("SELECT fallback"))
            .unwrap();
        assert_eq!(resolved, "SELECT fallback");
    }

    #[test]
    fn missing_fallback_surfaces_as_configuration_error() {
        let set = SqlSet::new();
        let err = set
            .resolve(CrudOperation::Update, || {
                Err(RepositoryError::configuration("no SQL defined"))
            })
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Configuration { .. }));
    }

    #[test]
    fn operation_kinds_render_for_diagnostics() {
        assert_eq!(CrudOperation::DeleteMany.to_string(), "DELETE_MANY");
        assert_eq!(CrudOperation::FindById.to_string(), "FIND_BY_ID");
    }
}
