use thiserror::Error;

/// Failure taxonomy for the generic repository engine. Every store-level
/// error is wrapped together with the entity or identity involved and
/// surfaced immediately; nothing is retried or swallowed. A missed lookup is
/// not an error, it is an empty result.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("repository misconfigured: {message}")]
    Configuration { message: String },

    #[error("saving entity failed: {entity}")]
    Save {
        entity: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("lookup failed for {context}")]
    Find {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("count failed")]
    Count {
        #[source]
        source: sqlx::Error,
    },

    #[error("update failed for id {id}")]
    Update {
        id: i64,
        #[source]
        source: sqlx::Error,
    },

    #[error("delete failed for ids {ids:?}")]
    Delete {
        ids: Vec<i64>,
        #[source]
        source: sqlx::Error,
    },

    #[error("result extraction failed at column {column}: {detail}")]
    Extraction { column: String, detail: String },
}

impl RepositoryError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap a failed insert with a rendering of the attempted entity.
    pub fn save(entity: &impl std::fmt::Debug, source: sqlx::Error) -> Self {
        Self::Save {
            entity: format!("{entity:?}"),
            source,
        }
    }

    pub fn find(context: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Find {
            context: context.into(),
            source,
        }
    }

    pub fn count(source: sqlx::Error) -> Self {
        Self::Count { source }
    }

    pub fn update(id: i64, source: sqlx::Error) -> Self {
        Self::Update { id, source }
    }

    pub fn delete(ids: Vec<i64>, source: sqlx::Error) -> Self {
        Self::Delete { ids, source }
    }

    pub fn extraction(column: impl Into<String>, detail: impl ToString) -> Self {
        Self::Extraction {
            column: column.into(),
            detail: detail.to_string(),
        }
    }
}
