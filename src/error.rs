use thiserror::Error;

use crate::model::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("query failed: {context}")]
    QueryFailed {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to read {kind} row")]
    ScanFailed {
        kind: EntityKind,
        #[source]
        source: sqlx::Error,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    /// Zero rows where the operation requires at least one.
    #[error("no {kind} rows found for parent {parent_id}")]
    EmptyResult { kind: EntityKind, parent_id: String },

    #[error("{kind} short name {name:?} already exists")]
    DuplicateName { kind: EntityKind, name: String },

    #[error("empty {kind} short name is not allowed")]
    EmptyName { kind: EntityKind },

    #[error("failed to update parameter {id}: {reason}")]
    UpdateFailed { id: String, reason: String },

    #[error("failed to read configuration: {0}")]
    ConfigUnreadable(#[from] config::ConfigError),

    #[error("failed to connect to database: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    #[error("failed to render graph: {0}")]
    RenderFailed(String),
}

impl Error {
    pub(crate) fn query(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Error::QueryFailed { context, source }
    }

    pub(crate) fn scan(kind: EntityKind) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Error::ScanFailed { kind, source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
