use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by ledger operations. Anything not modeled here
/// (disk full, corrupt database, ...) propagates through the `Database`
/// variant and is treated as fatal by the callers.
#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("transaction {0} not found")]
    TransactionNotFound(i64),

    #[error("category {0} not found")]
    CategoryNotFound(i64),

    #[error("database operation failed: {0}")]
    Database(#[from] rusqlite::Error),
}

impl Error {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
