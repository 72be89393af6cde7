//! Error types for a sync run

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Missing or invalid setting in the configuration file
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failure or non-2xx response from the data source
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The data source returned a body that is not a valid report set
    #[error("failed to decode report set: {0}")]
    Decode(#[from] serde_json::Error),

    /// Opening or pinging the database failed
    #[error("database connection failed: {0}")]
    Connection(#[source] rusqlite::Error),

    /// A query against the database failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// DDL or continent insert failed while preparing the schema
    #[error("schema update failed on {table}: {source}")]
    Schema {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Writing a location or report row failed
    #[error("upsert into {table} failed for {code}: {source}")]
    Upsert {
        table: String,
        code: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A location's continent has no row in the continent table
    #[error("no continent found for country {0}")]
    NoContinent(String),

    /// A string that would be rendered as a SQL identifier failed validation
    #[error("invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub(crate) fn schema(table: impl Into<String>, source: rusqlite::Error) -> Self {
        SyncError::Schema {
            table: table.into(),
            source,
        }
    }

    pub(crate) fn upsert(
        table: impl Into<String>,
        code: impl Into<String>,
        source: rusqlite::Error,
    ) -> Self {
        SyncError::Upsert {
            table: table.into(),
            code: code.into(),
            source,
        }
    }
}
