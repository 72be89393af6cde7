pub mod normalizer;
pub mod registry;
pub mod schema_gen;
pub mod sqlite;
pub mod upsert;

pub use normalizer::{ensure_schema, SchemaReport};
pub use registry::list_continent_tables;
pub use sqlite::Database;
pub use upsert::{upsert_reports, Location, UpsertReport};

use chrono::Utc;
use log::info;

use crate::error::Result;
use crate::parser::Results;
use crate::schema::TableNames;

/// Outcome of a full schema + upsert pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncSummary {
    pub schema: SchemaReport,
    pub upsert: UpsertReport,
}

/// Bring the schema up to date for `results`, then write them
pub fn sync_reports(db: &Database, names: &TableNames, results: &Results) -> Result<SyncSummary> {
    let conn = db.connection();
    info!("Updating tables ...");
    let schema = ensure_schema(conn, names, results)?;

    info!("Inserting fetched results ...");
    let upsert = upsert_reports(conn, names, results, Utc::now())?;
    Ok(SyncSummary { schema, upsert })
}
