//! Creates the continent table, continent rows, locations table and one
//! detail table per continent, whichever are missing.
//!
//! All DDL is `IF NOT EXISTS` and continent inserts are checked against a
//! fresh read of the continent table, so rerunning after a failed pass
//! picks up where it stopped.

use log::{debug, info, warn};
use rusqlite::Connection;
use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use super::registry::list_continent_tables;
use super::schema_gen::{generate_create_table, generate_indexes};
use super::sqlite::with_deadline;
use crate::error::{Result, SyncError};
use crate::parser::Results;
use crate::query::QueryTemplate;
use crate::schema::{areas_table, detail_table, locations_table, normalize_label, TableNames, TableSchema};

/// Upper bound on inserting one continent row
pub const INSERT_TIMEOUT: Duration = Duration::from_secs(5);

/// What a schema pass changed or confirmed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaReport {
    /// Continent names inserted by this pass
    pub continents_added: Vec<String>,
    /// Every detail table known after this pass
    pub detail_tables: Vec<String>,
}

pub fn ensure_schema(conn: &Connection, names: &TableNames, results: &Results) -> Result<SchemaReport> {
    let mut report = SchemaReport::default();

    create_table(conn, &areas_table(names))?;

    let mut present: HashSet<String> = list_continent_tables(conn, names)?.into_values().collect();

    let insert_sql = QueryTemplate::new("INSERT INTO %areas% (name) VALUES (?1)")
        .with_value("areas", names.areas())
        .render();

    for continent in continent_labels(results) {
        if present.contains(&continent) {
            continue;
        }

        with_deadline(conn, INSERT_TIMEOUT, |conn| conn.execute(&insert_sql, [&continent]))
            .map_err(|e| SyncError::schema(names.areas(), e))?;

        info!("Added continent '{}'", continent);
        present.insert(continent.clone());
        report.continents_added.push(continent);
    }

    create_table(conn, &locations_table(names))?;

    for continent in list_continent_tables(conn, names)?.into_values() {
        let table = detail_table(names, &continent)?;
        create_table(conn, &table)?;
        report.detail_tables.push(table.name);
    }

    Ok(report)
}

/// Distinct normalized continent labels of a report set. Reports without a
/// continent use their location; labels that normalize to nothing are
/// dropped.
pub fn continent_labels(results: &Results) -> BTreeSet<String> {
    let mut labels = BTreeSet::new();

    for (code, report) in results {
        let label = normalize_label(report.continent_label());
        if label.is_empty() {
            warn!("Report {} has no usable continent or location label, skipping", code);
            continue;
        }
        labels.insert(label);
    }

    labels
}

fn create_table(conn: &Connection, schema: &TableSchema) -> Result<()> {
    let sql = generate_create_table(schema);
    debug!("{}", sql);
    conn.execute(&sql, [])
        .map_err(|e| SyncError::schema(&schema.name, e))?;

    for index_sql in generate_indexes(schema) {
        conn.execute(&index_sql, [])
            .map_err(|e| SyncError::schema(&schema.name, e))?;
    }

    Ok(())
}
