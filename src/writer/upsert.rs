//! Location and report upserts.
//!
//! Expects [`ensure_schema`](super::normalizer::ensure_schema) to have run
//! on the same report set. No transaction wraps the batch: a fatal error
//! leaves the rows written so far in place.

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use rusqlite::{params, Connection};
use std::collections::HashMap;

use super::registry::{continent_for_code, continent_id, list_continent_tables};
use super::schema_gen::generate_upsert;
use crate::error::{Result, SyncError};
use crate::parser::{Report, Results, SqlValue};
use crate::query::QueryTemplate;
use crate::schema::{detail_row, detail_table, normalize_label, TableNames, TableSchema, DETAIL_KEY};

/// A country (or aggregate region) and the continent it is filed under
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub code: String,
    /// Normalized continent name
    pub continent: String,
    pub name: String,
}

/// Row counts of an upsert pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertReport {
    pub locations: usize,
    pub reports: usize,
    /// Reports whose detail table could not be resolved
    pub skipped: usize,
}

/// One location per report with a usable continent label
pub fn extract_locations(results: &Results) -> Vec<Location> {
    results
        .iter()
        .filter_map(|(code, report)| {
            let continent = normalize_label(report.continent_label());
            if continent.is_empty() {
                return None;
            }
            Some(Location {
                code: code.clone(),
                continent,
                name: report.location.clone(),
            })
        })
        .collect()
}

/// Upsert every location of `results`, then every report into its
/// continent's detail table.
///
/// `last_updated` is the report's own `last_updated_date`, so rerunning on
/// unchanged data overwrites rather than appends. Reports without a date
/// are filed under the UTC day of `fetched_at`.
pub fn upsert_reports(
    conn: &Connection,
    names: &TableNames,
    results: &Results,
    fetched_at: DateTime<Utc>,
) -> Result<UpsertReport> {
    let mut report = UpsertReport {
        locations: upsert_locations(conn, names, &extract_locations(results))?,
        ..Default::default()
    };

    let fetched = fetched_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let fallback_day = fetched_at.format("%Y-%m-%d").to_string();
    let mut statements: HashMap<String, String> = HashMap::new();

    for (code, record) in results {
        let table = match resolve_detail_table(conn, names, code) {
            Ok(Some(table)) => table,
            Ok(None) => {
                warn!("No detail table found for country code {:?}, skipping", code);
                report.skipped += 1;
                continue;
            }
            Err(e) => {
                warn!("Failed to look up detail table for country code {:?}: {}", code, e);
                report.skipped += 1;
                continue;
            }
        };

        let sql = statements
            .entry(table.name.clone())
            .or_insert_with(|| generate_upsert(&table, DETAIL_KEY.columns));
        let last_updated = report_day(record).unwrap_or(fallback_day.as_str());
        let row = detail_row(code, last_updated, &fetched, record);
        upsert_detail_row(conn, &table.name, sql, &row, code)?;
        report.reports += 1;
    }

    Ok(report)
}

/// Insert each location, or rename it if its code already exists. The
/// continent a location was first filed under is kept.
pub fn upsert_locations(conn: &Connection, names: &TableNames, locations: &[Location]) -> Result<usize> {
    let continents = list_continent_tables(conn, names)?;
    let table = names.locations();
    let sql = QueryTemplate::new(
        "INSERT INTO %locations% (code, name, continent_table) VALUES (?1, ?2, ?3) \
         ON CONFLICT (code) DO UPDATE SET name = excluded.name",
    )
    .with_value("locations", &table)
    .render();

    for location in locations {
        let id = continent_id(&continents, &location.continent)
            .ok_or_else(|| SyncError::NoContinent(location.name.clone()))?;

        conn.prepare_cached(&sql)
            .and_then(|mut stmt| stmt.execute(params![location.code, location.name, id]))
            .map_err(|e| SyncError::upsert(&table, &location.code, e))?;
    }

    Ok(locations.len())
}

fn resolve_detail_table(conn: &Connection, names: &TableNames, code: &str) -> Result<Option<TableSchema>> {
    match continent_for_code(conn, names, code)? {
        Some(continent) => Ok(Some(detail_table(names, &continent)?)),
        None => Ok(None),
    }
}

fn report_day(record: &Report) -> Option<&str> {
    record
        .last_updated_date
        .as_deref()
        .map(str::trim)
        .filter(|day| !day.is_empty())
}

fn upsert_detail_row(
    conn: &Connection,
    table: &str,
    sql: &str,
    row: &[SqlValue],
    code: &str,
) -> Result<()> {
    debug!("Upserting {} into {}", code, table);

    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| SyncError::upsert(table, code, e))?;

    for (idx, value) in row.iter().enumerate() {
        value
            .bind_to(idx + 1, &mut stmt)
            .map_err(|e| SyncError::upsert(table, code, e))?;
    }
    stmt.raw_execute()
        .map_err(|e| SyncError::upsert(table, code, e))?;

    Ok(())
}
