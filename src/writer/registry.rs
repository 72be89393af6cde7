//! Reads of the continent table.
//!
//! Nothing here is cached: every call reflects what is persisted right now.

use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::time::Duration;

use super::sqlite::with_deadline;
use crate::error::Result;
use crate::query::QueryTemplate;
use crate::schema::TableNames;

/// Upper bound on listing the continent table
pub const LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// All continent rows, id -> normalized name
pub fn list_continent_tables(conn: &Connection, names: &TableNames) -> Result<BTreeMap<i64, String>> {
    let sql = QueryTemplate::new("SELECT id, name FROM %areas%")
        .with_value("areas", names.areas())
        .render();

    let tables = with_deadline(conn, LIST_TIMEOUT, |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let tables = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<i64, String>>>()?;
        Ok(tables)
    })?;

    Ok(tables)
}

/// Id of the continent row whose name is exactly `continent`
pub fn continent_id(tables: &BTreeMap<i64, String>, continent: &str) -> Option<i64> {
    tables
        .iter()
        .find(|(_, name)| name.as_str() == continent)
        .map(|(id, _)| *id)
}

/// Continent name owning the location `code`, joined through the
/// locations table
pub fn continent_for_code(conn: &Connection, names: &TableNames, code: &str) -> Result<Option<String>> {
    let sql = QueryTemplate::new(
        "SELECT %areas%.name FROM %areas% \
         INNER JOIN %locations% ON %areas%.id = %locations%.continent_table \
         AND %locations%.code = ?1",
    )
    .with_value("areas", names.areas())
    .with_value("locations", names.locations())
    .render();

    let name = conn
        .prepare_cached(&sql)?
        .query_row([code], |row| row.get(0))
        .optional()?;

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Database;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute_batch(
                "CREATE TABLE owid_areas (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
                 CREATE TABLE owid_locations (code TEXT PRIMARY KEY, name TEXT NOT NULL,
                     continent_table INTEGER NOT NULL REFERENCES owid_areas (id));
                 INSERT INTO owid_areas (name) VALUES ('europe'), ('asia');
                 INSERT INTO owid_locations VALUES ('FRA', 'France', 1);",
            )
            .unwrap();
        db
    }

    #[test]
    fn test_list_continent_tables() {
        let db = seeded();
        let tables = list_continent_tables(db.connection(), &TableNames::default()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[&1], "europe");
        assert_eq!(continent_id(&tables, "asia"), Some(2));
        assert_eq!(continent_id(&tables, "Asia"), None);
    }

    #[test]
    fn test_list_reflects_new_rows() {
        let db = seeded();
        let names = TableNames::default();
        assert_eq!(list_continent_tables(db.connection(), &names).unwrap().len(), 2);

        db.connection()
            .execute("INSERT INTO owid_areas (name) VALUES ('africa')", [])
            .unwrap();
        assert_eq!(list_continent_tables(db.connection(), &names).unwrap().len(), 3);
    }

    #[test]
    fn test_list_fails_without_table() {
        let db = Database::open_in_memory().unwrap();
        assert!(list_continent_tables(db.connection(), &TableNames::default()).is_err());
    }

    #[test]
    fn test_continent_for_code() {
        let db = seeded();
        let names = TableNames::default();
        assert_eq!(
            continent_for_code(db.connection(), &names, "FRA").unwrap().as_deref(),
            Some("europe")
        );
        assert_eq!(continent_for_code(db.connection(), &names, "XXX").unwrap(), None);
    }
}
