//! Table schema definitions for the continent, location and detail tables

use super::names::TableNames;
use super::types::*;
use crate::error::Result;
use crate::parser::{Report, SqlValue, METRIC_FIELDS};

/// Unique key of every detail table
pub static DETAIL_KEY: UniqueConstraint = UniqueConstraint {
    name: "uc_cl",
    columns: &["country_code", "last_updated"],
};

/// Detail columns that precede the metric columns
const DETAIL_LEADING_COLUMNS: &[Column] = &[
    Column::required("country_code", ColumnType::Text),
    Column::required("last_updated", ColumnType::Text),
    Column::required("fetched_at", ColumnType::Text),
    Column::new("tests_units", ColumnType::Text),
];

pub fn areas_table(names: &TableNames) -> TableSchema {
    TableSchema {
        name: names.areas(),
        columns: vec![
            Column::primary("id", ColumnType::Integer),
            Column::required("name", ColumnType::Text),
        ],
        foreign_keys: vec![],
        unique: Some(UniqueConstraint {
            name: "uc_name",
            columns: &["name"],
        }),
    }
}

pub fn locations_table(names: &TableNames) -> TableSchema {
    TableSchema {
        name: names.locations(),
        columns: vec![
            Column::primary("code", ColumnType::Text),
            Column::required("name", ColumnType::Text),
            Column::required("continent_table", ColumnType::Integer),
        ],
        foreign_keys: vec![ForeignKey::new("continent_table", names.areas(), "id")],
        unique: None,
    }
}

/// Detail table for a normalized continent name
pub fn detail_table(names: &TableNames, continent: &str) -> Result<TableSchema> {
    Ok(TableSchema {
        name: names.details(continent)?,
        columns: detail_columns(),
        foreign_keys: vec![ForeignKey::new("country_code", names.locations(), "code")],
        unique: Some(DETAIL_KEY.clone()),
    })
}

/// Every detail column: the key, bookkeeping and text columns, then one
/// REAL column per report metric
pub fn detail_columns() -> Vec<Column> {
    DETAIL_LEADING_COLUMNS
        .iter()
        .cloned()
        .chain(
            METRIC_FIELDS
                .iter()
                .map(|field| Column::new(*field, ColumnType::Real)),
        )
        .collect()
}

/// Values for one detail row, in [`detail_columns`] order
pub fn detail_row(code: &str, last_updated: &str, fetched_at: &str, report: &Report) -> Vec<SqlValue> {
    let mut row = Vec::with_capacity(DETAIL_LEADING_COLUMNS.len() + METRIC_FIELDS.len());
    row.push(SqlValue::from(code));
    row.push(SqlValue::from(last_updated));
    row.push(SqlValue::from(fetched_at));
    row.push(SqlValue::from(report.tests_units.as_deref()));
    row.extend(report.metrics().into_iter().map(SqlValue::from));
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_row_matches_columns() {
        let report = Report {
            tests_units: Some("tests performed".to_string()),
            total_cases: Some(100.0),
            ..Default::default()
        };
        let columns = detail_columns();
        let row = detail_row("US", "2023-03-08", "2023-03-09T00:00:00Z", &report);
        assert_eq!(columns.len(), row.len());

        let total_cases = columns.iter().position(|c| c.name == "total_cases").unwrap();
        assert_eq!(row[total_cases], SqlValue::Real(100.0));
        assert_eq!(row[0], SqlValue::Text("US".to_string()));
        assert_eq!(row[3], SqlValue::Text("tests performed".to_string()));

        let new_cases = columns.iter().position(|c| c.name == "new_cases").unwrap();
        assert_eq!(row[new_cases], SqlValue::Null);
    }

    #[test]
    fn test_detail_table_rejects_unnormalized_continent() {
        let names = TableNames::default();
        assert!(detail_table(&names, "North America").is_err());

        let table = detail_table(&names, "north_america").unwrap();
        assert_eq!(table.name, "owid_details_north_america");
        assert!(table.is_indexed("country_code"));
        assert!(!table.is_indexed("last_updated"));
    }

    #[test]
    fn test_locations_fk_targets_areas() {
        let names = TableNames::new("covid_").unwrap();
        let table = locations_table(&names);
        assert_eq!(table.foreign_keys[0].references_table, "covid_areas");
        assert!(table.is_indexed("code"));
        assert!(!table.is_indexed("continent_table"));
    }
}
