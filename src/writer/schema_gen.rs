use crate::query::QueryTemplate;
use crate::schema::{ColumnType, TableSchema};

/// Generate CREATE TABLE IF NOT EXISTS SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut lines = Vec::new();

    for col in &schema.columns {
        let key = match (col.primary_key, col.col_type) {
            (true, ColumnType::Integer) => " PRIMARY KEY AUTOINCREMENT",
            (true, _) => " PRIMARY KEY",
            (false, _) => "",
        };
        let null_constraint = if !col.nullable && key != " PRIMARY KEY AUTOINCREMENT" {
            " NOT NULL"
        } else {
            ""
        };

        lines.push(format!(
            "    {} {}{}{}",
            col.name,
            col.col_type.sql_type(),
            key,
            null_constraint
        ));
    }

    for fk in &schema.foreign_keys {
        lines.push(
            QueryTemplate::new("    FOREIGN KEY (%column%) REFERENCES %table% (%references%)")
                .with_value("column", fk.column)
                .with_value("table", &fk.references_table)
                .with_value("references", fk.references_column)
                .render(),
        );
    }

    if let Some(unique) = &schema.unique {
        lines.push(format!(
            "    CONSTRAINT {} UNIQUE ({})",
            unique.name,
            unique.columns.join(", ")
        ));
    }

    QueryTemplate::new("CREATE TABLE IF NOT EXISTS %table% (\n%body%\n)")
        .with_value("table", &schema.name)
        .with_value("body", lines.join(",\n"))
        .render()
}

/// Generate CREATE INDEX statements for foreign key columns that no key
/// already covers
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .foreign_keys
        .iter()
        .filter(|fk| !schema.is_indexed(fk.column))
        .map(|fk| {
            QueryTemplate::new("CREATE INDEX IF NOT EXISTS idx_%table%_%column% ON %table% (%column%)")
                .with_value("table", &schema.name)
                .with_value("column", fk.column)
                .render()
        })
        .collect()
}

/// Generate an INSERT ... ON CONFLICT DO UPDATE statement with one numbered
/// parameter per column, in column order.
///
/// Every column outside `conflict` is overwritten with the incoming value.
pub fn generate_upsert(schema: &TableSchema, conflict: &[&str]) -> String {
    let columns = schema.column_names();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    let updates: Vec<String> = columns
        .iter()
        .filter(|c| !conflict.contains(*c))
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();

    QueryTemplate::new(
        "INSERT INTO %table% (%columns%) VALUES (%placeholders%) \
         ON CONFLICT (%conflict%) DO UPDATE SET %updates%",
    )
    .with_value("table", &schema.name)
    .with_value("columns", columns.join(", "))
    .with_value("placeholders", placeholders.join(", "))
    .with_value("conflict", conflict.join(", "))
    .with_value("updates", updates.join(", "))
    .render()
}
