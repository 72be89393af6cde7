/// Column data type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
            primary_key: false,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
            primary_key: false,
        }
    }

    /// Create the primary key column. Integer keys are auto-incremented.
    pub const fn primary(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
            primary_key: true,
        }
    }
}

/// Foreign key reference
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: String,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub fn new(
        column: &'static str,
        references_table: impl Into<String>,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table: references_table.into(),
            references_column,
        }
    }
}

/// Named multi-column uniqueness constraint
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueConstraint {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
    pub unique: Option<UniqueConstraint>,
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// True if `column` is already indexed by the primary key or by being
    /// the leading column of the unique constraint
    pub fn is_indexed(&self, column: &str) -> bool {
        let is_pk = self
            .columns
            .iter()
            .any(|c| c.primary_key && c.name == column);
        let leads_unique = self
            .unique
            .as_ref()
            .and_then(|u| u.columns.first())
            .is_some_and(|first| *first == column);
        is_pk || leads_unique
    }
}
