//! Metadata information regarding the database tables the generator may query.

use serde::Serialize;

/// The column types used by the indexer schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Boolean,
    Smallint,
    Integer,
    Bigint,
    Serial,
    Real,
    Text,
    Jsonb,
}

impl ScalarType {
    /// The spelling used when describing the schema to the generator.
    pub fn sql_name(self) -> &'static str {
        match self {
            ScalarType::Boolean => "BOOL",
            ScalarType::Smallint => "SMALLINT",
            ScalarType::Integer => "INT",
            ScalarType::Bigint => "BIGINT",
            ScalarType::Serial => "SERIAL",
            ScalarType::Real => "REAL",
            ScalarType::Text => "TEXT",
            ScalarType::Jsonb => "JSONB",
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Information about a database table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: &'static str,
    /// A longer description used in the generation prompt.
    pub description: &'static str,
    /// A short description used by the schema summary endpoint.
    pub summary: &'static str,
    pub columns: Vec<ColumnInfo>,
    /// Multi-column uniqueness constraints, rendered as e.g. `UNIQUE(address, tokenStandard)`.
    pub unique_constraints: Vec<Vec<&'static str>>,
}

/// Information about a database column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub r#type: ScalarType,
    pub primary_key: bool,
    pub description: &'static str,
}

impl ColumnInfo {
    pub fn new(name: &'static str, r#type: ScalarType, description: &'static str) -> Self {
        ColumnInfo {
            name,
            r#type,
            primary_key: false,
            description,
        }
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

impl TableInfo {
    pub fn new(
        name: &'static str,
        description: &'static str,
        summary: &'static str,
        columns: Vec<ColumnInfo>,
    ) -> Self {
        TableInfo {
            name,
            description,
            summary,
            columns,
            unique_constraints: vec![],
        }
    }

    #[must_use]
    pub fn unique(mut self, columns: &[&'static str]) -> Self {
        self.unique_constraints.push(columns.to_vec());
        self
    }
}

/// A token that questions commonly refer to by symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub standard: &'static str,
    pub decimals: u32,
}

/// A worked (question, SQL) pair shown to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleQuery {
    pub question: &'static str,
    pub sql: &'static str,
}
