//! SQL strings at the different stages of the pipeline.

use std::fmt;

/// A generated statement after cosmetic normalization. Not yet trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedStatement(String);

impl NormalizedStatement {
    pub(crate) fn new(sql: String) -> Self {
        NormalizedStatement(sql)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A statement which passed every safety check.
///
/// Values of this type can only be created by [`crate::sql::validate`], so
/// anything holding one is known to be a single read-only SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSql {
    sql: String,
    params: Vec<Param>,
}

impl ValidatedSql {
    pub(crate) fn new(sql: String) -> Self {
        ValidatedSql {
            sql,
            params: vec![],
        }
    }

    /// Attach positional parameters (`$1`, `$2`, ...) to bind at execution time.
    #[must_use]
    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn into_sql(self) -> String {
        self.sql
    }
}

impl fmt::Display for ValidatedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// A value bound to a positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    String(String),
    Value(serde_json::Value),
}
