//! The safety validator.
//!
//! A normalized statement is accepted only when every check passes:
//!
//! 1. no forbidden keyword appears anywhere in the text;
//! 2. no statement-chaining or comment-smuggling pattern appears;
//! 3. the text parses as exactly one query of an allowed shape.
//!
//! The first failing check decides the rejection reason.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::lexical::{self, ForbiddenPattern};
use super::string::{NormalizedStatement, ValidatedSql};
use super::structure::{self, StructureError};

/// The category of a rejection, as reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionReason {
    NotASelect,
    MultipleStatements,
    ForbiddenKeyword,
    ForbiddenPattern,
    Unparseable,
}

impl RejectionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectionReason::NotASelect => "not-a-select",
            RejectionReason::MultipleStatements => "multiple-statements",
            RejectionReason::ForbiddenKeyword => "forbidden-keyword",
            RejectionReason::ForbiddenPattern => "forbidden-pattern",
            RejectionReason::Unparseable => "unparseable",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statement the validator refused to pass on for execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Query rejected ({reason}): {detail}")]
pub struct Rejection {
    pub reason: RejectionReason,
    pub detail: String,
}

impl Rejection {
    fn new(reason: RejectionReason, detail: impl Into<String>) -> Self {
        Rejection {
            reason,
            detail: detail.into(),
        }
    }
}

impl From<StructureError> for Rejection {
    fn from(error: StructureError) -> Self {
        match error {
            StructureError::Unparseable(message) => Rejection::new(
                RejectionReason::Unparseable,
                format!("the statement could not be parsed: {message}"),
            ),
            StructureError::NoStatement => Rejection::new(
                RejectionReason::NotASelect,
                "no SQL statement was produced",
            ),
            StructureError::MultipleStatements(count) => Rejection::new(
                RejectionReason::MultipleStatements,
                format!("expected a single statement, found {count}"),
            ),
            StructureError::NotASelect(kind) => Rejection::new(
                RejectionReason::NotASelect,
                format!("only SELECT queries are allowed, found {kind}"),
            ),
        }
    }
}

impl From<ForbiddenPattern> for Rejection {
    fn from(pattern: ForbiddenPattern) -> Self {
        Rejection::new(
            RejectionReason::ForbiddenPattern,
            format!("query contains {}", pattern.description()),
        )
    }
}

/// Decide whether a normalized statement may be executed.
pub fn validate(statement: &NormalizedStatement) -> Result<ValidatedSql, Rejection> {
    check(statement.as_str()).map_err(|rejection| {
        tracing::warn!(
            reason = %rejection.reason,
            detail = rejection.detail,
            sql = statement.as_str(),
            "Rejected generated SQL"
        );
        rejection
    })
}

fn check(sql: &str) -> Result<ValidatedSql, Rejection> {
    if let Some(keyword) = lexical::find_forbidden_keyword(sql) {
        return Err(Rejection::new(
            RejectionReason::ForbiddenKeyword,
            format!("query contains forbidden keyword {keyword}"),
        ));
    }

    if let Some(pattern) = lexical::find_forbidden_pattern(sql) {
        return Err(pattern.into());
    }

    structure::check_single_select(sql)?;

    Ok(ValidatedSql::new(sql.to_string()))
}
