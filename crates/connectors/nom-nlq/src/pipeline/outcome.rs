//! What a caller gets back for a question.

use query_engine_execution::{ExecutionError, Record, ResultSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Explanation reported alongside any error outcome.
pub const FAILED_EXPLANATION: &str = "Failed to process query";

/// Error reported when no SQL could be generated. The cause is only logged.
pub const GENERATION_FAILED: &str = "Failed to generate SQL query";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub question: String,
    pub sql_query: Option<String>,
    pub explanation: String,
    pub results: Vec<Record>,
    /// Number of rows in `results`, after the row cap.
    pub row_count: usize,
    /// Whether the statement produced more rows than the cap allowed.
    pub truncated: bool,
    pub error: Option<String>,
}

impl QueryOutcome {
    pub fn answered(
        question: &str,
        sql_query: Option<String>,
        explanation: String,
        result: ResultSet,
    ) -> Self {
        QueryOutcome {
            question: question.to_string(),
            sql_query,
            explanation,
            row_count: result.row_count(),
            truncated: result.truncated,
            results: result.rows,
            error: None,
        }
    }

    pub fn failed(question: &str, sql_query: Option<String>, error: String) -> Self {
        QueryOutcome {
            question: question.to_string(),
            sql_query,
            explanation: FAILED_EXPLANATION.to_string(),
            results: vec![],
            row_count: 0,
            truncated: false,
            error: Some(error),
        }
    }
}

/// A failure of the service itself, as opposed to a problem with the question
/// or the SQL generated for it.
#[derive(Debug, Error)]
#[error("system fault: {0}")]
pub struct SystemFault(#[from] pub ExecutionError);
