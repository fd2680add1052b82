//! The informational endpoints: a summary of the schema and example questions.

use query_engine_metadata::metadata::{SchemaContext, TokenInfo};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SchemaSummary {
    pub tables: Vec<TableSummary>,
    pub common_tokens: Vec<TokenInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExampleQuestions {
    pub examples: Vec<&'static str>,
}

/// Table names with a one-line description each, plus the common tokens.
pub fn schema_summary(context: &SchemaContext) -> SchemaSummary {
    SchemaSummary {
        tables: context
            .tables
            .iter()
            .map(|table| TableSummary {
                name: table.name,
                description: table.summary,
            })
            .collect(),
        common_tokens: context.tokens.clone(),
    }
}

pub fn example_questions(context: &SchemaContext) -> ExampleQuestions {
    ExampleQuestions {
        examples: context.sample_questions.clone(),
    }
}
