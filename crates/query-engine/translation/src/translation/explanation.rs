//! Describe a validated statement in plain language.

use query_engine_sql::sql::ValidatedSql;

use super::generation::{CompletionRequest, TextGenerator};

pub const FALLBACK_EXPLANATION: &str = "This query retrieves data based on your request.";

pub const EXPLANATION_TEMPERATURE: f64 = 0.3;
pub const EXPLANATION_MAX_TOKENS: u32 = 200;

const EXPLAINER_ROLE: &str = "You are a helpful assistant that explains SQL queries in simple terms. \
                              Keep explanations brief and focused.";

pub fn explanation_request(model: &str, question: &str, sql: &ValidatedSql) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        system: EXPLAINER_ROLE.to_string(),
        user: format!(
            "User asked: \"{question}\"\n\nGenerated SQL:\n{sql}\n\n\
             Provide a brief explanation of what this query does in 1-2 sentences."
        ),
        temperature: EXPLANATION_TEMPERATURE,
        max_tokens: EXPLANATION_MAX_TOKENS,
    }
}

/// Ask the generator to explain `sql`. Never fails: any generator error, or a
/// blank answer, yields [`FALLBACK_EXPLANATION`].
pub async fn explain<G>(generator: &G, model: &str, question: &str, sql: &ValidatedSql) -> String
where
    G: TextGenerator + ?Sized,
{
    let request = explanation_request(model, question, sql);
    match generator.complete(&request).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!("explanation was blank, using the fallback");
            FALLBACK_EXPLANATION.to_string()
        }
        Err(err) => {
            tracing::warn!(error = %err, "explanation failed, using the fallback");
            FALLBACK_EXPLANATION.to_string()
        }
    }
}
