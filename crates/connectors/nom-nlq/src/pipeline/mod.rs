//! The question-answering pipeline.
//!
//! prompt -> generate -> normalize -> validate -> execute -> explain.
//! Problems with a question end up in the returned [`QueryOutcome`]; only
//! faults of the service itself are returned as errors.

pub mod outcome;

use std::sync::Arc;

use query_engine_execution::metrics::Metrics;
use query_engine_execution::{ConnectionPool, GuardedExecutor};
use query_engine_metadata::SchemaContext;
use query_engine_sql::sql;
use query_engine_translation::translation::{explain, prompt, TextGenerator};
use tracing::{info_span, Instrument};
use uuid::Uuid;

pub use outcome::{QueryOutcome, SystemFault, FAILED_EXPLANATION, GENERATION_FAILED};

pub struct QueryPipeline<P> {
    schema: &'static SchemaContext,
    generator: Arc<dyn TextGenerator>,
    model: String,
    executor: GuardedExecutor<P>,
    metrics: Metrics,
}

impl<P: ConnectionPool> QueryPipeline<P> {
    pub fn new(
        schema: &'static SchemaContext,
        generator: Arc<dyn TextGenerator>,
        model: String,
        executor: GuardedExecutor<P>,
        metrics: Metrics,
    ) -> Self {
        QueryPipeline {
            schema,
            generator,
            model,
            executor,
            metrics,
        }
    }

    pub fn schema(&self) -> &'static SchemaContext {
        self.schema
    }

    pub fn executor(&self) -> &GuardedExecutor<P> {
        &self.executor
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Answer a natural-language question.
    pub async fn process_query(
        &self,
        question: &str,
        include_sql: bool,
    ) -> Result<QueryOutcome, SystemFault> {
        let request_id = Uuid::new_v4();
        self.run(question, include_sql)
            .instrument(info_span!("Process query", %request_id))
            .await
    }

    async fn run(&self, question: &str, include_sql: bool) -> Result<QueryOutcome, SystemFault> {
        self.metrics.query_total.inc();

        let request = prompt::sql_request(self.schema, &self.model, question);
        let candidate = match self
            .generator
            .complete(&request)
            .instrument(info_span!("Generate SQL"))
            .await
        {
            Ok(candidate) => candidate,
            Err(error) => {
                tracing::error!(%error, "SQL generation failed");
                self.metrics.generation_failure_total.inc();
                return Ok(QueryOutcome::failed(
                    question,
                    None,
                    GENERATION_FAILED.to_string(),
                ));
            }
        };

        let normalized = info_span!("Normalize SQL").in_scope(|| sql::normalize(&candidate));

        let validated = match info_span!("Validate SQL").in_scope(|| sql::validate(&normalized)) {
            Ok(validated) => validated,
            Err(rejection) => {
                self.metrics.record_rejection(rejection.reason.as_str());
                return Ok(QueryOutcome::failed(question, None, rejection.to_string()));
            }
        };
        tracing::info!(sql = validated.sql(), "validated generated SQL");

        let result = match self
            .executor
            .execute(&validated)
            .instrument(info_span!("Execute SQL"))
            .await
        {
            Ok(result) => result,
            Err(error) if error.is_system_fault() => {
                tracing::error!(%error, "unable to execute the statement");
                return Err(SystemFault(error));
            }
            Err(error) => {
                tracing::warn!(%error, "statement failed");
                self.metrics.record_execution_error(&error);
                let sql_query = include_sql.then(|| validated.sql().to_string());
                return Ok(QueryOutcome::failed(question, sql_query, error.to_string()));
            }
        };

        let explanation = explain(self.generator.as_ref(), &self.model, question, &validated)
            .instrument(info_span!("Explain SQL"))
            .await;

        self.metrics.query_success_total.inc();
        Ok(QueryOutcome::answered(
            question,
            include_sql.then(|| validated.into_sql()),
            explanation,
            result,
        ))
    }
}
