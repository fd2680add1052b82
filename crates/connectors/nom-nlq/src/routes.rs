//! HTTP routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};

use query_engine_execution::ConnectionPool;

use crate::error::ServerError;
use crate::pipeline::QueryOutcome;
use crate::schema::{self, ExampleQuestions, SchemaSummary};
use crate::state::ServerState;

type SharedState<P> = State<Arc<ServerState<P>>>;

pub fn create_router<P: ConnectionPool + 'static>(state: Arc<ServerState<P>>) -> Router {
    Router::new()
        .route("/", get(get_root::<P>))
        .route("/health", get(get_health::<P>))
        .route("/metrics", get(get_metrics::<P>))
        .route("/api/v1/query", post(post_query::<P>))
        .route("/api/v1/schema", get(get_schema::<P>))
        .route("/api/v1/examples", get(get_examples::<P>))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
}

async fn get_root<P: ConnectionPool>(State(state): SharedState<P>) -> Json<RootResponse> {
    Json(RootResponse {
        message: state.settings.title,
        version: state.settings.version,
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

async fn get_health<P: ConnectionPool>(State(state): SharedState<P>) -> Json<HealthResponse> {
    let healthy = state.pipeline.executor().is_healthy().await;
    Json(if healthy {
        HealthResponse {
            status: "healthy",
            database: "connected",
        }
    } else {
        HealthResponse {
            status: "unhealthy",
            database: "disconnected",
        }
    })
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    #[serde(default = "include_sql_default")]
    pub include_sql: bool,
}

fn include_sql_default() -> bool {
    true
}

async fn post_query<P: ConnectionPool>(
    State(state): SharedState<P>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryOutcome>, ServerError> {
    let outcome = state
        .pipeline
        .process_query(&request.question, request.include_sql)
        .await?;
    Ok(Json(outcome))
}

async fn get_schema<P: ConnectionPool>(State(state): SharedState<P>) -> Json<SchemaSummary> {
    Json(schema::schema_summary(state.pipeline.schema()))
}

async fn get_examples<P: ConnectionPool>(State(state): SharedState<P>) -> Json<ExampleQuestions> {
    Json(schema::example_questions(state.pipeline.schema()))
}

async fn get_metrics<P: ConnectionPool>(
    State(state): SharedState<P>,
) -> Result<impl IntoResponse, ServerError> {
    state
        .metrics()
        .update_pool_metrics(&state.pipeline.executor().pool().status());

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&state.metrics_registry.gather(), &mut buffer)?;
    let body = String::from_utf8_lossy(&buffer).into_owned();

    Ok(([(header::CONTENT_TYPE, encoder.format_type().to_string())], body))
}
