//! Transient state used by the service.
//!
//! This is initialized on startup.

use std::sync::Arc;
use std::time::Duration;

use nom_nlq_configuration::{Configuration, DatabaseConnectionSettings, QueryLimits, ServerSettings};
use query_engine_execution::metrics::{self, Metrics};
use query_engine_execution::{ConnectionPool, GuardedExecutor};
use query_engine_metadata::SchemaContext;
use query_engine_translation::translation::{GenerationError, OpenAiClient, TextGenerator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;
use tracing::{info_span, Instrument};

use crate::pipeline::QueryPipeline;

/// State shared by every request.
pub struct ServerState<P> {
    pub pipeline: QueryPipeline<P>,
    pub metrics_registry: prometheus::Registry,
    pub settings: ServerSettings,
}

impl<P: ConnectionPool> ServerState<P> {
    /// Assemble the state around an existing pool and generator.
    pub fn new(
        pool: P,
        generator: Arc<dyn TextGenerator>,
        model: String,
        limits: QueryLimits,
        settings: ServerSettings,
    ) -> Result<Self, InitializationError> {
        let mut metrics_registry = prometheus::Registry::new();
        let metrics = metrics::initialise_metrics(&mut metrics_registry)
            .map_err(InitializationError::MetricsError)?;

        Ok(ServerState {
            pipeline: QueryPipeline::new(
                SchemaContext::nom(),
                generator,
                model,
                GuardedExecutor::new(pool, limits),
                metrics,
            ),
            metrics_registry,
            settings,
        })
    }

    pub fn metrics(&self) -> &Metrics {
        self.pipeline.metrics()
    }
}

/// Create a connection pool and a generation client and wrap them inside the server state.
pub async fn create_state(
    configuration: &Configuration,
) -> Result<ServerState<PgPool>, InitializationError> {
    let pool = create_pool(&configuration.connection)
        .instrument(info_span!("Create connection pool"))
        .await?;

    let generator = OpenAiClient::new(&configuration.generation)
        .map_err(InitializationError::UnableToCreateGenerator)?;

    ServerState::new(
        pool,
        Arc::new(generator),
        configuration.generation.model.clone(),
        configuration.limits,
        configuration.server.clone(),
    )
}

/// Create a connection pool with default settings.
async fn create_pool(
    settings: &DatabaseConnectionSettings,
) -> Result<PgPool, InitializationError> {
    let pool_settings = &settings.pool_settings;
    tracing::info!(
        database = %settings.connection_uri.redacted(),
        min_connections = pool_settings.min_connections,
        max_connections = pool_settings.max_connections,
        "connecting to the database"
    );

    PgPoolOptions::new()
        .min_connections(pool_settings.min_connections)
        .max_connections(pool_settings.max_connections)
        .acquire_timeout(Duration::from_secs(pool_settings.pool_timeout))
        .idle_timeout(pool_settings.idle_timeout.map(Duration::from_secs))
        .max_lifetime(pool_settings.connection_lifetime.map(Duration::from_secs))
        .connect(settings.connection_uri.0.expose())
        .await
        .map_err(InitializationError::UnableToCreatePool)
}

/// Release the resources held by the state.
pub async fn teardown(state: &ServerState<PgPool>) {
    state.pipeline.executor().pool().close().await;
    tracing::info!("connection pool closed");
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("unable to initialize connection pool: {0}")]
    UnableToCreatePool(sqlx::Error),
    #[error("unable to initialize the generation client: {0}")]
    UnableToCreateGenerator(GenerationError),
    #[error("error initializing metrics: {0}")]
    MetricsError(prometheus::Error),
}
