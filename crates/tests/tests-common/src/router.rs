//! Build a router around test doubles.

use std::sync::Arc;
use std::time::Duration;

use axum_test_helper::TestClient;
use nom_nlq::routes::create_router;
use nom_nlq::state::ServerState;
use nom_nlq_configuration::configuration::{API_TITLE, API_VERSION};
use nom_nlq_configuration::{QueryLimits, ServerSettings};

use crate::generator::StubGenerator;
use crate::pool::InMemoryPool;

pub const TEST_MODEL: &str = "test-model";

/// Limits small enough to exercise the caps quickly.
pub fn test_limits() -> QueryLimits {
    QueryLimits {
        statement_timeout: Duration::from_millis(100),
        max_rows: 10,
    }
}

pub fn create_test_state(
    pool: InMemoryPool,
    generator: Arc<StubGenerator>,
    limits: QueryLimits,
) -> Arc<ServerState<InMemoryPool>> {
    let state = ServerState::new(
        pool,
        generator,
        TEST_MODEL.to_string(),
        limits,
        ServerSettings {
            port: 0,
            title: API_TITLE,
            version: API_VERSION,
        },
    )
    .unwrap();
    Arc::new(state)
}

pub fn create_client(state: Arc<ServerState<InMemoryPool>>) -> TestClient {
    TestClient::new(create_router(state))
}
