use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nom_nlq::{routes, state};
use nom_nlq_configuration::{Configuration, ServerOptions};

#[tokio::main]
pub async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run(ServerOptions::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(options: ServerOptions) -> anyhow::Result<()> {
    let configuration = Configuration::from_options(options)?;
    let state = Arc::new(
        state::create_state(&configuration)
            .await
            .context("unable to initialize the server state")?,
    );

    let address = SocketAddr::from(([0, 0, 0, 0], configuration.server.port));
    tracing::info!(%address, "starting {}", configuration.server.title);

    axum::Server::bind(&address)
        .serve(routes::create_router(state.clone()).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    state::teardown(&state).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "unable to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
