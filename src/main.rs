use std::process;
use std::sync::Arc;

use indicab::api::DynAPI;
use indicab::config::{Backend, Config};
use indicab::db;
use indicab::engine::Engine;
use indicab::error::Error;
use indicab::fare::FareEstimator;
use indicab::mock::MockEngine;
use indicab::server::serve;

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;

    let api: DynAPI = match config.backend {
        Backend::Memory { latency } => {
            tracing::info!(latency_ms = latency.as_millis() as u64, "using in-memory backend");
            Arc::new(MockEngine::new(FareEstimator::default(), latency))
        }
        Backend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = db::connect(&database_url, max_connections).await?;
            Arc::new(Engine::new(pool, FareEstimator::default()).await?)
        }
    };

    serve(api, config.bind_addr).await
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    if let Err(err) = run().await {
        tracing::error!(code = err.code, message = %err.message, "indicab exited");
        process::exit(1);
    }
}
