mod error;
mod postgres;

pub use error::{EngineError, EngineErrorKind};
pub use postgres::PostgresEngine;

use crate::config::{ConnectionConfig, Engine};
use crate::planner::BoundDiscoveryResult;


/// Engines the CLI can query directly. Both speak the Postgres wire protocol.
pub enum EngineBackend {
    Postgres(PostgresEngine),
    Redshift(PostgresEngine),
}

impl EngineBackend {
    pub fn new(engine: Engine, config: &ConnectionConfig) -> Result<Self, EngineError> {
        match engine {
            Engine::Postgres => Ok(EngineBackend::Postgres(PostgresEngine::new(config.connect_options()))),
            Engine::Redshift => Ok(EngineBackend::Redshift(PostgresEngine::new(config.connect_options()))),
            Engine::Vertica => Err(EngineError { kind: EngineErrorKind::DiscoveryUnsupported(engine) }),
        }
    }

    pub fn engine(&self) -> Engine {
        match self {
            EngineBackend::Postgres(_) => Engine::Postgres,
            EngineBackend::Redshift(_) => Engine::Redshift,
        }
    }
}

impl DbEngine for EngineBackend {
    async fn ping(&mut self) -> Result<(), EngineError> {
        match self {
            EngineBackend::Postgres(engine) => engine.ping().await,
            EngineBackend::Redshift(engine) => engine.ping().await,
        }
    }

    async fn fetch_bounds(&mut self, sql: &str) -> Result<BoundDiscoveryResult, EngineError> {
        match self {
            EngineBackend::Postgres(engine) => engine.fetch_bounds(sql).await,
            EngineBackend::Redshift(engine) => engine.fetch_bounds(sql).await,
        }
    }
}


#[allow(async_fn_in_trait)]
pub trait DbEngine {
    /// Check the database is reachable and accepts queries.
    async fn ping(&mut self) -> Result<(), EngineError>;
    /// Run a query returning exactly one row of two columns, the minimum and the maximum.
    async fn fetch_bounds(&mut self, sql: &str) -> Result<BoundDiscoveryResult, EngineError>;
}
