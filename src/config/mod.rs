//! Connection and reader configuration.
//!
//! Nothing in here reads the process environment; the CLI fills these
//! structs from arguments and environment variables at the entry point.
mod error;
mod options;

pub use error::{ConfigError, ConfigErrorKind};
pub use options::{JdbcEndpoint, JdbcReadOptions, Partitioning, ReadSource};

use clap::ValueEnum;
use serde::Serialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::fmt;


/// JDBC driver classes by URL subprotocol (`jdbc:<subprotocol>:...`).
static JDBC_DRIVERS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "postgresql" => "org.postgresql.Driver",
    "redshift" => "com.amazon.redshift.jdbc.Driver",
    "vertica" => "com.vertica.jdbc.Driver",
};

pub const PASSWORD_MASK: &str = "***";


#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Postgres,
    Redshift,
    Vertica,
}

impl Engine {
    pub fn jdbc_subprotocol(&self) -> &'static str {
        match self {
            Engine::Postgres => "postgresql",
            Engine::Redshift => "redshift",
            Engine::Vertica => "vertica",
        }
    }

    fn tls_parameter(&self) -> &'static str {
        match self {
            Engine::Postgres | Engine::Redshift => "ssl=true",
            Engine::Vertica => "TLSmode=require",
        }
    }
}


#[derive(Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub tls: bool,
}

impl ConnectionConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.tls { PgSslMode::Require } else { PgSslMode::Disable };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(ssl_mode)
    }

    /// `jdbc:<subprotocol>://<host>:<port>/<database>[?<tls parameter>]`
    pub fn jdbc_url(&self, engine: Engine) -> String {
        let url = format!(
            "jdbc:{}://{}:{}/{}",
            engine.jdbc_subprotocol(),
            self.host,
            self.port,
            self.database,
        );

        if self.tls {
            format!("{url}?{}", engine.tls_parameter())
        } else {
            url
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &PASSWORD_MASK)
            .field("database", &self.database)
            .field("tls", &self.tls)
            .finish()
    }
}


/// Extract the subprotocol from a JDBC URL: "jdbc:postgresql:dbserver" -> "postgresql"
pub fn jdbc_subprotocol(url: &str) -> Result<&str, ConfigError> {
    url.strip_prefix("jdbc:")
        .and_then(|rest| rest.split(':').next())
        .filter(|subprotocol| !subprotocol.is_empty())
        .ok_or_else(|| ConfigError { kind: ConfigErrorKind::InvalidJdbcUrl(url.to_string()) })
}

pub fn driver_for_url(url: &str) -> Result<&'static str, ConfigError> {
    let subprotocol = jdbc_subprotocol(url)?;

    JDBC_DRIVERS
        .get(subprotocol)
        .copied()
        .ok_or_else(|| ConfigError { kind: ConfigErrorKind::UnknownDriver(subprotocol.to_string()) })
}
