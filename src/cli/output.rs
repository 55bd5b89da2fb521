// {
//   "command": "plan",
//   "status": "success",
//   "data": {
//     "plan": {"rewrittenQuery": "(SELECT * FROM t) as q", "partitionColumn": "date", ...},
//     "options": {"driver": "org.postgresql.Driver", "url": "jdbc:postgresql://...", ...}
//   },
//   "error": null
// }
use crate::cli::error::{RangeReadError, RangeReadErrorKind};
use crate::config::{Engine, JdbcReadOptions};
use crate::planner::{BoundDiscoveryResult, PartitionPlan};

use serde::ser::{Serialize, Serializer};


#[derive(serde::Serialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum RangeReadErrorJson {
    Config(String),
    Engine(String),
    InvalidArgument(String),
    SetGlobalDefault(String),
}

impl From<&RangeReadError> for RangeReadErrorJson {
    fn from(e: &RangeReadError) -> Self {
        let message = e.kind.to_string();

        match &e.kind {
            RangeReadErrorKind::Config(_) => Self::Config(message),
            RangeReadErrorKind::Engine(_) => Self::Engine(message),
            RangeReadErrorKind::InvalidArgument(_) => Self::InvalidArgument(message),
            RangeReadErrorKind::SetGlobalDefault(_) => Self::SetGlobalDefault(message),
        }
    }
}

impl RangeReadErrorJson {
    pub fn message(&self) -> &str {
        match self {
            Self::Config(message)
            | Self::Engine(message)
            | Self::InvalidArgument(message)
            | Self::SetGlobalDefault(message) => message,
        }
    }
}


/// Reader options in insertion order, password already masked.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOptions(pub Vec<(&'static str, String)>);

impl From<&JdbcReadOptions> for ReaderOptions {
    fn from(options: &JdbcReadOptions) -> Self {
        ReaderOptions(options.redacted())
    }
}

impl Serialize for ReaderOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, value)))
    }
}


#[derive(serde::Serialize)]
#[serde(untagged)]
pub enum CommandData {
    Ping { engine: Engine },
    Bounds(BoundDiscoveryResult),
    Plan { plan: PartitionPlan, options: ReaderOptions },
    Single { options: ReaderOptions },
}


#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeReadStatus {
    Success,
    Error,
}

#[derive(serde::Serialize)]
pub struct RangeReadOutput<T: Serialize> {
    pub command: String,
    pub status: RangeReadStatus,
    pub data: Option<T>,
    pub error: Option<RangeReadErrorJson>,
}

impl<T: Serialize> RangeReadOutput<T> {
    pub fn from_result(command: String, result: Result<T, RangeReadError>) -> Self {
        match result {
            Ok(data) => RangeReadOutput {
                command,
                status: RangeReadStatus::Success,
                data: Some(data),
                error: None,
            },
            Err(e) => RangeReadOutput {
                command,
                status: RangeReadStatus::Error,
                data: None,
                error: Some(RangeReadErrorJson::from(&e)),
            },
        }
    }
}
