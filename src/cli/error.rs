use crate::config::ConfigError;
use crate::db::EngineError;
use crate::planner::PlanError;

use std::error::Error;
use std::fmt;
use tracing::subscriber::SetGlobalDefaultError;


#[derive(Debug)]
pub struct RangeReadError {
    pub kind: RangeReadErrorKind
}

impl RangeReadError {
    /// Whether the caller supplied something unusable, as opposed to the
    /// database or the environment failing.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, RangeReadErrorKind::InvalidArgument(_))
    }
}

impl fmt::Display for RangeReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RangeReadError: {}", self.kind)
    }
}

impl Error for RangeReadError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum RangeReadErrorKind {
    Config(ConfigError),
    Engine(EngineError),
    InvalidArgument(PlanError),
    SetGlobalDefault(SetGlobalDefaultError),
}

impl fmt::Display for RangeReadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(error) => write!(f, "{}", error.kind),
            Self::Engine(error) => write!(f, "{}", error.kind),
            Self::InvalidArgument(error) => write!(f, "Invalid argument: {}", error.kind),
            Self::SetGlobalDefault(error) => write!(f, "Failed to set global default subscriber: {}", error),
        }
    }
}

impl Error for RangeReadErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Config(source) => Some(source),
			Self::Engine(source) => Some(source),
			Self::InvalidArgument(source) => Some(source),
			Self::SetGlobalDefault(source) => Some(source),
		}
	}
}

impl From<ConfigError> for RangeReadError {
    fn from(error: ConfigError) -> Self {
        RangeReadError { kind: RangeReadErrorKind::Config(error) }
    }
}

impl From<EngineError> for RangeReadError {
    fn from(error: EngineError) -> Self {
        RangeReadError { kind: RangeReadErrorKind::Engine(error) }
    }
}

impl From<PlanError> for RangeReadError {
    fn from(error: PlanError) -> Self {
        RangeReadError { kind: RangeReadErrorKind::InvalidArgument(error) }
    }
}

impl From<SetGlobalDefaultError> for RangeReadError {
    fn from(error: SetGlobalDefaultError) -> Self {
        RangeReadError { kind: RangeReadErrorKind::SetGlobalDefault(error) }
    }
}
