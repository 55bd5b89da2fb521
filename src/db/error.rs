use crate::config::Engine;

use std::error::Error;
use std::fmt;


#[derive(Debug)]
#[non_exhaustive]
pub struct EngineError {
    pub kind: EngineErrorKind
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineError: {}", self.kind)
    }
}

impl Error for EngineError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum EngineErrorKind {
    ColumnCountMismatch { expected: usize, found: usize },
    DiscoveryUnsupported(Engine),
    SQLX(sqlx::Error),
    UnsupportedBoundType { column_index: usize, found: String },
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnCountMismatch { expected, found } => {
                write!(f, "Expected {expected} column(s) in result, found {found}")
            },
            Self::DiscoveryUnsupported(engine) => write!(f, "Querying the database is not supported for engine: {engine:?}"),
            Self::SQLX(e) => write!(f, "{e}"),
            Self::UnsupportedBoundType { column_index, found } => {
                write!(f, "Column {column_index} has unsupported bound type: {found}")
            },
        }
    }
}

impl Error for EngineErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::SQLX(source) => Some(source),
			_ => None,
		}
	}
}

impl From<sqlx::Error> for EngineError {
    fn from(error: sqlx::Error) -> Self {
        EngineError { kind: EngineErrorKind::SQLX(error) }
    }
}
