use std::error::Error;
use std::fmt;


#[derive(Debug)]
#[non_exhaustive]
pub struct ConfigError {
    pub kind: ConfigErrorKind
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigError: {}", self.kind)
    }
}

impl Error for ConfigError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum ConfigErrorKind {
    InvalidJdbcUrl(String),
    UnknownDriver(String),
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJdbcUrl(url) => write!(f, "Invalid JDBC URL: '{url}' (expected 'jdbc:<subprotocol>:...')"),
            Self::UnknownDriver(subprotocol) => write!(f, "No known JDBC driver for subprotocol '{subprotocol}' - set --driver explicitly"),
        }
    }
}

impl Error for ConfigErrorKind {}
