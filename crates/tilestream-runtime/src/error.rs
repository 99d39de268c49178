use std::error::Error;
use std::fmt;

use tilestream_world::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamerError {
    Config(ConfigError),
    MissingTileSurface,
    MissingPropSink,
}

impl fmt::Display for StreamerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamerError::Config(e) => write!(f, "invalid world config: {}", e),
            StreamerError::MissingTileSurface => write!(f, "no tile surface assigned"),
            StreamerError::MissingPropSink => write!(f, "no prop sink assigned"),
        }
    }
}

impl Error for StreamerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamerError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for StreamerError {
    fn from(value: ConfigError) -> Self {
        StreamerError::Config(value)
    }
}
