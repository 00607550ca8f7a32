//! Error types for the map styling crates.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type.
///
/// Only boundary problems end up here. Missing attributes, unknown
/// classes and empty inputs are absorbed by the styling code and never
/// produce a `MapError`.
#[derive(Debug, Error)]
pub enum MapError {
    // === Configuration Errors ===
    #[error("Failed to read configuration: {0}")]
    ConfigIo(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    // === Input Errors ===
    #[error("Malformed raster tile: {0}")]
    MalformedTile(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    // === Tile Source Errors ===
    #[error("Unknown tile source: {0}")]
    UnknownSource(String),

    #[error("Access token not set: environment variable {0} is empty or missing")]
    MissingAccessToken(String),
}

impl MapError {
    /// Whether the error comes from the configuration surface rather than
    /// from the data being styled.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            MapError::ConfigIo(_)
                | MapError::ConfigParse(_)
                | MapError::InvalidConfig(_)
                | MapError::InvalidColor(_)
                | MapError::UnknownSource(_)
                | MapError::MissingAccessToken(_)
        )
    }
}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        MapError::ConfigIo(err.to_string())
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::ConfigParse(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for MapError {
    fn from(err: serde_yaml::Error) -> Self {
        MapError::ConfigParse(format!("YAML error: {}", err))
    }
}
