use thiserror::Error;

/// Construction-time failures. Analysis itself never fails: bad input text
/// degrades to an empty result and a non-compiling pattern is skipped with
/// a warning before the first call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("pattern library contains no patterns")]
    EmptyLibrary,

    #[error("pattern `{0}` has no markers")]
    NoMarkers(String),

    #[error("pattern `{name}` has non-positive weight {weight}")]
    InvalidWeight { name: String, weight: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read pattern library: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse pattern library: {0}")]
    Parse(#[from] serde_json::Error),
}
