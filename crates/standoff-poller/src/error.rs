use standoff_core::ResolveError;

/// Errors returned by the poller's control surface.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PollerError {
    #[error("vision sensor is leased by `{owner}`")]
    SensorBusy { owner: String },
    /// The configured geometry or facing range can never produce a pose.
    #[error("invalid poller params: {0}")]
    InvalidParams(#[from] ResolveError),
}

/// Errors while reading or writing JSON configs and reports.
#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
