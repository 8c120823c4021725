use connection::ConnectionError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("sample at t={timestamp} precedes last stored t={last}")]
    OrderViolation { timestamp: f64, last: f64 },
    #[error("sample has {actual} values, store expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("sample timestamp is not finite: {0}")]
    InvalidTimestamp(f64),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Input should be in the form \"<min>,<max>\".")]
    Format,
    #[error("'{0}' is not a number")]
    NotNumeric(String),
    #[error("range minimum {min} must be less than maximum {max}")]
    Inverted { min: f64, max: f64 },
}

#[derive(thiserror::Error, Debug)]
pub enum ProtocolError {
    #[error("data message length {0} is not a multiple of 4 bytes")]
    Misaligned(usize),
    #[error("data message carries {actual} values, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
    #[error("malformed server message: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("payload rejected: {0}")]
    Rejected(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown setting '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no plot registered as '{0}'")]
    UnknownPlot(String),
}

#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
