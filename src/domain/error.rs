//! Domain error types.

/// Why a bar was rejected at ingestion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BarError {
    #[error("timestamp {got} does not follow previous bar at {previous}")]
    NonMonotonicTimestamp { previous: String, got: String },

    #[error("{field} is negative ({value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },
}

/// Top-level error type for marketcopilot.
#[derive(Debug, thiserror::Error)]
pub enum CopilotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    /// The bar error is part of the message, not a chained source.
    #[error("invalid bar {index} for {symbol}: {reason}")]
    InvalidBar {
        symbol: String,
        index: usize,
        reason: BarError,
    },

    #[error("invalid argument --{arg}: {reason}")]
    InvalidArgument { arg: &'static str, reason: String },

    #[error("sentiment score {value} outside [-1, 1]")]
    InvalidSentiment { value: f64 },

    #[error("sentiment source error: {reason}")]
    SentimentSource { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CopilotError {
    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            CopilotError::Io(_) | CopilotError::Report { .. } => 1,
            CopilotError::ConfigParse { .. }
            | CopilotError::ConfigMissing { .. }
            | CopilotError::ConfigInvalid { .. }
            | CopilotError::InvalidArgument { .. } => 2,
            CopilotError::DataSource { .. } | CopilotError::SentimentSource { .. } => 3,
            CopilotError::InvalidBar { .. } | CopilotError::InvalidSentiment { .. } => 4,
            CopilotError::NoData { .. } => 5,
        }
    }
}

impl From<&CopilotError> for std::process::ExitCode {
    fn from(err: &CopilotError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
