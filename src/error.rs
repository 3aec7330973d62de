use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    /// Series empty or too short to estimate a transition matrix.
    /// Recovered locally with a default forecast, never fatal to a cycle.
    #[error("insufficient data for {asset}: {observed} daily returns (need {minimum})")]
    DataInsufficient {
        asset: String,
        observed: usize,
        minimum: usize,
    },

    #[error("unknown asset: {0}")]
    InvalidAsset(String),

    #[error("invalid schedule date: {0}")]
    InvalidDate(String),

    /// Fan-in never reached zero before the cycle deadline.
    #[error("planning cycle incomplete, missing responses for: {}", missing.join(", "))]
    IncompleteCycle { missing: Vec<String> },

    #[error("execution worker failure: {0}")]
    ExecutionFailure(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
