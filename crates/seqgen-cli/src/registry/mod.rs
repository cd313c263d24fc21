mod logging;
mod run;

pub use logging::{init_console_logging, init_run_logging};
pub use run::{
    CustomSummary, RequestSummary, RunContext, RunPaths, discard_run, latest_run, load_results,
    start_run, write_report, write_results,
};

use std::path::PathBuf;

use thiserror::Error;

/// Registry-level errors for run artifacts.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("no results under {0}; run `seqgen generate` first")]
    NoResults(PathBuf),
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
