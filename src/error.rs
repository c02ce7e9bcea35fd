use thiserror::Error;

/// Everything the pipeline can fail with. Each variant names the exact
/// column or precondition that failed; callers surface these verbatim.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("column `{0}` not found in table schema")]
    MissingColumn(String),

    #[error("no dataset loaded yet; load a CSV first")]
    NotLoaded,

    #[error("`{0}` requires a cleaned table; run clean first")]
    NotCleaned(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
