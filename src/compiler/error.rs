use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("Failed to start compiler `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a stderr line did not yield a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected at least 3 colon-separated fields")]
    TooFewFields,

    #[error("line number {0:?} is not an integer")]
    InvalidLineNumber(String),
}
