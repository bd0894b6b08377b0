use std::{path::PathBuf, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{verb}` timed out after {}s", timeout.as_secs())]
    Timeout {
        verb: &'static str,
        timeout: Duration,
    },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    #[must_use]
    pub fn spawn(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
