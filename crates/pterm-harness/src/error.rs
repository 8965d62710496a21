#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Pterm(#[from] pterm::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal is not mounted")]
    Unmounted,
}

impl From<pterm::ConfigError> for HarnessError {
    fn from(err: pterm::ConfigError) -> Self {
        Self::Pterm(err.into())
    }
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Pterm(pterm::Error::Config(_)) => 2,
            Self::Pterm(_) | Self::Io(_) | Self::Unmounted => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
