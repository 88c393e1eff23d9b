//! Error Types
//!
//! One error enum for every fallible collaborator call on the dashboard.

use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0}")]
    Configuration(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),

    #[error("{0}")]
    Validation(String),
}

/// Coarse classification used to decide how an error is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal to the owning widget, shown inline, never retried
    Configuration,
    /// Persistence or HTTP failure, shown as a dismissible message
    RemoteCall,
    /// Rejected user input
    Validation,
}

impl DashboardError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Database(_) | Self::Io(_) | Self::Http(_) | Self::Api(_) => ErrorKind::RemoteCall,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::RemoteCall
    }
}
