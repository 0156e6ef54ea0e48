use thiserror::Error;

/// A host capability rejected or was unavailable.
///
/// Every variant is a degraded outcome: the worker logs it and carries on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    #[error("showNotification failed: {0}")]
    ShowNotification(String),

    #[error("clients.matchAll failed: {0}")]
    MatchWindows(String),

    #[error("focus failed: {0}")]
    Focus(String),

    #[error("postMessage failed: {0}")]
    PostMessage(String),

    #[error("clients.openWindow failed: {0}")]
    OpenWindow(String),

    #[error("skipWaiting failed: {0}")]
    SkipWaiting(String),

    #[error("{0} is not available in this environment")]
    Unsupported(&'static str),
}

pub type HostResult<T> = Result<T, HostError>;
