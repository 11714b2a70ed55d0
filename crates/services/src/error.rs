//! Shared error types for the services crate.

use thiserror::Error;

use backend::BackendError;

/// Errors emitted by the lesson session engine and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("lesson has no questions")]
    Empty,

    #[error("cannot check an answer with no hearts left")]
    OutOfHearts,

    #[error("lesson session already completed")]
    Completed,

    #[error("lesson session is not finished yet")]
    NotFinished,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Backend(#[from] BackendError),
}
