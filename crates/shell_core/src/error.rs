use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("no route was captured before the UI became ready")]
    InitialRouteMissing,
    #[error("the initial route has already been applied")]
    InitialRouteAlreadyApplied,
}

#[derive(Debug, Error)]
pub enum ShellError {
    /// A genuine fault surfaced on the error overlay and raised again for upstream handlers.
    #[error("{0}")]
    Fault(Arc<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    Router(#[from] RouterError),
}
