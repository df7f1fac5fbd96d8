//! Error types for the router.

/// Errors raised while building or running the routing pipeline.
///
/// None of these reach the caller of `Dispatcher::dispatch`; handler-side
/// errors are folded into a failed `HandlerResult` there.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("Invalid intent pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Handler timed out after {0} seconds")]
    Timeout(u64),
    #[error("Handler task failed: {0}")]
    HandlerTask(#[from] tokio::task::JoinError),
}
