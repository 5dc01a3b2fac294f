//! # Timeout Utilities
//!
//! Shared duration constants and an async timeout wrapper that converts
//! elapsed deadlines into `ProtocolError::Timeout`.

use std::future::Future;
use std::time::Duration;

use crate::error::{ProtocolError, Result};

/// Default ceiling for a single network operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long shutdown waits for in-flight connections to finish.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs `fut` with a deadline, mapping expiry to [`ProtocolError::Timeout`].
pub async fn with_timeout_error<F, T>(fut: F, limit: Duration) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProtocolError::Timeout),
    }
}
