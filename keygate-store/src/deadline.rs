//! Deadline wrapper for store calls.

use crate::error::{StoreError, StoreResult};
use std::future::Future;
use std::time::Duration;

/// Runs a store future under a deadline.
///
/// Elapsing maps to [`StoreError::Timeout`], which is retryable — distinct
/// from business-logic rejections so callers can back off and try again
/// (but must not blindly retry non-idempotent mutations; see the
/// activation manager's idempotent re-activation rule).
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout),
    }
}
