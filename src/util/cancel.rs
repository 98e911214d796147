//! Racing work against a cancellation token.

use std::future::Future;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{DeviceFlowError, Result};

/// Run a future until it completes or `cancel` fires, dropping it on cancellation.
pub async fn with_cancellation<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DeviceFlowError::Cancelled),
        result = future => result,
    }
}

/// Sleep until `deadline` unless `cancel` fires first.
pub async fn cancellable_sleep_until(cancel: &CancellationToken, deadline: Instant) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DeviceFlowError::Cancelled),
        _ = tokio::time::sleep_until(deadline) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_wins_over_ready_future() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = with_cancellation(&cancel, async { Ok(1) }).await;
        assert!(matches!(result, Err(DeviceFlowError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_is_interrupted_by_cancel() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let start = Instant::now();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });
        let result = cancellable_sleep_until(&cancel, start + Duration::from_secs(60)).await;
        assert!(matches!(result, Err(DeviceFlowError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_completes_without_cancel() {
        let cancel = CancellationToken::new();
        let start = Instant::now();
        cancellable_sleep_until(&cancel, start + Duration::from_secs(5))
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
