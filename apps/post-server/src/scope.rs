//! Per-request cancellation.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns the cancellation token handed to the service for one request.
///
/// The token fires when the timeout elapses or when the scope is dropped,
/// which happens if actix drops the handler future on client disconnect.
pub struct RequestScope {
    token: CancellationToken,
    timer: JoinHandle<()>,
}

impl RequestScope {
    pub fn start(timeout: Duration) -> Self {
        let token = CancellationToken::new();
        let deadline = token.clone();
        let timer = actix_rt::spawn(async move {
            actix_rt::time::sleep(timeout).await;
            tracing::debug!(?timeout, "Request deadline elapsed");
            deadline.cancel();
        });

        Self { token, timer }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.timer.abort();
        self.token.cancel();
    }
}
