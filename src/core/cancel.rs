//! Cooperative cancellation for long-running work
//!
//! Work is cancelled through [`CancellationToken`]; callers that want a
//! time limit arm the token with [`cancel_after`].

use std::thread;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Cancel `token` once `timeout` has elapsed
///
/// The timer runs on its own thread, so no async runtime is needed. It
/// exits early if the token is cancelled by someone else first.
pub fn cancel_after(token: &CancellationToken, timeout: Duration) {
    if timeout.is_zero() {
        token.cancel();
        return;
    }
    // Too far away to ever fire
    let Some(deadline) = Instant::now().checked_add(timeout) else {
        return;
    };
    let token = token.clone();
    thread::spawn(move || {
        while !token.is_cancelled() {
            let now = Instant::now();
            if now >= deadline {
                tracing::debug!(?timeout, "time limit reached, cancelling");
                token.cancel();
                break;
            }
            thread::sleep((deadline - now).min(POLL_INTERVAL));
        }
    });
}
