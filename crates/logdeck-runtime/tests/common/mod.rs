//! Shared fixtures for logdeck-runtime integration tests.

#![allow(dead_code)]

pub mod source;
pub mod view;

use std::time::Duration;

/// Poll `condition` until it holds, failing the test after five seconds.
pub async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {what}"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
