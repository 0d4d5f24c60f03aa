//! Service trait definitions for dependency injection
//!
//! Process I/O sits behind these traits so sessions can be tested without
//! spawning anything.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::services::notifier::Notifier;
use crate::validator::ValidatedUrl;

/// Runs the external device command for one validated URL
#[mockall::automock]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run one invocation to completion, streaming its output through `notifier`
    ///
    /// Returns the exit status, or `None` when the process never started or
    /// was cancelled. When a status is returned, `done` is the last
    /// notification this call sent.
    async fn run(
        &self,
        url: &ValidatedUrl,
        notifier: &Notifier,
        cancel: &CancellationToken,
    ) -> Option<i32>;
}
