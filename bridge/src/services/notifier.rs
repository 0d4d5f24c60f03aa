//! Outbound notification channel for one session
//!
//! Every notification is queued as a whole value and written to the socket by
//! a single writer task, so concurrent producers never interleave partial
//! frames and order within each producer is kept.

use tokio::sync::mpsc;

use crate::types::Notification;

/// Capacity of the per-session outbound queue
pub const NOTIFICATION_BUFFER: usize = 100;

/// Cloneable sending half of a session's outbound queue
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::Sender<Notification>,
}

impl Notifier {
    pub fn new(sender: mpsc::Sender<Notification>) -> Self {
        Self { sender }
    }

    /// Create a notifier and the receiver the writer task drains
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Queue a notification; returns `false` once the writer has gone away
    pub async fn send(&self, notification: Notification) -> bool {
        self.sender.send(notification).await.is_ok()
    }

    pub async fn log(&self, message: impl Into<String>) -> bool {
        self.send(Notification::log(message)).await
    }

    pub async fn error(&self, message: impl Into<String>) -> bool {
        self.send(Notification::error(message)).await
    }

    pub async fn done(&self, returncode: i32) -> bool {
        self.send(Notification::done(returncode)).await
    }

    pub async fn pong(&self) -> bool {
        self.send(Notification::pong()).await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotificationKind;

    #[tokio::test]
    async fn test_helpers_queue_in_order() {
        let (notifier, mut rx) = Notifier::channel(8);

        assert!(notifier.log("hello").await);
        assert!(notifier.error("oops").await);
        assert!(notifier.pong().await);
        assert!(notifier.done(0).await);

        let kinds: Vec<_> = (0..4).map(|_| rx.try_recv().unwrap().kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::Log,
                NotificationKind::Error,
                NotificationKind::Pong,
                NotificationKind::Done
            ]
        );
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (notifier, rx) = Notifier::channel(1);
        drop(rx);

        assert!(notifier.is_closed());
        assert!(!notifier.log("nobody is listening").await);
    }
}
