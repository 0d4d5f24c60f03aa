//! Test helpers for bridge service tests

use futures_util::Stream;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::types::{InboundFrame, Notification, NotificationKind};

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Inbound frame stream fed from a channel; ends when the sender is dropped
pub fn frame_stream(
    rx: mpsc::UnboundedReceiver<InboundFrame>,
) -> Pin<Box<dyn Stream<Item = InboundFrame> + Send>> {
    Box::pin(futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|frame| (frame, rx))
    }))
}

pub fn text(json: &str) -> InboundFrame {
    InboundFrame::Text(json.to_string())
}

/// Receive one notification or fail the test
pub async fn next_notification(rx: &mut mpsc::Receiver<Notification>) -> Notification {
    timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for notification")
        .expect("notification channel closed")
}

/// Receive notifications up to and including the first `done`
pub async fn collect_until_done(rx: &mut mpsc::Receiver<Notification>) -> Vec<Notification> {
    let mut received = Vec::new();
    loop {
        let notification = next_notification(rx).await;
        let is_done = notification.kind == NotificationKind::Done;
        received.push(notification);
        if is_done {
            return received;
        }
    }
}

/// Everything still queued once all senders are gone
pub async fn drain(rx: &mut mpsc::Receiver<Notification>) -> Vec<Notification> {
    let mut received = Vec::new();
    while let Ok(Some(notification)) = timeout(RECV_TIMEOUT, rx.recv()).await {
        received.push(notification);
    }
    received
}

/// Assert nothing arrives within `wait`
pub async fn assert_silent(rx: &mut mpsc::Receiver<Notification>, wait: Duration) {
    if let Ok(Some(notification)) = timeout(wait, rx.recv()).await {
        panic!("unexpected notification: {notification:?}");
    }
}

pub fn kinds(notifications: &[Notification]) -> Vec<NotificationKind> {
    notifications.iter().map(|n| n.kind).collect()
}
