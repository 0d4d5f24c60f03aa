//! Tests for transport liveness

use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

use super::helpers::*;
use crate::services::heartbeat::{deadline_for, ping_interval, watch_inbound};
use crate::types::InboundFrame;

#[test]
fn test_deadline_is_two_periods() {
    assert_eq!(deadline_for(Duration::from_secs(30)), Duration::from_secs(60));
    assert!(deadline_for(Duration::ZERO) > Duration::ZERO);
}

#[tokio::test]
async fn test_first_ping_waits_one_period() {
    let mut pings = ping_interval(Duration::from_millis(200));

    assert!(timeout(Duration::from_millis(50), pings.tick()).await.is_err());
    assert!(timeout(Duration::from_millis(400), pings.tick()).await.is_ok());
}

#[tokio::test]
async fn test_frames_pass_through() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut inbound = watch_inbound(frame_stream(rx), RECV_TIMEOUT);

    tx.send(text(r#"{"type":"ping"}"#)).unwrap();
    tx.send(InboundFrame::Ignored).unwrap();
    drop(tx);

    assert_eq!(inbound.next().await, Some(text(r#"{"type":"ping"}"#)));
    assert_eq!(inbound.next().await, Some(InboundFrame::Ignored));
    assert_eq!(inbound.next().await, None);
}

#[tokio::test]
async fn test_silent_peer_fails_once_then_ends() {
    let (_tx, rx) = mpsc::unbounded_channel();
    let mut inbound = watch_inbound(frame_stream(rx), Duration::from_millis(100));

    let frame = timeout(RECV_TIMEOUT, inbound.next()).await.unwrap();
    assert!(matches!(frame, Some(InboundFrame::Failed(detail)) if detail.contains("no frame from peer")));
    assert_eq!(inbound.next().await, None);
}

#[tokio::test]
async fn test_pongs_keep_the_peer_alive() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut inbound = watch_inbound(frame_stream(rx), Duration::from_millis(150));

    tokio::spawn(async move {
        for _ in 0..6 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            if tx.send(InboundFrame::Ignored).is_err() {
                return;
            }
        }
        let _ = tx.send(InboundFrame::Closed);
    });

    let mut seen = Vec::new();
    while let Some(frame) = timeout(RECV_TIMEOUT, inbound.next()).await.unwrap() {
        let closed = frame == InboundFrame::Closed;
        seen.push(frame);
        if closed {
            break;
        }
    }
    assert_eq!(seen.len(), 7);
    assert!(seen.iter().all(|f| !matches!(f, InboundFrame::Failed(_))));
}
