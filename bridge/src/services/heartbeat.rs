//! Transport liveness
//!
//! The writer task pings the peer every interval. The inbound side treats a
//! silence longer than the deadline as a transport failure, so a half-open
//! connection still ends its session and cancels any running command.

use futures_util::{Stream, StreamExt, stream};
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, timeout};

use crate::types::InboundFrame;

/// Default period between WebSocket pings
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Boxed inbound frame stream handed to a session
pub type InboundStream = Pin<Box<dyn Stream<Item = InboundFrame> + Send>>;

/// Silence tolerated before the peer counts as gone: two missed pongs
pub fn deadline_for(interval: Duration) -> Duration {
    interval.max(MIN_PERIOD) * 2
}

/// Ping schedule whose first tick is one period from now
pub fn ping_interval(period: Duration) -> Interval {
    let period = period.max(MIN_PERIOD);
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Pass frames through until the peer stays silent for `deadline`
///
/// Silence yields one `Failed` frame and then ends the stream. Any frame,
/// pongs included, restarts the clock.
pub fn watch_inbound<S>(inbound: S, deadline: Duration) -> InboundStream
where
    S: Stream<Item = InboundFrame> + Unpin + Send + 'static,
{
    Box::pin(stream::unfold(Some(inbound), move |state| async move {
        let mut inbound = state?;
        match timeout(deadline, inbound.next()).await {
            Ok(Some(frame)) => Some((frame, Some(inbound))),
            Ok(None) => None,
            Err(_) => Some((
                InboundFrame::Failed(format!("no frame from peer within {deadline:?}")),
                None,
            )),
        }
    }))
}
