//! Connection session
//!
//! Drives one browser connection: greeting, inbound loop, request dispatch and
//! supervision of the single command invocation a session may run at a time.
//!
//! Dispatch is sequential. Frames that arrive while an invocation is running
//! are queued and dispatched after its `done`, so a `ping` sent during a run is
//! answered only once the run has finished. The transport is still watched
//! during the run so a closed connection cancels the child immediately. At
//! most [`MAX_PENDING_FRAMES`] frames wait; the rest get an `error` reply.

use futures_util::{Stream, StreamExt};
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

use shared::{ProcessId, process_debug, process_info, process_warn};

use crate::protocol::{self, FORMAT_HINT};
use crate::services::notifier::Notifier;
use crate::traits::CommandRunner;
use crate::types::{ClientRequest, InboundFrame, SessionId};
use crate::validator::ValidatedUrl;

/// First notification sent on every connection
pub const GREETING: &str = "WebSocket connected. Please send a YouTube URL.";

/// Error text for URLs rejected by the allow-list
pub const INVALID_URL_MESSAGE: &str =
    "The URL is invalid as a YouTube URL (check allowed domains/formats).";

/// Most frames held back while an invocation runs; later ones are refused
pub const MAX_PENDING_FRAMES: usize = 32;

/// Error text for frames refused because the backlog is full
pub const BACKLOG_FULL_MESSAGE: &str =
    "Too many messages while a command is running; this one was dropped.";

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next inbound message
    Idle,
    /// A request was received and is being classified
    Dispatching,
    /// An invocation is active; further dispatch waits for it
    Running,
    Closed,
}

/// Outcome of dispatching one request
enum Dispatch {
    Handled,
    Launch(ValidatedUrl),
}

pub struct ConnectionSession<R: CommandRunner> {
    id: SessionId,
    runner: R,
    notifier: Notifier,
    cancel: CancellationToken,
    state: SessionState,
}

impl<R: CommandRunner> ConnectionSession<R> {
    pub fn new(id: SessionId, runner: R, notifier: Notifier) -> Self {
        Self {
            id,
            runner,
            notifier,
            cancel: CancellationToken::new(),
            state: SessionState::Idle,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Token cancelled when the session closes; child tokens guard invocations
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the session until the transport closes
    pub async fn run<S>(mut self, mut inbound: S) -> SessionState
    where
        S: Stream<Item = InboundFrame> + Unpin,
    {
        self.notifier.log(GREETING).await;
        let mut backlog: VecDeque<String> = VecDeque::new();

        loop {
            self.state = SessionState::Idle;

            let text = match backlog.pop_front() {
                Some(text) => text,
                None => match inbound.next().await {
                    Some(InboundFrame::Text(text)) => text,
                    Some(InboundFrame::Ignored) => continue,
                    Some(InboundFrame::Failed(e)) => {
                        process_warn!(ProcessId::current(), "⚠️ Transport error on session {}: {}", self.id, e);
                        break;
                    }
                    Some(InboundFrame::Closed) | None => break,
                },
            };

            self.state = SessionState::Dispatching;
            if let Dispatch::Launch(url) = self.dispatch(&text).await {
                self.state = SessionState::Running;
                if !self.supervise(&url, &mut inbound, &mut backlog).await {
                    break;
                }
            }
        }

        self.state = SessionState::Closed;
        self.cancel.cancel();
        process_info!(ProcessId::current(), "👋 Session {} closed", self.id);
        self.state
    }

    async fn dispatch(&self, text: &str) -> Dispatch {
        let request = match protocol::decode(text) {
            Ok(request) => request,
            Err(e) => {
                process_debug!(ProcessId::current(), "Undecodable frame on session {}: {}", self.id, e);
                self.notifier.error(FORMAT_HINT).await;
                return Dispatch::Handled;
            }
        };

        match request {
            ClientRequest::Open { url } => {
                self.notifier.log(format!("Received URL: {url}")).await;
                match ValidatedUrl::parse(&url) {
                    Some(url) => return Dispatch::Launch(url),
                    None => {
                        process_debug!(ProcessId::current(), "Rejected URL on session {}: {}", self.id, url);
                        self.notifier.error(INVALID_URL_MESSAGE).await;
                    }
                }
            }
            ClientRequest::Ping => {
                self.notifier.pong().await;
            }
            ClientRequest::Unknown { kind } => {
                let kind = protocol::describe_kind(kind.as_ref());
                self.notifier.error(format!("Unknown type: {kind}")).await;
            }
        }

        Dispatch::Handled
    }

    /// Await the invocation while watching the transport
    ///
    /// Returns `false` when the transport closed during the run.
    async fn supervise<S>(
        &self,
        url: &ValidatedUrl,
        inbound: &mut S,
        backlog: &mut VecDeque<String>,
    ) -> bool
    where
        S: Stream<Item = InboundFrame> + Unpin,
    {
        let invocation = self.cancel.child_token();
        let run = self.runner.run(url, &self.notifier, &invocation);
        tokio::pin!(run);

        let mut transport_open = true;
        loop {
            tokio::select! {
                returncode = &mut run => {
                    process_debug!(ProcessId::current(), "Invocation on session {} finished: {:?}", self.id, returncode);
                    return transport_open;
                }
                frame = inbound.next(), if transport_open => match frame {
                    Some(InboundFrame::Text(text)) => {
                        if backlog.len() < MAX_PENDING_FRAMES {
                            backlog.push_back(text);
                        } else {
                            process_debug!(ProcessId::current(), "Backlog full on session {}, dropping frame", self.id);
                            self.notifier.error(BACKLOG_FULL_MESSAGE).await;
                        }
                    }
                    Some(InboundFrame::Ignored) => {}
                    Some(InboundFrame::Failed(e)) => {
                        process_warn!(ProcessId::current(), "⚠️ Transport error on session {} during run: {}", self.id, e);
                        invocation.cancel();
                        transport_open = false;
                    }
                    Some(InboundFrame::Closed) | None => {
                        invocation.cancel();
                        transport_open = false;
                    }
                },
            }
        }
    }
}
