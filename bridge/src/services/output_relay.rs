//! Forwards one child output stream to the browser, line by line

use std::fmt;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

use shared::{ProcessId, process_debug, process_warn};

use crate::services::notifier::Notifier;

/// Output channel of the external process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChannel {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputChannel::Stdout => write!(f, "stdout"),
            OutputChannel::Stderr => write!(f, "stderr"),
        }
    }
}

/// Turn one raw line into display text
///
/// Invalid UTF-8 is replaced rather than rejected and the line terminator is
/// dropped.
pub fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Read `reader` to end of stream, emitting `[<channel>] <line>` log notifications
///
/// Returns the number of lines read. Once the client is gone the stream is
/// still drained so the child never stalls on a full pipe.
pub async fn relay_lines<R>(reader: R, channel: OutputChannel, notifier: Notifier) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut lines = 0;
    let mut client_gone = false;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                lines += 1;
                if client_gone {
                    continue;
                }
                let text = format!("[{channel}] {}", decode_line(&buf));
                if !notifier.log(text).await {
                    process_debug!(ProcessId::current(), "Client gone, draining {} without forwarding", channel);
                    client_gone = true;
                }
            }
            Err(e) => {
                process_warn!(ProcessId::current(), "⚠️ Failed to read {}: {}", channel, e);
                break;
            }
        }
    }

    lines
}

/// Run [`relay_lines`] as its own task
pub fn spawn_relay<R>(reader: R, channel: OutputChannel, notifier: Notifier) -> JoinHandle<usize>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(relay_lines(reader, channel, notifier))
}
