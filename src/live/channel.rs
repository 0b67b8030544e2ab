//! The push channel connection loop.
//!
//! [`ChannelMachine`] is the pure part: it knows the current
//! [`ConnectionState`] and how long to wait after a drop.  [`run`] performs
//! the I/O around it and reports every transition to the UI thread as
//! [`Msg::Connection`], followed by any decoded items as [`Msg::LiveItem`].
//!
//! A connect attempt that has not completed within the connect timeout
//! counts as a drop.
//!
//! The loop never gives up on its own.  The only exit is the
//! [`CancellationToken`], which interrupts a pending connect, an open
//! connection or a scheduled retry alike.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

use super::{Backoff, ConnectionState, Router};
use crate::feed::Msg;

/// `connecting → connected → disconnected → connecting → …`
#[derive(Debug, Clone)]
pub struct ChannelMachine {
    state: ConnectionState,
    backoff: Backoff,
    /// Drops since the last successful connection.
    failures: u32,
}

impl ChannelMachine {
    /// A fresh session starts out connecting.
    pub fn new(backoff: Backoff) -> Self {
        Self {
            state: ConnectionState::Connecting,
            backoff,
            failures: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn opened(&mut self) {
        self.state = ConnectionState::Connected;
        self.failures = 0;
    }

    /// The channel closed or never opened.  Returns how long to wait before
    /// the next attempt.
    pub fn closed(&mut self) -> Duration {
        self.state = ConnectionState::Disconnected;
        let delay = self.backoff.delay(self.failures);
        self.failures = self.failures.saturating_add(1);
        delay
    }

    /// The retry delay elapsed.
    pub fn retry(&mut self) {
        self.state = ConnectionState::Connecting;
    }
}

enum Exit {
    /// Remote close, network error or end of stream.
    Dropped,
    /// Shut down, or nobody is listening any more.
    Stop,
}

/// Keep a connection to `url` alive until `shutdown` fires.
pub async fn run(
    url: Url,
    backoff: Backoff,
    connect_timeout: Duration,
    router: Router,
    tx: UnboundedSender<Msg>,
    shutdown: CancellationToken,
) {
    let mut machine = ChannelMachine::new(backoff);
    loop {
        if !report(&tx, machine.state()) {
            return;
        }
        info!(%url, "connecting push channel");

        let attempt = tokio::select! {
            _ = shutdown.cancelled() => return,
            attempt = timeout(connect_timeout, connect_async(url.as_str())) => attempt,
        };
        match attempt {
            Ok(Ok((stream, _))) => {
                machine.opened();
                if !report(&tx, machine.state()) {
                    return;
                }
                info!("push channel connected");
                if let Exit::Stop = pump(stream, &router, &tx, &shutdown).await {
                    return;
                }
            }
            Ok(Err(e)) => warn!(error = %e, "push channel connect failed"),
            Err(_) => warn!(?connect_timeout, "push channel connect timed out"),
        }

        let delay = machine.closed();
        if !report(&tx, machine.state()) {
            return;
        }
        info!(?delay, "push channel down, retrying");

        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        machine.retry();
    }
}

async fn pump(
    mut stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    router: &Router,
    tx: &UnboundedSender<Msg>,
    shutdown: &CancellationToken,
) -> Exit {
    loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = stream.close(None).await;
                return Exit::Stop;
            }
            frame = stream.next() => frame,
        };
        match frame {
            Some(Ok(Message::Text(text))) => {
                let Some((category, item)) = router.route(&text) else {
                    continue;
                };
                if tx.send(Msg::LiveItem { category, item }).is_err() {
                    return Exit::Stop;
                }
            }
            Some(Ok(Message::Close(reason))) => {
                info!(?reason, "push channel closed by server");
                return Exit::Dropped;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!(error = %e, "push channel error");
                return Exit::Dropped;
            }
            None => return Exit::Dropped,
        }
    }
}

/// Returns `false` once the receiving side is gone.
fn report(tx: &UnboundedSender<Msg>, state: ConnectionState) -> bool {
    tx.send(Msg::Connection(state)).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
