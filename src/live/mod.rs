//! Live ingestion over the push channel.
//!
//! A single background task keeps a websocket open to the server, decodes
//! new-item frames and forwards them to the UI thread.  It never mutates feed
//! state itself; the items only ever reach a feed's pending buffer through
//! [`FeedStore::update`](crate::feed::FeedStore::update).

mod backoff;
mod channel;
mod event;

pub use backoff::Backoff;
pub use channel::run;
pub use event::Router;

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::feed::Msg;

/// Status of the push channel, shown as the "live" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Owns the running channel task.  Dropping it ends the session's channel.
pub struct LiveHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl LiveHandle {
    /// Start the connection loop on `runtime`.
    pub fn spawn(
        runtime: &Handle,
        url: Url,
        backoff: Backoff,
        connect_timeout: Duration,
        router: Router,
        tx: UnboundedSender<Msg>,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let task = runtime.spawn(run(
            url,
            backoff,
            connect_timeout,
            router,
            tx,
            shutdown.clone(),
        ));
        Self { shutdown, task }
    }

    /// Close the channel and wait for the loop to exit.  No reconnection
    /// is attempted afterwards.
    pub async fn close(mut self) {
        self.shutdown.cancel();
        let _ = (&mut self.task).await;
    }
}

impl Drop for LiveHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
