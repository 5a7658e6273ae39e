//! Background API work for the UI event loop
//!
//! Reads run as spawned tasks under the current view's cancellation token
//! and report back over an unbounded channel. Leaving a view cancels its
//! reads. Moves run outside any token and always report.

use crate::client::TrackerClient;
use crate::error::Result;
use crate::query::{self, QueryData, QueryKey};
use crate::sync;
use crate::transport::{HttpTransport, Transport};
use taskboard_core::board::PendingMove;
use taskboard_core::models::Task;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum FetchMessage {
    Fetched {
        key: QueryKey,
        result: Result<QueryData>,
    },
    MoveFinished {
        mv: PendingMove,
        result: Result<Task>,
    },
}

pub struct Fetcher<T: Transport = HttpTransport> {
    client: TrackerClient<T>,
    tx: mpsc::UnboundedSender<FetchMessage>,
    view_token: CancellationToken,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(client: TrackerClient<T>) -> (Self, mpsc::UnboundedReceiver<FetchMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Self {
            client,
            tx,
            view_token: CancellationToken::new(),
        };
        (fetcher, rx)
    }

    pub fn client(&self) -> &TrackerClient<T> {
        &self.client
    }

    /// Fetch `key` in the background for the current view
    pub fn fetch(&self, key: QueryKey) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let token = self.view_token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(?key, "fetch cancelled");
                }
                result = query::fetch(&client, &key) => {
                    if let Err(e) = &result {
                        tracing::warn!(?key, error = %e, "fetch failed");
                    }
                    let _ = tx.send(FetchMessage::Fetched { key, result });
                }
            }
        });
    }

    pub fn fetch_all(&self, keys: impl IntoIterator<Item = QueryKey>) {
        for key in keys {
            self.fetch(key);
        }
    }

    /// Persist a board move. Not tied to the view, so it survives teardown.
    pub fn send_move(&self, mv: PendingMove) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = sync::send_move(&client, &mv).await;
            let _ = tx.send(FetchMessage::MoveFinished { mv, result });
        });
    }

    /// Cancel every read started for the view being left
    pub fn teardown(&mut self) {
        self.view_token.cancel();
        self.view_token = CancellationToken::new();
    }
}

impl<T: Transport> Drop for Fetcher<T> {
    fn drop(&mut self) {
        self.view_token.cancel();
    }
}
