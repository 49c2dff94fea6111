//! Link source boundary
//!
//! A [`LinkSource`] supplies the link that launched the process (if any) and
//! a live stream of links delivered while running. Source failures are never
//! fatal to the engine: an initial-link error is logged and setup completes,
//! and a per-item stream error is logged without tearing the stream down.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("initial link unavailable: {0}")]
    InitialLink(String),

    #[error("link stream error: {0}")]
    Stream(String),
}

/// Events delivered on the live link stream
pub type LinkEvent = Result<String, SourceError>;

/// Boundary trait for platform link capture
///
/// `link_stream` is non-restartable: the engine calls it exactly once during
/// initialization and consumes the returned receiver for its whole lifetime.
#[async_trait]
pub trait LinkSource: Send + Sync {
    /// The link that launched the process, if the process was launched via one
    async fn initial_link(&self) -> Result<Option<String>, SourceError>;

    /// Live stream of links received while running
    fn link_stream(&self) -> mpsc::UnboundedReceiver<LinkEvent>;
}

/// Channel-backed source for hosts, demos and tests
///
/// The host keeps the [`LinkEmitter`] and pushes links into it; the engine
/// consumes the paired receiver. A second `link_stream` call yields a closed
/// receiver, honoring the non-restartable contract.
pub struct ChannelLinkSource {
    initial: Option<String>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<LinkEvent>>>,
}

/// Sending half paired with a [`ChannelLinkSource`]
#[derive(Clone)]
pub struct LinkEmitter {
    sender: mpsc::UnboundedSender<LinkEvent>,
}

impl LinkEmitter {
    /// Push a link into the stream; returns false if the consumer is gone
    pub fn emit(&self, uri: impl Into<String>) -> bool {
        self.sender.send(Ok(uri.into())).is_ok()
    }

    /// Push a delivery error into the stream
    pub fn emit_error(&self, error: SourceError) -> bool {
        self.sender.send(Err(error)).is_ok()
    }
}

impl ChannelLinkSource {
    pub fn channel(initial: Option<String>) -> (Self, LinkEmitter) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let source = Self {
            initial,
            receiver: Mutex::new(Some(receiver)),
        };
        (source, LinkEmitter { sender })
    }
}

#[async_trait]
impl LinkSource for ChannelLinkSource {
    async fn initial_link(&self) -> Result<Option<String>, SourceError> {
        Ok(self.initial.clone())
    }

    fn link_stream(&self) -> mpsc::UnboundedReceiver<LinkEvent> {
        let taken = self.receiver.lock().expect("link source lock poisoned").take();
        match taken {
            Some(receiver) => receiver,
            None => {
                warn!("link_stream called twice on ChannelLinkSource, returning closed stream");
                let (_tx, rx) = mpsc::unbounded_channel();
                rx
            }
        }
    }
}
