//! In-process message bus
//!
//! Every open view holds a [`MessageBus`] clone; a message published by one
//! is received by all current subscribers, including the publisher's own.

pub use shared::message::{Notice, NotificationLevel, ShopMessage};

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast channel for [`ShopMessage`]s
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<ShopMessage>,
}

impl MessageBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish to all subscribers; returns how many received it
    ///
    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, msg: ShopMessage) -> usize {
        let kind = msg.kind();
        match self.tx.send(msg) {
            Ok(receivers) => {
                tracing::debug!(kind, receivers, "Message published");
                receivers
            }
            Err(_) => {
                tracing::trace!(kind, "Message dropped, no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShopMessage> {
        self.tx.subscribe()
    }

    /// Publish a raw JSON message as received from another context
    pub fn publish_json(&self, raw: &str) -> Result<usize, serde_json::Error> {
        let msg: ShopMessage = serde_json::from_str(raw)?;
        Ok(self.publish(msg))
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
