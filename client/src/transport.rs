use anyhow::{Result, anyhow};
use skirmish_protocol::ClientMessage;
use tokio::sync::mpsc;

/// Outbound side of the connection, as seen from the bot thread
pub trait Transport: Send + Sync {
    fn send(&self, message: ClientMessage) -> Result<()>;
}

/// Cloneable sender feeding the connection task.
///
/// Sending never blocks, so it can be used from the bot thread as well as
/// from async code.
#[derive(Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<ClientMessage>,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::UnboundedSender<ClientMessage>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ClientMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, message: ClientMessage) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|_| anyhow!("Client disconnected"))
    }
}
