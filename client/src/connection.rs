use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use skirmish_protocol::{ClientMessage, ServerMessage, parse_server_message};

use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::config::ReconnectPolicy;

/// Websocket to the battle server.
///
/// Reconnecting is only attempted while connecting: a lost connection ends
/// the game session, so `recv` reports it instead of retrying.
pub struct Connection {
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: String,
}

impl Connection {
    pub async fn connect(url: &str, policy: &ReconnectPolicy) -> Result<Self> {
        let mut delay = policy.initial_delay;
        let mut attempt = 1;

        loop {
            match Self::establish_connection(url).await {
                Ok(ws_stream) => {
                    return Ok(Self {
                        ws_stream,
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    if let Some(max) = policy.max_attempts
                        && attempt >= max
                    {
                        return Err(e).with_context(|| {
                            format!("Failed to connect to {} after {} attempts", url, attempt)
                        });
                    }

                    tracing::warn!(
                        attempt = attempt,
                        max_attempts = ?policy.max_attempts,
                        error = %e,
                        "Connection attempt failed"
                    );
                    tokio::time::sleep(delay).await;
                    delay = policy.next_delay(delay);
                    attempt += 1;
                }
            }
        }
    }

    async fn establish_connection(
        url: &str,
    ) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>> {
        let (ws_stream, _) = connect_async(url)
            .await
            .with_context(|| "WebSocket handshake failed")?;
        Ok(ws_stream)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Next message from the server, or `None` once the server closed the connection
    pub async fn recv(&mut self) -> Option<Result<ServerMessage>> {
        loop {
            match self.ws_stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Some(
                        parse_server_message(&text).context("Failed to parse server message"),
                    );
                }
                Some(Ok(Message::Ping(data))) => {
                    if let Err(e) = self.ws_stream.send(Message::Pong(data)).await {
                        return Some(Err(e).context("Failed to send pong"));
                    }
                }
                Some(Ok(Message::Close(_))) | None => return None,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    tracing::error!(url = %self.url, error = %e, "WebSocket error");
                    return Some(Err(e).context("WebSocket error"));
                }
            }
        }
    }

    pub async fn send(&mut self, message: &ClientMessage) -> Result<()> {
        self.ws_stream
            .send(Message::Text(message.to_wire_format()))
            .await
            .context("Failed to send message")?;
        Ok(())
    }

    pub async fn close(&mut self) -> Result<()> {
        self.ws_stream
            .close(None)
            .await
            .context("Failed to close connection")
    }
}
