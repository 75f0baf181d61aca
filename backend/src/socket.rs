//! Websocket transport
//!
//! Bridges one upgraded websocket to a registered [`Connection`]. Inbound
//! text frames are decoded as [`ClientMessage`] JSON and forwarded to the
//! game server; everything the server sends the player is encoded and
//! written back. Frames that fail to decode are answered with a `rejected`
//! message and never reach the server.
//!
//! The loop ends when either side closes. Dropping the connection at that
//! point tells the game server the player left.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use shared::{ClientMessage, ServerMessage};
use tracing::{debug, error, warn};

use crate::game::Connection;

/// Run the websocket until the client or the game server hangs up
pub async fn serve_socket(socket: WebSocket, mut connection: Connection) {
    let (mut sender, mut receiver) = socket.split();
    debug!("[SOCKET] Websocket open for {}", connection.player());

    loop {
        tokio::select! {
            outgoing = connection.recv() => {
                let Some(message) = outgoing else {
                    warn!("[SOCKET] Game server stopped, closing {}", connection.player());
                    break;
                };
                let Some(text) = encode(&message) else {
                    continue;
                };
                if sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        debug!("[SOCKET] Read error for {}: {}", connection.player(), e);
                        break;
                    }
                };

                match decode(text.as_str()) {
                    Ok(message) => {
                        if connection.send(message).is_err() {
                            break;
                        }
                    }
                    Err(rejection) => {
                        let Some(reply) = encode(&rejection) else {
                            continue;
                        };
                        if sender.send(Message::Text(reply.into())).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    debug!("[SOCKET] Websocket closed for {}", connection.player());
}

/// Decode a client frame, or build the rejection to send back
pub fn decode(text: &str) -> Result<ClientMessage, ServerMessage> {
    serde_json::from_str(text).map_err(|e| ServerMessage::Rejected {
        reason: format!("Invalid message: {}", e),
    })
}

fn encode(message: &ServerMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(text) => Some(text),
        Err(e) => {
            error!("[SOCKET] Failed to encode {:?}: {}", message, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_move() {
        let message = decode(r#"{"type":"move","from":"e2","to":"e4"}"#).unwrap();
        assert_eq!(
            message,
            ClientMessage::Move {
                from: "e2".parse().unwrap(),
                to: "e4".parse().unwrap(),
            }
        );
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let rejection = decode("{not json").unwrap_err();
        assert!(matches!(
            rejection,
            ServerMessage::Rejected { reason } if reason.starts_with("Invalid message")
        ));
    }

    #[test]
    fn test_decode_rejects_bad_square() {
        assert!(decode(r#"{"type":"move","from":"z9","to":"e4"}"#).is_err());
        assert!(decode(r#"{"type":"resign"}"#).is_err());
    }

    #[test]
    fn test_encode_uses_camel_case_tags() {
        let text = encode(&ServerMessage::OpponentLeft).unwrap();
        assert_eq!(text, r#"{"type":"opponentLeft"}"#);
    }
}
