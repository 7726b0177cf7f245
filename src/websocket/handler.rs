//! WebSocket Handler
//!
//! Each connection gets the default render on connect and a fresh render
//! after every `select` message. Renders are independent: a newer one
//! simply replaces the previous view on the client.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

use super::messages::{ClientMessage, ServerMessage};
use crate::api::dto::SelectionParams;
use crate::api::routes::dashboard::render_selection;
use crate::api::routes::run_blocking;
use crate::api::AppState;
use crate::dashboard::Dashboard;

/// WebSocket upgrade handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let dashboard = Arc::clone(&state.dashboard);
    ws.on_upgrade(move |socket| handle_socket(socket, dashboard))
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, dashboard: Arc<Dashboard>) {
    let connection_id = uuid::Uuid::new_v4().to_string();
    let (mut sender, mut receiver) = socket.split();

    tracing::debug!(connection_id = %connection_id, "WebSocket connected");

    let connected = ServerMessage::Connected {
        connection_id: connection_id.clone(),
    };
    if send(&mut sender, &connected).await.is_err() {
        return;
    }

    let initial = render_message(&dashboard, SelectionParams::default()).await;
    if send(&mut sender, &initial).await.is_err() {
        return;
    }

    while let Some(result) = receiver.next().await {
        let message = match result {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(
                    connection_id = %connection_id,
                    error = %e,
                    "WebSocket receive error"
                );
                break;
            }
        };

        let reply = match message {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Select(params)) => render_message(&dashboard, params).await,
                Ok(ClientMessage::Ping) => ServerMessage::Pong,
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "Invalid client message"
                    );
                    ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    }
                }
            },
            Message::Binary(_) => ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            },
            // Axum answers pings itself
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => {
                tracing::debug!(connection_id = %connection_id, "Client requested close");
                break;
            }
        };

        if send(&mut sender, &reply).await.is_err() {
            tracing::debug!(
                connection_id = %connection_id,
                "WebSocket send failed, closing connection"
            );
            break;
        }
    }

    tracing::debug!(connection_id = %connection_id, "WebSocket disconnected");
}

/// Render a selection into a reply; failures become `error` messages
async fn render_message(dashboard: &Arc<Dashboard>, params: SelectionParams) -> ServerMessage {
    let dashboard = Arc::clone(dashboard);
    match run_blocking(move || render_selection(&dashboard, &params)).await {
        Ok(view) => ServerMessage::Rendered {
            view: Box::new(view),
        },
        Err(e) => ServerMessage::Error {
            message: e.to_string(),
        },
    }
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), ()> {
    let text = serde_json::to_string(message).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize message");
    })?;
    sender.send(Message::Text(text)).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::render::fixtures::write_fixture_files;

    #[tokio::test]
    async fn test_render_message_default() {
        let (_dir, data, cache) = write_fixture_files(false);
        let dashboard = Arc::new(Dashboard::new(data, cache));

        let reply = render_message(&dashboard, SelectionParams::default()).await;
        match reply {
            ServerMessage::Rendered { view } => assert_eq!(view.selection.state, "CA"),
            other => panic!("Expected Rendered, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_render_message_invalid_selection() {
        let (_dir, data, cache) = write_fixture_files(false);
        let dashboard = Arc::new(Dashboard::new(data, cache));

        let params = SelectionParams {
            state: Some("ZZ".to_string()),
            ..Default::default()
        };
        let reply = render_message(&dashboard, params).await;
        assert!(matches!(reply, ServerMessage::Error { ref message } if message.contains("ZZ")));
    }
}
