//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between a
//! dashboard client and the server.

use serde::{Deserialize, Serialize};

use crate::api::dto::SelectionParams;
use crate::dashboard::DashboardView;

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A widget changed; re-render with these values
    Select(SelectionParams),
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
    /// Fresh view-model for the latest selection
    Rendered {
        view: Box<DashboardView>,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}
