//! WebSocket Live Rendering
//!
//! Re-renders the dashboard whenever a client reports a widget change.
//!
//! ## Protocol
//!
//! - server → `connected`, then `rendered` with the default selection
//! - client → `select` with any of `state`, `types`, `start`, `end`
//! - server → `rendered` with the new view, or `error`
//! - client → `ping`, server → `pong`
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8501/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'select', state: 'CA', types: 'Condo'}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'rendered') draw(msg.view);
//! };
//! ```

mod handler;
mod messages;

pub use handler::websocket_handler;
pub use messages::{ClientMessage, ServerMessage};
