//! Chat channel transport
//!
//! JSON frames over WebSocket: the frame codec, the per-connection session
//! that owns a conversation's state, and the warp server hosting both.

pub mod frames;
pub mod session;
pub mod websocket;

pub use frames::{parse_inbound, InboundFrame, OutboundFrame};
pub use session::ChatSession;
pub use websocket::{chat_route, routes, ChannelServer};
