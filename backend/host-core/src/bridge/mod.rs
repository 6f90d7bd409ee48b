//! Message Bridge between isolated surfaces and the host.
//!
//! - [`envelope`] classifies what a surface posts
//! - [`hub`] routes frames to the current mount of each surface
//! - [`server`] carries frames over a localhost WebSocket
//!
//! The bridge authenticates connections, not messages: the surface id in a
//! frame is routing information only. What an action is allowed to do is
//! decided by the router.

pub(crate) mod connection_state;
pub mod envelope;
pub mod frame;
mod handle;
pub mod hub;
mod server;

pub use envelope::{BridgeMessage, decode, encode_action};
pub use frame::{AuthHandshake, InboundFrame, OutboundFrame};
pub use handle::BridgeServerHandle;
pub use hub::{BridgeHub, RouteResult, Subscription};
pub use server::{MountFeed, start_bridge_server};
