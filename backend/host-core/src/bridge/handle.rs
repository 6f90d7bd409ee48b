//! Handle to a running bridge server.

use std::net::SocketAddr;

use log::info;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Returned by [`start_bridge_server`](crate::bridge::start_bridge_server).
///
/// Dropping the handle leaves the server running; call
/// [`shutdown`](Self::shutdown) to stop accepting and close every connection.
#[derive(Debug)]
pub struct BridgeServerHandle {
    pub(crate) local_addr: SocketAddr,
    pub(crate) auth_token: String,
    pub(crate) shutdown: watch::Sender<bool>,
    pub(crate) task: JoinHandle<()>,
}

impl BridgeServerHandle {
    /// Address the listener is bound to; useful when started on port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Token clients must present in their first frame.
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// Stops the listener and signals open connections to close.
    pub async fn shutdown(self) {
        // Nobody listening just means every connection is already gone.
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            info!("Bridge listener task ended abnormally: {e}");
        }
        info!("Bridge server on {} stopped", self.local_addr);
    }
}
