//! Routing of inbound frames to the owner of each surface.
//!
//! A surface has at most one route, installed per mount through
//! [`BridgeHub::subscribe`]. The returned [`Subscription`] removes the route
//! when dropped, unless a newer mount has already replaced it.

use crate::bridge::frame::InboundFrame;

use common::{Generation, SurfaceId};

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use tokio::sync::mpsc;

#[derive(Debug)]
struct Route {
    generation: Generation,
    sender: mpsc::Sender<InboundFrame>,
}

type Routes = Arc<Mutex<BTreeMap<SurfaceId, Route>>>;

fn lock(routes: &Routes) -> MutexGuard<'_, BTreeMap<SurfaceId, Route>> {
    // A panic while holding the lock cannot leave the map half-updated.
    routes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteResult {
    Delivered,
    /// No mount currently owns the surface.
    NoRoute,
    /// The owner stopped receiving.
    Closed,
}

/// Cheap to clone; all clones share the route table.
#[derive(Debug, Clone, Default)]
pub struct BridgeHub {
    routes: Routes,
}

impl BridgeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the route for one mount of `surface`, replacing any other.
    pub fn subscribe(
        &self,
        surface: SurfaceId,
        generation: Generation,
        sender: mpsc::Sender<InboundFrame>,
    ) -> Subscription {
        lock(&self.routes).insert(
            surface.clone(),
            Route {
                generation,
                sender,
            },
        );
        debug!("Route installed for {surface} at {generation}");
        Subscription {
            routes: Arc::clone(&self.routes),
            surface,
            generation,
        }
    }

    /// Delivers `frame` to the current route of its surface.
    ///
    /// Frames to one surface are delivered in the order `route` is called.
    pub async fn route(&self, frame: InboundFrame) -> RouteResult {
        let sender = lock(&self.routes)
            .get(&frame.surface)
            .map(|route| route.sender.clone());

        let Some(sender) = sender else {
            debug!("Dropping frame for unrouted surface {}", frame.surface);
            return RouteResult::NoRoute;
        };

        match sender.send(frame).await {
            Ok(()) => RouteResult::Delivered,
            Err(_) => RouteResult::Closed,
        }
    }

    /// Generation of the mount currently routed for `surface`.
    pub fn routed_generation(&self, surface: &SurfaceId) -> Option<Generation> {
        lock(&self.routes)
            .get(surface)
            .map(|route| route.generation)
    }
}

/// Keeps a route alive; dropping it releases the route.
#[derive(Debug)]
pub struct Subscription {
    routes: Routes,
    surface: SurfaceId,
    generation: Generation,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut routes = lock(&self.routes);
        let owned = routes
            .get(&self.surface)
            .is_some_and(|route| route.generation == self.generation);
        if owned {
            routes.remove(&self.surface);
            debug!(
                "Route released for {} at {}",
                self.surface, self.generation
            );
        }
    }
}
