//! Minimal router: tracks the current URL and broadcasts navigation events.
//!
//! Observers hold a [`RouteSubscription`], a scoped handle over a broadcast
//! receiver. Dropping the handle releases the subscription exactly once,
//! however many events it has seen.

use rentals_types::Route;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

/// Capacity of the navigation event channel.
const EVENT_CAPACITY: usize = 64;

/// Navigation lifecycle events, in the order the router emits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterEvent {
    NavigationStart { id: u64, url: String },
    NavigationEnd { id: u64, url: String },
}

#[derive(Debug)]
pub struct Router {
    sender: broadcast::Sender<RouterEvent>,
    current_route: Route,
    next_navigation_id: u64,
}

impl Router {
    pub fn new(initial_route: Route) -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            sender,
            current_route: initial_route,
            next_navigation_id: 1,
        }
    }

    pub fn current_route(&self) -> Route {
        self.current_route
    }

    /// Navigates to `route`, emitting a start and an end event.
    ///
    /// Re-navigating to the current route still emits both events so late
    /// subscribers can learn the active URL.
    pub fn navigate(&mut self, route: Route) {
        let id = self.next_navigation_id;
        self.next_navigation_id += 1;
        let url = route.url();
        debug!(navigation_id = id, %url, "navigating");

        self.emit(RouterEvent::NavigationStart { id, url: url.clone() });
        self.current_route = route;
        self.emit(RouterEvent::NavigationEnd { id, url });
    }

    /// Opens a new subscription to navigation events emitted from now on.
    pub fn subscribe(&self) -> RouteSubscription {
        let subscription = RouteSubscription {
            receiver: self.sender.subscribe(),
        };
        debug!(subscribers = self.subscriber_count(), "route subscription acquired");
        subscription
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn emit(&self, event: RouterEvent) {
        // Sending only fails when nobody is subscribed.
        let _ = self.sender.send(event);
    }
}

/// Scoped handle to the router's navigation events.
#[derive(Debug)]
pub struct RouteSubscription {
    receiver: broadcast::Receiver<RouterEvent>,
}

impl RouteSubscription {
    /// Drains every event received since the last call without blocking.
    pub fn drain(&mut self) -> Vec<RouterEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "route subscription lagged; older navigation events dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        events
    }
}

impl Drop for RouteSubscription {
    fn drop(&mut self) {
        debug!("route subscription released");
    }
}
