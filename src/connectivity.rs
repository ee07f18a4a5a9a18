//! Online/offline detection.
//!
//! The gateway only asks "are we online right now?". Platform listeners
//! (browser connectivity events, native network-status callbacks) feed a
//! [`ConnectivityMonitor`]; anything else can implement [`Connectivity`].

use tokio::sync::watch;

/// Predicate consulted before every remote call.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Assumes the network is always reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Observable connectivity state.
///
/// The host pushes status changes with [`set_online`](Self::set_online);
/// UI code can [`subscribe`](Self::subscribe) to react to them.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx }
    }

    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                tracing::info!(online, "connectivity changed");
                *current = online;
                true
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }
}
