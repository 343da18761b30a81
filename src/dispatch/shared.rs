//! Atomically swappable dispatcher for hot reload.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::mpsc;

use crate::config::{ConfigError, ConfigUpdate, DispatchConfig};
use crate::dispatch::Dispatcher;
use crate::handlers::HandlerRegistry;

/// A dispatcher handle shared by every request path.
///
/// Requests load the current dispatcher once and keep it for their whole
/// cycle, so a reload never changes routing halfway through a request.
#[derive(Clone)]
pub struct SharedDispatcher {
    current: Arc<ArcSwap<Dispatcher>>,
}

impl SharedDispatcher {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(dispatcher)),
        }
    }

    /// The dispatcher in effect right now.
    pub fn load(&self) -> Arc<Dispatcher> {
        self.current.load_full()
    }

    pub fn store(&self, dispatcher: Dispatcher) {
        self.current.store(Arc::new(dispatcher));
    }

    /// Build a dispatcher from `config` and swap it in. On error the current
    /// dispatcher stays.
    pub fn reload(
        &self,
        config: &DispatchConfig,
        registry: &HandlerRegistry,
    ) -> Result<(), ConfigError> {
        let dispatcher = Dispatcher::from_config(config, registry)?;
        let routes = dispatcher.router().routes().len();
        self.store(dispatcher);
        tracing::info!(routes, "Dispatcher reloaded");
        Ok(())
    }

    /// Apply every reload received on `updates` until the channel closes.
    /// Failed loads and configs that fail to build leave the current
    /// dispatcher in place.
    pub async fn follow(
        self,
        mut updates: mpsc::UnboundedReceiver<ConfigUpdate>,
        registry: Arc<HandlerRegistry>,
    ) {
        while let Some(update) = updates.recv().await {
            let applied = update.and_then(|config| self.reload(&config, &registry));
            if let Err(e) = applied {
                tracing::error!(error = %e, "Failed to apply config, keeping current dispatcher");
            }
        }
        tracing::debug!("Config update channel closed");
    }
}

impl std::fmt::Debug for SharedDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedDispatcher").field(&self.load()).finish()
    }
}
