//! # In-Memory Carrier Registry
//!
//! In-memory implementation of [`CarrierRegistry`].
//!
//! Uses a thread-safe `HashMap` keyed by [`CarrierId`]. Callers register
//! the clients they want to use explicitly; there is no global dispatch.

use crate::domain::value_objects::CarrierId;
use crate::infrastructure::carriers::traits::{CarrierRateClient, CarrierRegistry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`CarrierRegistry`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCarrierRegistry {
    clients: Arc<RwLock<HashMap<CarrierId, Arc<dyn CarrierRateClient>>>>,
}

impl InMemoryCarrierRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the given clients.
    ///
    /// A later client replaces an earlier one with the same carrier id.
    #[must_use]
    pub fn with_clients(clients: impl IntoIterator<Item = Arc<dyn CarrierRateClient>>) -> Self {
        let map = clients
            .into_iter()
            .map(|client| (client.carrier_id().clone(), client))
            .collect();
        Self {
            clients: Arc::new(RwLock::new(map)),
        }
    }

    /// Registers a client under its own carrier id.
    ///
    /// Returns the client previously registered under that id, if any.
    pub async fn register(
        &self,
        client: Arc<dyn CarrierRateClient>,
    ) -> Option<Arc<dyn CarrierRateClient>> {
        let mut clients = self.clients.write().await;
        clients.insert(client.carrier_id().clone(), client)
    }

    /// Removes a client. Returns true if one was registered.
    pub async fn deregister(&self, carrier_id: &CarrierId) -> bool {
        let mut clients = self.clients.write().await;
        clients.remove(carrier_id).is_some()
    }

    /// Returns the number of registered clients.
    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Returns true if no client is registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CarrierRegistry for InMemoryCarrierRegistry {
    async fn get_carrier(&self, carrier_id: &CarrierId) -> Option<Arc<dyn CarrierRateClient>> {
        let clients = self.clients.read().await;
        clients.get(carrier_id).cloned()
    }

    async fn carrier_ids(&self) -> Vec<CarrierId> {
        let clients = self.clients.read().await;
        let mut ids: Vec<CarrierId> = clients.keys().cloned().collect();
        ids.sort();
        ids
    }
}
