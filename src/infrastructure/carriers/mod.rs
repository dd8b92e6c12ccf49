//! # Carrier Integrations
//!
//! Rate clients for shipping carriers and the registry that holds them.
//!
//! ## Available Components
//!
//! - [`CarrierRateClient`]: Trait every carrier integration implements
//! - [`CarrierRegistry`]: Lookup of clients by [`CarrierId`]
//! - [`InMemoryCarrierRegistry`]: Registry backed by a map
//! - [`UpsClient`]: UPS Rating API ("Shop")
//! - [`UspsClient`]: USPS domestic prices API
//! - [`HttpClient`]: Shared reqwest wrapper with status mapping

pub mod error;
pub mod http_client;
pub mod registry;
pub mod traits;
pub mod ups;
pub mod usps;

pub use error::{CarrierFault, CarrierResult};
pub use http_client::HttpClient;
pub use registry::InMemoryCarrierRegistry;
pub use traits::{CarrierRateClient, CarrierRegistry, RawAmount, RawRate};
pub use ups::{UpsClient, UpsConfig};
pub use usps::{UspsClient, UspsConfig};

use crate::config::CarriersConfig;
use crate::domain::value_objects::CarrierId;
use std::sync::Arc;

/// Builds a registry holding a client for every configured carrier.
///
/// Carriers without a configuration section are left unregistered.
///
/// # Errors
///
/// Returns the fault of the first client that cannot be constructed.
pub fn build_registry(config: &CarriersConfig) -> CarrierResult<InMemoryCarrierRegistry> {
    let mut clients: Vec<Arc<dyn CarrierRateClient>> = Vec::new();
    if let Some(ups) = &config.ups {
        clients.push(Arc::new(UpsClient::new(ups.clone())?));
    }
    if let Some(usps) = &config.usps {
        clients.push(Arc::new(UspsClient::new(usps.clone())?));
    }

    let ids: Vec<&CarrierId> = clients.iter().map(|client| client.carrier_id()).collect();
    tracing::debug!(carriers = ?ids, "building carrier registry");

    Ok(InMemoryCarrierRegistry::with_clients(clients))
}
