//! # Rate Shopping Service
//!
//! Validates a [`RateRequest`], asks one or more carriers for rates and
//! returns every quote ordered by price.
//!
//! Multi-carrier lookups run concurrently and the result is all-or-nothing:
//! if any carrier fails, the quotes already received are discarded.

use crate::application::error::{CarrierError, RateError, RateResult};
use crate::application::services::normalization::{
    ensure_single_currency, normalize, sort_by_price,
};
use crate::domain::entities::{RateQuote, RateRequest, ValidShipment};
use crate::domain::value_objects::CarrierId;
use crate::infrastructure::carriers::traits::CarrierRegistry;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Service that collects rate quotes from registered carriers.
#[derive(Debug, Clone)]
pub struct RateShoppingService {
    registry: Arc<dyn CarrierRegistry>,
}

impl RateShoppingService {
    /// Creates a service backed by a carrier registry.
    #[must_use]
    pub fn new(registry: Arc<dyn CarrierRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the carrier registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<dyn CarrierRegistry> {
        &self.registry
    }

    /// Returns every quote one carrier offers for the request, cheapest first.
    ///
    /// # Errors
    ///
    /// - `RateError::Validation` - The request is invalid; no carrier is called
    /// - `RateError::Carrier` - The carrier is unregistered or its lookup failed
    /// - `RateError::CurrencyMismatch` - The carrier quoted in several currencies
    pub async fn rates_from(
        &self,
        request: &RateRequest,
        carrier: &CarrierId,
    ) -> RateResult<Vec<RateQuote>> {
        let shipment = validated(request)?;
        let mut quotes = self.fetch(&shipment, carrier).await?;

        ensure_single_currency(&quotes)?;
        sort_by_price(&mut quotes);
        Ok(quotes)
    }

    /// Returns the quotes of every listed carrier merged and ordered by price.
    ///
    /// Duplicate carriers are queried once. Equal prices keep carrier order,
    /// then the order each carrier reported them in.
    ///
    /// # Errors
    ///
    /// - `RateError::Validation` - The request is invalid; no carrier is called
    /// - `RateError::NoCarriers` - `carriers` is empty
    /// - `RateError::Carrier` - A carrier failed; the first failure in
    ///   `carriers` order is reported
    /// - `RateError::CurrencyMismatch` - Carriers quoted in different currencies
    pub async fn rates_from_all(
        &self,
        request: &RateRequest,
        carriers: &[CarrierId],
    ) -> RateResult<Vec<RateQuote>> {
        let shipment = validated(request)?;
        self.collect(&shipment, carriers).await
    }

    /// Returns the quotes of every registered carrier ordered by price.
    ///
    /// # Errors
    ///
    /// Same as [`rates_from_all`](Self::rates_from_all); an empty registry
    /// yields `RateError::NoCarriers`.
    pub async fn rates_from_registered(&self, request: &RateRequest) -> RateResult<Vec<RateQuote>> {
        let shipment = validated(request)?;
        let carriers = self.registry.carrier_ids().await;
        self.collect(&shipment, &carriers).await
    }

    async fn collect(
        &self,
        shipment: &ValidShipment<'_>,
        carriers: &[CarrierId],
    ) -> RateResult<Vec<RateQuote>> {
        let carriers = dedup(carriers);
        if carriers.is_empty() {
            return Err(RateError::NoCarriers);
        }

        let lookups = carriers.iter().map(|carrier| self.fetch(shipment, carrier));
        let results = join_all(lookups).await;

        let mut quotes = Vec::new();
        for result in results {
            quotes.extend(result?);
        }

        ensure_single_currency(&quotes)?;
        sort_by_price(&mut quotes);

        info!(
            carriers = carriers.len(),
            quotes = quotes.len(),
            cheapest = ?quotes.first().map(|q| q.price().to_string()),
            "collected rate quotes"
        );
        Ok(quotes)
    }

    async fn fetch(
        &self,
        shipment: &ValidShipment<'_>,
        carrier: &CarrierId,
    ) -> Result<Vec<RateQuote>, CarrierError> {
        let Some(client) = self.registry.get_carrier(carrier).await else {
            warn!(carrier = %carrier, "carrier not registered");
            return Err(CarrierError::not_registered(carrier.clone()));
        };

        debug!(carrier = %carrier, "requesting rates");
        let raw = client
            .fetch_rates(shipment.origin, shipment.destination, shipment.package)
            .await
            .map_err(|fault| {
                warn!(carrier = %carrier, error = %fault, "carrier lookup failed");
                CarrierError::new(carrier.clone(), fault)
            })?;

        let quotes = normalize(carrier, raw).inspect_err(|e| {
            warn!(carrier = %carrier, error = %e.fault(), "carrier response rejected");
        })?;
        debug!(carrier = %carrier, quotes = quotes.len(), "received rates");
        Ok(quotes)
    }
}

fn validated(request: &RateRequest) -> Result<ValidShipment<'_>, RateError> {
    request.ensure_valid().map_err(|e| {
        debug!(issues = %e.report(), "rate request failed validation");
        RateError::from(e)
    })
}

/// Removes repeated carriers, keeping the first occurrence.
fn dedup(carriers: &[CarrierId]) -> Vec<CarrierId> {
    let mut unique: Vec<CarrierId> = Vec::with_capacity(carriers.len());
    for carrier in carriers {
        if !unique.contains(carrier) {
            unique.push(carrier.clone());
        }
    }
    unique
}
