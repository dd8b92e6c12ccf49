//! # Rate Normalization
//!
//! Converts raw carrier rates into [`RateQuote`]s and orders them by price.
//!
//! Ordering is by the numeric value of the price only. Ties keep the order
//! in which the carriers reported them.

use crate::application::error::{CarrierError, RateError, RateResult};
use crate::domain::entities::RateQuote;
use crate::domain::value_objects::{CarrierId, Price};
use crate::infrastructure::carriers::error::CarrierFault;
use crate::infrastructure::carriers::traits::{RawAmount, RawRate};

/// Converts every raw rate reported by a carrier into a quote.
///
/// # Errors
///
/// Returns a [`CarrierError`] with `CarrierFault::MalformedResponse` if any
/// entry has an unparsable or negative amount, a blank service name or an
/// invalid currency. One bad entry fails the whole response.
pub fn normalize(carrier: &CarrierId, raw: Vec<RawRate>) -> Result<Vec<RateQuote>, CarrierError> {
    raw.into_iter()
        .map(|rate| to_quote(carrier, rate))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|fault| CarrierError::new(carrier.clone(), fault))
}

fn to_quote(carrier: &CarrierId, rate: RawRate) -> Result<RateQuote, CarrierFault> {
    let price = to_price(&rate.total_price)?;

    let mut builder = RateQuote::builder(carrier.clone(), rate.service_name, price)
        .maybe_delivery(rate.delivery);
    if let Some(code) = rate.service_code {
        builder = builder.service_code(code);
    }
    if let Some(currency) = rate.currency {
        builder = builder.currency(currency);
    }
    builder
        .build()
        .map_err(|e| CarrierFault::malformed(e.to_string()))
}

fn to_price(amount: &RawAmount) -> Result<Price, CarrierFault> {
    let price = match amount {
        RawAmount::Decimal(value) => Price::from_decimal(*value),
        RawAmount::MinorUnits(value) => Price::from_minor_units(*value),
        RawAmount::Text(text) => text.trim().trim_start_matches('$').parse(),
    };
    price.map_err(|e| CarrierFault::malformed(format!("amount {amount}: {e}")))
}

/// Sorts quotes by ascending price. Equal prices keep their relative order.
pub fn sort_by_price(quotes: &mut [RateQuote]) {
    quotes.sort_by_key(RateQuote::price);
}

/// Checks that all quotes share one currency.
///
/// # Errors
///
/// Returns `RateError::CurrencyMismatch` naming the first quote whose
/// currency differs from the first quote's.
pub fn ensure_single_currency(quotes: &[RateQuote]) -> RateResult<()> {
    let Some(first) = quotes.first() else {
        return Ok(());
    };
    match quotes.iter().find(|q| q.currency() != first.currency()) {
        Some(other) => Err(RateError::CurrencyMismatch {
            expected: first.currency().to_string(),
            found: other.currency().to_string(),
            carrier: other.carrier().clone(),
        }),
        None => Ok(()),
    }
}
