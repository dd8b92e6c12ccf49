//! # UPS Rate Client
//!
//! [`CarrierRateClient`] for the UPS Rating API in "Shop" mode, which
//! returns one rated shipment per available service.
//!
//! # Examples
//!
//! ```ignore
//! use shipping_rates::infrastructure::carriers::ups::{UpsClient, UpsConfig};
//!
//! let client = UpsClient::new(UpsConfig::new("https://onlinetools.ups.com", token))?;
//! let rates = client.fetch_rates(&origin, &destination, &package).await?;
//! ```

use crate::domain::entities::DeliveryEstimate;
use crate::domain::value_objects::{CarrierId, Location, Package, UnitSystem};
use crate::infrastructure::carriers::error::{CarrierFault, CarrierResult};
use crate::infrastructure::carriers::http_client::HttpClient;
use crate::infrastructure::carriers::traits::{CarrierRateClient, RawAmount, RawRate};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default UPS API host.
pub const DEFAULT_UPS_BASE_URL: &str = "https://onlinetools.ups.com";

/// Default request timeout in milliseconds.
pub const DEFAULT_UPS_TIMEOUT_MS: u64 = 10_000;

const RATING_PATH: &str = "/api/rating/v2409/Shop";
const CUSTOMER_SUPPLIED_PACKAGE: &str = "02";

/// Connection settings for the UPS Rating API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsConfig {
    /// API host, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// OAuth bearer token.
    pub access_token: String,
    /// Shipper account number, enables negotiated rates.
    #[serde(default)]
    pub account_number: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl UpsConfig {
    /// Creates a configuration with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            account_number: None,
            timeout_ms: DEFAULT_UPS_TIMEOUT_MS,
        }
    }

    /// Sets the shipper account number.
    #[must_use]
    pub fn with_account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl fmt::Debug for UpsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpsConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("account_number", &self.account_number)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_UPS_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_UPS_TIMEOUT_MS
}

/// Returns the display name of a UPS service code.
#[must_use]
pub fn service_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "01" => "UPS Next Day Air",
        "02" => "UPS 2nd Day Air",
        "03" => "UPS Ground",
        "07" => "UPS Worldwide Express",
        "08" => "UPS Worldwide Expedited",
        "11" => "UPS Standard",
        "12" => "UPS 3 Day Select",
        "13" => "UPS Next Day Air Saver",
        "14" => "UPS Next Day Air Early",
        "54" => "UPS Worldwide Express Plus",
        "59" => "UPS 2nd Day Air A.M.",
        "65" => "UPS Worldwide Saver",
        _ => return None,
    };
    Some(name)
}

/// UPS rate client.
#[derive(Debug, Clone)]
pub struct UpsClient {
    carrier_id: CarrierId,
    config: UpsConfig,
    http: HttpClient,
}

impl UpsClient {
    /// Creates a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `CarrierFault::InternalError` if the HTTP client cannot be
    /// built.
    pub fn new(config: UpsConfig) -> CarrierResult<Self> {
        let http = HttpClient::new(config.timeout_ms)?;
        Ok(Self {
            carrier_id: CarrierId::ups(),
            config,
            http,
        })
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &UpsConfig {
        &self.config
    }

    fn rating_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), RATING_PATH)
    }

    fn headers(&self) -> CarrierResult<HeaderMap> {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.access_token))
            .map_err(|_| CarrierFault::authentication("access token is not a valid header"))?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("transactionsrc", HeaderValue::from_static("shipping-rates"));
        Ok(headers)
    }

    fn build_request(
        &self,
        origin: &Location,
        destination: &Location,
        package: &Package,
    ) -> ShopEnvelope {
        let (weight_code, length_code) = match package.units() {
            UnitSystem::Imperial => ("LBS", "IN"),
            UnitSystem::Metric => ("KGS", "CM"),
        };
        let dimensions = package.dimensions();

        ShopEnvelope {
            rate_request: ShopRequest {
                request: RequestHeader {
                    request_option: "Shop",
                },
                shipment: Shipment {
                    shipper: Party {
                        shipper_number: self.config.account_number.clone(),
                        address: Address::from(origin),
                    },
                    ship_from: Party {
                        shipper_number: None,
                        address: Address::from(origin),
                    },
                    ship_to: Party {
                        shipper_number: None,
                        address: Address::from(destination),
                    },
                    package: PackageSpec {
                        packaging_type: Code {
                            code: CUSTOMER_SUPPLIED_PACKAGE.to_string(),
                        },
                        dimensions: DimensionSpec {
                            unit_of_measurement: Code {
                                code: length_code.to_string(),
                            },
                            length: dimensions.length().to_string(),
                            width: dimensions.width().to_string(),
                            height: dimensions.height().to_string(),
                        },
                        package_weight: WeightSpec {
                            unit_of_measurement: Code {
                                code: weight_code.to_string(),
                            },
                            weight: package.weight().to_string(),
                        },
                    },
                },
            },
        }
    }
}

#[async_trait]
impl CarrierRateClient for UpsClient {
    fn carrier_id(&self) -> &CarrierId {
        &self.carrier_id
    }

    async fn fetch_rates(
        &self,
        origin: &Location,
        destination: &Location,
        package: &Package,
    ) -> CarrierResult<Vec<RawRate>> {
        let body = self.build_request(origin, destination, package);
        let response: ShopResponseEnvelope = self
            .http
            .post_with_headers(&self.rating_url(), &body, self.headers()?)
            .await
            .map_err(refine_rejection)?;

        response
            .rate_response
            .rated_shipment
            .into_vec()
            .into_iter()
            .map(RatedShipment::into_raw_rate)
            .collect()
    }
}

/// Rewrites a raw-body rejection into the UPS error code and message.
fn refine_rejection(fault: CarrierFault) -> CarrierFault {
    let CarrierFault::Rejected {
        message,
        error_code: None,
    } = &fault
    else {
        return fault;
    };
    let Ok(body) = serde_json::from_str::<ErrorEnvelope>(message) else {
        return fault;
    };
    match body.response.errors.into_iter().next() {
        Some(error) => CarrierFault::rejected_with_code(error.message, error.code),
        None => fault,
    }
}

// Request DTOs

#[derive(Debug, Serialize)]
struct ShopEnvelope {
    #[serde(rename = "RateRequest")]
    rate_request: ShopRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ShopRequest {
    request: RequestHeader,
    shipment: Shipment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RequestHeader {
    request_option: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Shipment {
    shipper: Party,
    ship_from: Party,
    ship_to: Party,
    package: PackageSpec,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Party {
    #[serde(skip_serializing_if = "Option::is_none")]
    shipper_number: Option<String>,
    address: Address,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Address {
    city: String,
    state_province_code: String,
    postal_code: String,
    country_code: String,
}

impl From<&Location> for Address {
    fn from(location: &Location) -> Self {
        let owned = |value: Option<&str>| value.unwrap_or_default().trim().to_string();
        Self {
            city: owned(location.city()),
            state_province_code: owned(location.state()),
            postal_code: owned(location.postal_code()),
            country_code: owned(location.country()).to_uppercase(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Code {
    code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PackageSpec {
    packaging_type: Code,
    dimensions: DimensionSpec,
    package_weight: WeightSpec,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DimensionSpec {
    unit_of_measurement: Code,
    length: String,
    width: String,
    height: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct WeightSpec {
    unit_of_measurement: Code,
    weight: String,
}

// Response DTOs

#[derive(Debug, Deserialize)]
struct ShopResponseEnvelope {
    #[serde(rename = "RateResponse")]
    rate_response: ShopResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShopResponse {
    rated_shipment: OneOrMany<RatedShipment>,
}

/// UPS returns a bare object instead of a one-element array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RatedShipment {
    service: Code,
    total_charges: Charges,
    #[serde(default)]
    guaranteed_delivery: Option<GuaranteedDelivery>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Charges {
    #[serde(default)]
    currency_code: Option<String>,
    monetary_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GuaranteedDelivery {
    #[serde(default)]
    business_days_in_transit: Option<String>,
}

impl RatedShipment {
    fn into_raw_rate(self) -> CarrierResult<RawRate> {
        let code = self.service.code;
        let name = service_name(&code)
            .map_or_else(|| format!("UPS Service {code}"), str::to_string);

        let delivery = match self
            .guaranteed_delivery
            .and_then(|g| g.business_days_in_transit)
        {
            Some(days) => Some(DeliveryEstimate::BusinessDays(days.trim().parse().map_err(
                |_| CarrierFault::malformed(format!("invalid BusinessDaysInTransit '{days}'")),
            )?)),
            None => None,
        };

        let mut rate = RawRate::new(name, RawAmount::Text(self.total_charges.monetary_value))
            .with_service_code(code);
        if let Some(currency) = self.total_charges.currency_code {
            rate = rate.with_currency(currency);
        }
        rate.delivery = delivery;
        Ok(rate)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    response: ErrorResponse,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}
