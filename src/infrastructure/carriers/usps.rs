//! # USPS Rate Client
//!
//! [`CarrierRateClient`] for the USPS domestic prices API. Quotes are
//! requested in pounds and inches; metric packages are converted first.

use crate::domain::value_objects::{CarrierId, Location, Package};
use crate::infrastructure::carriers::error::{CarrierFault, CarrierResult};
use crate::infrastructure::carriers::http_client::HttpClient;
use crate::infrastructure::carriers::traits::{CarrierRateClient, RawAmount, RawRate};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default USPS API host.
pub const DEFAULT_USPS_BASE_URL: &str = "https://apis.usps.com";

/// Default request timeout in milliseconds.
pub const DEFAULT_USPS_TIMEOUT_MS: u64 = 10_000;

const TOTAL_RATES_PATH: &str = "/prices/v3/total-rates/search";
const DOMESTIC_COUNTRY: &str = "US";
const ZIP5_LEN: usize = 5;

/// Connection settings for the USPS prices API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UspsConfig {
    /// API host, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// OAuth bearer token.
    pub access_token: String,
    /// Price type, `RETAIL` or `COMMERCIAL`.
    #[serde(default = "default_price_type")]
    pub price_type: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl UspsConfig {
    /// Creates a retail-price configuration with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            price_type: default_price_type(),
            timeout_ms: DEFAULT_USPS_TIMEOUT_MS,
        }
    }

    /// Sets the price type.
    #[must_use]
    pub fn with_price_type(mut self, price_type: impl Into<String>) -> Self {
        self.price_type = price_type.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl fmt::Debug for UspsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UspsConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("price_type", &self.price_type)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_USPS_BASE_URL.to_string()
}

fn default_price_type() -> String {
    "RETAIL".to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_USPS_TIMEOUT_MS
}

/// USPS rate client.
#[derive(Debug, Clone)]
pub struct UspsClient {
    carrier_id: CarrierId,
    config: UspsConfig,
    http: HttpClient,
}

impl UspsClient {
    /// Creates a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `CarrierFault::InternalError` if the HTTP client cannot be
    /// built.
    pub fn new(config: UspsConfig) -> CarrierResult<Self> {
        let http = HttpClient::new(config.timeout_ms)?;
        Ok(Self {
            carrier_id: CarrierId::usps(),
            config,
            http,
        })
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &UspsConfig {
        &self.config
    }

    fn headers(&self) -> CarrierResult<HeaderMap> {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.access_token))
            .map_err(|_| CarrierFault::authentication("access token is not a valid header"))?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    fn build_request(
        &self,
        origin: &Location,
        destination: &Location,
        package: &Package,
    ) -> CarrierResult<TotalRatesQuery> {
        let package = package.to_imperial();
        let dimensions = package.dimensions();
        Ok(TotalRatesQuery {
            origin_zip_code: domestic_zip(origin, "origin")?,
            destination_zip_code: domestic_zip(destination, "destination")?,
            weight: package.weight(),
            length: dimensions.length(),
            width: dimensions.width(),
            height: dimensions.height(),
            price_type: self.config.price_type.clone(),
        })
    }
}

#[async_trait]
impl CarrierRateClient for UspsClient {
    fn carrier_id(&self) -> &CarrierId {
        &self.carrier_id
    }

    async fn fetch_rates(
        &self,
        origin: &Location,
        destination: &Location,
        package: &Package,
    ) -> CarrierResult<Vec<RawRate>> {
        let query = self.build_request(origin, destination, package)?;
        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            TOTAL_RATES_PATH
        );
        let response: TotalRatesResponse = self
            .http
            .post_with_headers(&url, &query, self.headers()?)
            .await
            .map_err(refine_rejection)?;

        response
            .rate_options
            .into_iter()
            .map(RateOption::into_raw_rate)
            .collect()
    }
}

/// Domestic only: both ends must be US addresses with a ZIP code.
fn domestic_zip(location: &Location, role: &str) -> CarrierResult<String> {
    if !location.is_in_country(DOMESTIC_COUNTRY) {
        return Err(CarrierFault::invalid_request(format!(
            "USPS domestic rates require a US {role}"
        )));
    }
    let digits: String = location
        .postal_code()
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .take(ZIP5_LEN)
        .collect();
    if digits.len() == ZIP5_LEN {
        Ok(digits)
    } else {
        Err(CarrierFault::invalid_request(format!(
            "{role} postal code is not a US ZIP code"
        )))
    }
}

fn refine_rejection(fault: CarrierFault) -> CarrierFault {
    let CarrierFault::Rejected {
        message,
        error_code: None,
    } = &fault
    else {
        return fault;
    };
    match serde_json::from_str::<ErrorEnvelope>(message) {
        Ok(ErrorEnvelope { error }) => match error.code {
            Some(code) => CarrierFault::rejected_with_code(error.message, code),
            None => CarrierFault::rejected(error.message),
        },
        Err(_) => fault,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalRatesQuery {
    #[serde(rename = "originZIPCode")]
    origin_zip_code: String,
    #[serde(rename = "destinationZIPCode")]
    destination_zip_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    weight: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    length: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    width: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    height: Decimal,
    price_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalRatesResponse {
    rate_options: Vec<RateOption>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateOption {
    #[serde(with = "rust_decimal::serde::float")]
    total_base_price: Decimal,
    #[serde(default)]
    rates: Vec<RateDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateDetail {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    mail_class: Option<String>,
}

impl RateOption {
    fn into_raw_rate(self) -> CarrierResult<RawRate> {
        let detail = self
            .rates
            .into_iter()
            .next()
            .ok_or_else(|| CarrierFault::malformed("rate option without rates"))?;
        let name = detail
            .description
            .or_else(|| detail.mail_class.clone())
            .ok_or_else(|| CarrierFault::malformed("rate without description or mail class"))?;

        let mut rate = RawRate::new(name, RawAmount::Decimal(self.total_base_price))
            .with_currency("USD");
        if let Some(mail_class) = detail.mail_class {
            rate = rate.with_service_code(mail_class);
        }
        Ok(rate)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::value_objects::UnitSystem;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn beverly_hills() -> Location {
        Location::new("US", "CA", "Beverly Hills", "90210")
    }

    fn seattle() -> Location {
        Location::new("US", "WA", "Seattle", "98101-1234")
    }

    fn parcel() -> Package {
        Package::new(12.0, [15.0, 10.0, 4.5], UnitSystem::Imperial).unwrap()
    }

    fn client_for(server: &MockServer) -> UspsClient {
        UspsClient::new(UspsConfig::new(server.uri(), "secret").with_timeout_ms(2000)).unwrap()
    }

    #[test]
    fn zip_plus_four_is_truncated() {
        assert_eq!(domestic_zip(&seattle(), "destination").unwrap(), "98101");
    }

    #[test]
    fn foreign_location_is_invalid_request() {
        let ottawa = Location::new("CA", "ON", "Ottawa", "K1A 0B1");
        let fault = domestic_zip(&ottawa, "destination").unwrap_err();
        assert!(matches!(fault, CarrierFault::InvalidRequest { .. }));
        assert!(fault.is_client_error());
    }

    #[test]
    fn short_zip_is_invalid_request() {
        let location = Location::new("US", "WA", "Seattle", "981");
        assert!(domestic_zip(&location, "origin").is_err());
    }

    #[test]
    fn metric_package_is_sent_in_pounds_and_inches() {
        let client = UspsClient::new(UspsConfig::new(DEFAULT_USPS_BASE_URL, "t")).unwrap();
        let metric = Package::new(1.0, [2.54, 2.54, 2.54], UnitSystem::Metric).unwrap();
        let query = client
            .build_request(&beverly_hills(), &seattle(), &metric)
            .unwrap();
        assert_eq!(query.length, Decimal::ONE);
        assert_eq!(query.weight.round_dp(2), Decimal::new(220, 2));
    }

    #[tokio::test]
    async fn total_rates_become_raw_rates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TOTAL_RATES_PATH))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({
                "originZIPCode": "90210",
                "destinationZIPCode": "98101",
                "weight": 12.0,
                "height": 4.5,
                "priceType": "RETAIL"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rateOptions": [
                    {"totalBasePrice": 9.35, "rates": [
                        {"description": "Priority Mail", "mailClass": "PRIORITY_MAIL"}
                    ]},
                    {"totalBasePrice": 7.5, "rates": [{"mailClass": "USPS_GROUND_ADVANTAGE"}]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rates = client_for(&server)
            .fetch_rates(&beverly_hills(), &seattle(), &parcel())
            .await
            .unwrap();

        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].service_name, "Priority Mail");
        assert_eq!(rates[0].service_code.as_deref(), Some("PRIORITY_MAIL"));
        assert_eq!(rates[0].currency.as_deref(), Some("USD"));
        assert!(matches!(rates[0].total_price, RawAmount::Decimal(_)));
        assert_eq!(rates[1].service_name, "USPS_GROUND_ADVANTAGE");
    }

    #[tokio::test]
    async fn foreign_destination_never_reaches_the_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let ottawa = Location::new("CA", "ON", "Ottawa", "K1A 0B1");
        let fault = client_for(&server)
            .fetch_rates(&beverly_hills(), &ottawa, &parcel())
            .await
            .unwrap_err();
        assert!(matches!(fault, CarrierFault::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn error_body_becomes_coded_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TOTAL_RATES_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": "400", "message": "OASValidation failed: weight"}
            })))
            .mount(&server)
            .await;

        let fault = client_for(&server)
            .fetch_rates(&beverly_hills(), &seattle(), &parcel())
            .await
            .unwrap_err();
        assert_eq!(fault.error_code(), Some("400"));
    }

    #[tokio::test]
    async fn option_without_rates_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TOTAL_RATES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rateOptions": [{"totalBasePrice": 9.35, "rates": []}]
            })))
            .mount(&server)
            .await;

        let fault = client_for(&server)
            .fetch_rates(&beverly_hills(), &seattle(), &parcel())
            .await
            .unwrap_err();
        assert!(matches!(fault, CarrierFault::MalformedResponse { .. }));
    }
}
