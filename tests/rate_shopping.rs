//! End-to-end rate shopping against mocked UPS and USPS endpoints.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::json;
use shipping_rates::application::{RateError, RateShoppingService};
use shipping_rates::config::CarriersConfig;
use shipping_rates::domain::entities::{FieldIssue, RateQuote, RateRequest};
use shipping_rates::domain::value_objects::{
    CarrierId, Location, Package, RequestField, UnitSystem,
};
use shipping_rates::infrastructure::carriers::{
    CarrierFault, UpsConfig, UspsConfig, build_registry,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UPS_PATH: &str = "/api/rating/v2409/Shop";
const USPS_PATH: &str = "/prices/v3/total-rates/search";

fn beverly_hills() -> Location {
    Location::new("US", "CA", "Beverly Hills", "90210")
}

fn seattle() -> Location {
    Location::new("US", "WA", "Seattle", "98101")
}

fn parcel() -> Package {
    Package::new(12.0, [15.0, 10.0, 4.5], UnitSystem::Imperial).unwrap()
}

fn scenario_request() -> RateRequest {
    RateRequest::new(beverly_hills(), seattle(), parcel())
}

fn fields(items: &[RequestField]) -> BTreeSet<RequestField> {
    items.iter().copied().collect()
}

fn assert_sorted(quotes: &[RateQuote]) {
    assert!(
        quotes.windows(2).all(|w| w[0].price() <= w[1].price()),
        "quotes not sorted by price: {quotes:?}"
    );
}

async fn mount_ups(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(UPS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "RateResponse": {"RatedShipment": [
                {"Service": {"Code": "01"},
                 "TotalCharges": {"CurrencyCode": "USD", "MonetaryValue": "58.75"},
                 "GuaranteedDelivery": {"BusinessDaysInTransit": "1"}},
                {"Service": {"Code": "03"},
                 "TotalCharges": {"CurrencyCode": "USD", "MonetaryValue": "14.20"},
                 "GuaranteedDelivery": {"BusinessDaysInTransit": "3"}},
                {"Service": {"Code": "02"},
                 "TotalCharges": {"CurrencyCode": "USD", "MonetaryValue": "29.90"}}
            ]}
        })))
        .mount(server)
        .await;
}

async fn mount_usps(server: &MockServer, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!({
            "rateOptions": [
                {"totalBasePrice": 9.35, "rates": [
                    {"description": "Priority Mail", "mailClass": "PRIORITY_MAIL"}]},
                {"totalBasePrice": 41.6, "rates": [
                    {"description": "Priority Mail Express", "mailClass": "PRIORITY_MAIL_EXPRESS"}]}
            ]
        }))
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("POST"))
        .and(path(USPS_PATH))
        .respond_with(template)
        .mount(server)
        .await;
}

fn service_for(server: &MockServer) -> RateShoppingService {
    let config = CarriersConfig {
        ups: Some(UpsConfig::new(server.uri(), "ups-token").with_timeout_ms(2000)),
        usps: Some(UspsConfig::new(server.uri(), "usps-token").with_timeout_ms(2000)),
    };
    RateShoppingService::new(Arc::new(build_registry(&config).unwrap()))
}

#[test]
fn complete_request_is_valid() {
    let report = scenario_request().validate();
    assert!(report.is_valid());
    assert!(report.errors().is_empty());
}

#[test]
fn destination_without_postal_code_is_reported() {
    let request = RateRequest::new(
        beverly_hills(),
        Location::builder()
            .country("US")
            .state("WA")
            .city("Seattle")
            .build(),
        parcel(),
    );
    let report = request.validate();
    assert_eq!(report.errors(), fields(&[RequestField::Destination]));
    assert_eq!(
        report.issue(RequestField::Destination),
        Some(&FieldIssue::IncompleteLocation {
            missing: vec!["postal_code"]
        })
    );
}

#[test]
fn string_package_from_json_is_reported() {
    let request = RateRequest::from_json(&json!({
        "origin": {"country": "US", "state": "CA", "city": "Beverly Hills", "postal_code": "90210"},
        "destination": {"country": "US", "state": "WA", "city": "Seattle", "zip": "98101"},
        "package": "package"
    }));
    assert_eq!(request.validate().errors(), fields(&[RequestField::Package]));
}

#[test]
fn empty_json_reports_every_field() {
    let report = RateRequest::from_json(&json!({})).validate();
    assert_eq!(report.errors(), fields(&RequestField::ALL));
}

#[tokio::test]
async fn ups_scenario_returns_sorted_quotes() {
    let server = MockServer::start().await;
    mount_ups(&server).await;

    let quotes = service_for(&server)
        .rates_from(&scenario_request(), &CarrierId::new("UPS"))
        .await
        .unwrap();

    assert!(!quotes.is_empty());
    assert_sorted(&quotes);
    assert_eq!(quotes[0].service(), "UPS Ground");
    assert_eq!(quotes[0].price().to_string(), "14.20");
}

#[tokio::test]
async fn all_carriers_merge_by_price() {
    let server = MockServer::start().await;
    mount_ups(&server).await;
    mount_usps(&server, 200).await;

    let quotes = service_for(&server)
        .rates_from_all(&scenario_request(), &[CarrierId::ups(), CarrierId::usps()])
        .await
        .unwrap();

    assert_eq!(quotes.len(), 5);
    assert_sorted(&quotes);
    assert_eq!(quotes[0].carrier(), &CarrierId::usps());
    assert_eq!(quotes[0].service(), "Priority Mail");
    assert_eq!(quotes[4].service(), "UPS Next Day Air");
}

#[tokio::test]
async fn one_failing_carrier_fails_the_aggregate() {
    let server = MockServer::start().await;
    mount_ups(&server).await;
    mount_usps(&server, 503).await;

    let err = service_for(&server)
        .rates_from_registered(&scenario_request())
        .await
        .unwrap_err();

    match err {
        RateError::Carrier(e) => {
            assert_eq!(e.carrier(), &CarrierId::usps());
            assert!(matches!(e.fault(), CarrierFault::Connection { .. }));
        }
        other => unreachable!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn invalid_request_sends_no_http_traffic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = RateRequest::builder()
        .origin(beverly_hills())
        .package(parcel())
        .build();
    let err = service_for(&server)
        .rates_from_all(&request, &[CarrierId::ups(), CarrierId::usps()])
        .await
        .unwrap_err();

    assert_eq!(err.invalid_fields(), fields(&[RequestField::Destination]));
}
