//! Tests for HttpDirectory against a mock licensing API.

use std::sync::Arc;
use std::time::Duration;

use lz_core::{CoreError, OfferKey, SchemaRegistry};
use lz_directory::{HttpDirectory, HttpDirectoryConfig, OfferSource, ResolveError};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OFFER_ID: &str = "11111111-1111-4111-8111-111111111111";

fn directory() -> HttpDirectory {
    HttpDirectory::new(
        HttpDirectoryConfig {
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        },
        Arc::new(SchemaRegistry::new().unwrap()),
    )
    .unwrap()
}

fn key(server: &MockServer) -> OfferKey {
    OfferKey::new(server.uri(), Uuid::parse_str(OFFER_ID).unwrap())
}

fn offer_body() -> serde_json::Value {
    json!({
        "licensorID": "22222222-2222-4222-8222-222222222222",
        "url": "https://example.com/project",
        "pricing": {
            "single": { "amount": 1000, "currency": "USD" },
            "relicense": { "amount": 100000, "currency": "USD" }
        }
    })
}

#[tokio::test]
async fn test_fetch_offer_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/offers/{OFFER_ID}")))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offer_body()))
        .expect(1)
        .mount(&server)
        .await;

    let offer = directory().fetch_offer(&key(&server)).await.unwrap();
    assert_eq!(offer.api, server.uri());
    assert_eq!(offer.offer_id.to_string(), OFFER_ID);
    assert_eq!(offer.pricing.single.amount, 1000);
    assert_eq!(offer.pricing.relicense.map(|p| p.amount), Some(100000));
}

#[tokio::test]
async fn test_fetch_offer_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = directory().fetch_offer(&key(&server)).await.unwrap_err();
    assert!(matches!(err, ResolveError::NotFound(_)));
}

#[tokio::test]
async fn test_fetch_offer_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = directory().fetch_offer(&key(&server)).await.unwrap_err();
    assert!(matches!(err, ResolveError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_fetch_offer_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = directory().fetch_offer(&key(&server)).await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Schema(lz_core::SchemaError::Malformed { .. })
    ));
}

#[tokio::test]
async fn test_fetch_offer_invalid_document() {
    let server = MockServer::start().await;
    let mut body = offer_body();
    body["licensorID"] = json!("not-a-uuid");
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = directory().fetch_offer(&key(&server)).await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Schema(lz_core::SchemaError::Unrecognized { .. })
    ));
}

#[tokio::test]
async fn test_fetch_offer_for_other_offer_is_rejected() {
    let server = MockServer::start().await;
    let mut body = offer_body();
    body["offerID"] = json!("33333333-3333-4333-8333-333333333333");
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = directory().fetch_offer(&key(&server)).await.unwrap_err();
    assert!(matches!(err, ResolveError::Core(_)));
}

#[tokio::test]
async fn test_fetch_offer_for_other_api_is_rejected() {
    let server = MockServer::start().await;
    let mut body = offer_body();
    body["api"] = json!("https://elsewhere.example.com");
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = directory().fetch_offer(&key(&server)).await.unwrap_err();
    assert!(matches!(err, ResolveError::Core(CoreError::ApiMismatch { .. })));
}

#[tokio::test]
async fn test_fetch_offer_unreachable() {
    let key = OfferKey::new("http://127.0.0.1:1", Uuid::parse_str(OFFER_ID).unwrap());
    let err = directory().fetch_offer(&key).await.unwrap_err();
    assert!(matches!(err, ResolveError::Http { .. }));
}
