//! Tests for the web services module

use super::*;
use crate::config::ClientConfig;
use crate::credentials::StaticSecrets;
use crate::error::Error;
use crate::types::{WSAPI_CLIENT_ID, WSAPI_SECRET};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        webservices_url: format!("{}/v1/", server.uri()),
        token_url: format!("{}/oauth/v2/token", server.uri()),
        ..ClientConfig::default()
    }
}

fn secrets() -> StaticSecrets {
    StaticSecrets::new()
        .with(WSAPI_CLIENT_ID, "client")
        .with(WSAPI_SECRET, "secret")
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ws-token",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

#[test_case("News", Endpoint::News ; "exact")]
#[test_case("NEWS", Endpoint::News ; "upper")]
#[test_case("companydossiers", Endpoint::CompanyDossiers ; "lower")]
#[test_case("company_and_financial", Endpoint::CompanyAndFinancial ; "snake")]
#[test_case("JuryVerdictsSettlements", Endpoint::JuryVerdictsSettlements ; "jury")]
#[test_case("JURYVERDICTSANDSETTLEMENTS", Endpoint::JuryVerdictsSettlements ; "jury alias")]
fn test_endpoint_parse(name: &str, expected: Endpoint) {
    assert_eq!(name.parse::<Endpoint>().unwrap(), expected);
}

#[test]
fn test_endpoint_parse_unknown() {
    let err = "Patents".parse::<Endpoint>().unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("Dockets"));
}

#[test]
fn test_endpoint_urls() {
    let config = ClientConfig::default();
    assert_eq!(
        Endpoint::Sources.url(&config.webservices_url),
        "https://services-api.lexisnexis.com/v1/Sources"
    );
    for endpoint in Endpoint::ALL {
        assert_eq!(endpoint.to_string(), endpoint.path());
    }
}

#[test]
fn test_encode_base64() {
    assert_eq!(encode_base64("client:secret"), "Y2xpZW50OnNlY3JldA==");
    assert_eq!(encode_base64(""), "");
}

#[test]
fn test_from_secrets_requires_both_secrets() {
    let config = ClientConfig::default();
    let only_id = StaticSecrets::new().with(WSAPI_CLIENT_ID, "client");
    let err = WebServicesClient::from_secrets(&config, &only_id).unwrap_err();
    assert!(matches!(err, Error::Credential { .. }));
}

#[tokio::test]
async fn test_access_token() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let client = WebServicesClient::from_secrets(&config_for(&server), &secrets()).unwrap();
    assert_eq!(client.access_token().await.unwrap(), "ws-token");
}

#[tokio::test]
async fn test_call_sends_bearer_and_accept() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/News"))
        .and(header("Authorization", "Bearer ws-token"))
        .and(header("Accept", "application/json"))
        .and(query_param("$search", "climate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"Title": "Story"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WebServicesClient::from_secrets(&config_for(&server), &secrets()).unwrap();
    let data = client
        .call(Endpoint::News, [("$search", "climate")])
        .await
        .unwrap();

    assert_eq!(data["value"][0]["Title"], json!("Story"));
}

#[tokio::test]
async fn test_call_error_status() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/Dockets"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = WebServicesClient::from_secrets(&config_for(&server), &secrets()).unwrap();
    let err = client
        .call(Endpoint::Dockets, Vec::<(String, String)>::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_call_token_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    let client = WebServicesClient::from_secrets(&config_for(&server), &secrets()).unwrap();
    let err = client
        .call(Endpoint::Sources, [("$top", "1")])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "AuthError");
}

#[test]
fn test_convert_xml_content() {
    let mut data = json!({
        "value": [
            {"Document": {"Content": "<entry><title>One</title><author>A</author><author>B</author></entry>"}},
            {"Document": {"Content": {"already": "json"}}},
            {"Title": "no document"}
        ]
    });

    let converted = convert_xml_content(&mut data).unwrap();
    assert_eq!(converted, 1);
    assert_eq!(
        data["value"][0]["Document"]["Content"],
        json!({"entry": {"title": "One", "author": ["A", "B"]}})
    );
    assert_eq!(data["value"][1]["Document"]["Content"], json!({"already": "json"}));
}

#[test]
fn test_convert_xml_content_without_value() {
    let err = convert_xml_content(&mut json!({"items": []})).unwrap_err();
    assert_eq!(err.kind(), "DecodeError");
}

#[test]
fn test_convert_xml_content_malformed() {
    let mut data = json!({"value": [{"Document": {"Content": "<a><b></a>"}}]});
    let err = convert_xml_content(&mut data).unwrap_err();
    assert!(matches!(err, Error::XmlParse { .. }));
}
