use httpmock::prelude::*;
use rpc_client::{ClientConfig, ClientProvider, SharedClient};
use serde_json::json;

fn latest_height(provider: &ClientProvider) -> Result<u64, reqwest::Error> {
    let body: serde_json::Value = provider
        .get_instance()
        .get("blocks/latest")
        .send()?
        .error_for_status()?
        .json()?;
    Ok(body["height"].as_u64().unwrap_or_default())
}

#[test]
fn get_targets_base_url_and_path() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/status");
        then.status(200).body("ok");
    });

    let client = SharedClient::new(server.base_url()).unwrap();
    let response = client.get("status").send().unwrap();

    assert_eq!(response.url().as_str(), format!("{}/status", server.base_url()));
    assert_eq!(response.text().unwrap(), "ok");
    mock.assert();
}

#[test]
fn sends_crate_user_agent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/status")
            .header("user-agent", concat!("rpc-client/", env!("CARGO_PKG_VERSION")));
        then.status(204);
    });

    let client = SharedClient::new(server.base_url()).unwrap();
    client.get("/status").send().unwrap();
    mock.assert();
}

#[test]
fn post_carries_caller_body_and_headers() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rpc")
            .header("x-request-id", "abc")
            .json_body(json!({ "method": "ping" }));
        then.status(200).json_body(json!({ "result": "pong" }));
    });

    let client = SharedClient::new(server.base_url()).unwrap();
    let body: serde_json::Value = client
        .post("rpc")
        .header("x-request-id", "abc")
        .json(&json!({ "method": "ping" }))
        .send()
        .unwrap()
        .json()
        .unwrap();

    assert_eq!(body["result"], "pong");
    mock.assert();
}

#[test]
fn error_statuses_come_back_as_responses() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/items/1");
        then.status(500).body("boom");
    });

    let client = SharedClient::new(server.base_url()).unwrap();
    let response = client.put("items/1").send().unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let err = response.error_for_status().unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
}

#[test]
fn unreachable_base_url_fails_when_sent() {
    let client = SharedClient::new("http://127.0.0.1:1").unwrap();

    let err = client.get("status").send().unwrap_err();

    assert!(err.is_connect());
}

#[test]
fn provider_built_from_config_uses_configured_base_url() {
    let config = ClientConfig::resolve(|_| Some("https://api.example.com".to_string()), None);
    let provider = ClientProvider::new(&config).unwrap();

    assert_eq!(provider.get_instance().base_url(), "https://api.example.com");
}

#[test]
fn injected_client_serves_callers() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/blocks/latest");
        then.status(200).json_body(json!({ "height": 7 }));
    });

    let provider = ClientProvider::from_client(SharedClient::new(server.base_url()).unwrap());

    assert_eq!(latest_height(&provider).unwrap(), 7);
    assert_eq!(latest_height(&provider).unwrap(), 7);
    mock.assert_calls(2);
}
