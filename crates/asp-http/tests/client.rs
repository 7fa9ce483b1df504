use asp_http::{BasicAuth, HttpClient, HttpClientTrait, HttpConfig, HttpError, StatusCode};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{basic_auth, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_post_json_sends_basic_auth_and_body() {
    let server = MockServer::start().await;
    let payload = json!({"topic_name": "t"});

    Mock::given(method("POST"))
        .and(path("/topics"))
        .and(basic_auth("key", "secret"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::with_defaults().unwrap();
    let auth = BasicAuth::new("key", "secret");
    let response = client
        .post_json(&format!("{}/topics", server.uri()), Some(&auth), &payload)
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json().unwrap()["ok"], true);
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(&server)
        .await;

    let client = HttpClient::with_defaults().unwrap();
    let response = client
        .post_json(&server.uri(), None, &json!({}))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body, "conflict");
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = HttpConfig::default().with_timeout(Duration::from_millis(200));
    let client = HttpClient::new(config).unwrap();
    let result = client.post_json(&server.uri(), None, &json!({})).await;

    match result {
        Err(err) => assert!(err.is_transport()),
        Ok(_) => panic!("expected timeout"),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let config = HttpConfig::default().with_timeout(Duration::from_secs(2));
    let client = HttpClient::new(config).unwrap();
    let result = client
        .post_json("http://127.0.0.1:1/topics", None, &json!({}))
        .await;

    assert!(matches!(result, Err(ref e) if e.is_transport()));
    assert!(!matches!(result, Err(HttpError::InvalidUrl(_))));
}
