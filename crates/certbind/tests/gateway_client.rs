//! Admin API client tests against a mock gateway.

use certbind::gateway::{CertStore, CertUpload, GatewayClient, GatewayError, API_KEY_HEADER};
use certbind_common::CertObjectId;
use certbind_config::ClientSettings;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADMIN_KEY: &str = "edd1c9f034335f136f87ad84b625c8f1";
const PREFIX: &str = "/apisix/admin";

fn client(server: &MockServer) -> GatewayClient {
    GatewayClient::new(
        &format!("{}{PREFIX}", server.uri()),
        ADMIN_KEY,
        &ClientSettings::default(),
    )
    .unwrap()
}

fn ok_json(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn test_list_parses_object_container() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/ssls")))
        .and(header(API_KEY_HEADER, ADMIN_KEY))
        .respond_with(ok_json(json!({
            "total": 3,
            "list": {
                "a": {"value": {"id": "1", "desc": "allinssl-x", "snis": ["a.com"]}},
                "b": {"value": {"desc": "no id", "snis": ["b.com"]}},
                "c": {"key": "/apisix/ssls/3"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let objects = client(&server).list().await.unwrap();

    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].id, Some(CertObjectId::new("1")));
    assert_eq!(objects[0].desc, "allinssl-x");
    assert_eq!(objects[1].id, None);
}

#[tokio::test]
async fn test_list_accepts_array_container() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PREFIX}/ssls")))
        .respond_with(ok_json(json!({
            "total": 1,
            "list": [{"key": "/apisix/ssls/9", "value": {"id": "9", "snis": ["a.com"]}}]
        })))
        .mount(&server)
        .await;

    let objects = client(&server).list().await.unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].id, Some(CertObjectId::new("9")));
}

#[tokio::test]
async fn test_list_sends_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok_json(json!({"list": {}})))
        .mount(&server)
        .await;

    client(&server).list().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
    assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_list_without_container_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "unauthorized"})))
        .mount(&server)
        .await;

    let err = client(&server).list().await.unwrap_err();
    assert!(matches!(err, GatewayError::Protocol(_)));
}

#[tokio::test]
async fn test_list_non_json_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server).list().await.unwrap_err();
    assert!(matches!(err, GatewayError::Protocol(_)));
}

#[tokio::test]
async fn test_list_rejects_non_object_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok_json(json!({"list": {"a": "oops"}})))
        .mount(&server)
        .await;

    let err = client(&server).list().await.unwrap_err();
    assert!(matches!(err, GatewayError::Protocol(_)));
}

#[tokio::test]
async fn test_unreachable_gateway_is_transport_error() {
    // Grab a free port and release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://{}{PREFIX}", listener.local_addr().unwrap());
    drop(listener);

    let client = GatewayClient::new(&address, ADMIN_KEY, &ClientSettings::default()).unwrap();
    let err = client.list().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
}

#[tokio::test]
async fn test_create_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{PREFIX}/ssls")))
        .and(header(API_KEY_HEADER, ADMIN_KEY))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "cert": "CERT",
            "key": "KEY",
            "desc": "allinssl-abc",
            "snis": ["a.com", "b.com"]
        })))
        .respond_with(ok_json(json!({"code": 200, "msg": "ok", "data": {"key": "42"}})))
        .expect(1)
        .mount(&server)
        .await;

    let snis = vec!["a.com".to_string(), "b.com".to_string()];
    let id = client(&server)
        .create(&CertUpload {
            cert: "CERT",
            key: "KEY",
            desc: "allinssl-abc",
            snis: &snis,
        })
        .await
        .unwrap();

    assert_eq!(id, CertObjectId::new("42"));
}

#[tokio::test]
async fn test_create_rejected_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok_json(json!({"code": 400, "msg": "invalid certificate"})))
        .mount(&server)
        .await;

    let snis = vec!["a.com".to_string()];
    let err = client(&server)
        .create(&CertUpload {
            cert: "CERT",
            key: "KEY",
            desc: "d",
            snis: &snis,
        })
        .await
        .unwrap_err();

    match err {
        GatewayError::Protocol(msg) => assert!(msg.contains("invalid certificate")),
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_without_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok_json(json!({"code": 200, "data": {}})))
        .mount(&server)
        .await;

    let snis = vec!["a.com".to_string()];
    let err = client(&server)
        .create(&CertUpload {
            cert: "CERT",
            key: "KEY",
            desc: "d",
            snis: &snis,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Protocol(_)));
}

#[tokio::test]
async fn test_delete_confirms_path_key() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{PREFIX}/ssls/42")))
        .and(header(API_KEY_HEADER, ADMIN_KEY))
        .respond_with(ok_json(json!({"deleted": "1", "key": "/apisix/ssls/42"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete(&CertObjectId::new("42"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_delete_key_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ok_json(json!({"deleted": "1", "key": "/apisix/ssls/43"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .delete(&CertObjectId::new("42"))
        .await
        .unwrap_err();

    match err {
        GatewayError::Protocol(msg) => assert!(msg.contains("mismatch")),
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_not_confirmed() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Key not found"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .delete(&CertObjectId::new("42"))
        .await
        .unwrap_err();

    match err {
        GatewayError::Protocol(msg) => assert!(msg.contains("Key not found")),
        other => panic!("expected protocol error, got {other:?}"),
    }
}
