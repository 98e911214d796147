mod support;

use oauth_device_flow::auth::{DeviceAuthorization, DeviceFlowClient};
use oauth_device_flow::error::{AuthorizationError, DeviceFlowError, ErrorCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::test_config;

#[tokio::test]
async fn success_response_is_preserved_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("accept", "application/json"))
        .and(body_string("client_id=oauth2dev-client-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "GmRhmhcxhwAzkoEqiMEg_DnyEysNkuNhszIySk9eS",
            "user_code": "WDJB-MJHT",
            "verification_uri": "https://example.com/device",
            "verification_uri_complete": "https://example.com/device?user_code=WDJB-MJHT",
            "expires_in": 1800,
            "interval": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DeviceFlowClient::new(test_config(&server.uri()));
    let got = client
        .request_device_authorization(&CancellationToken::new())
        .await
        .expect("device authorization");

    assert_eq!(
        got,
        DeviceAuthorization {
            device_code: "GmRhmhcxhwAzkoEqiMEg_DnyEysNkuNhszIySk9eS".to_string(),
            user_code: "WDJB-MJHT".to_string(),
            verification_uri: "https://example.com/device".to_string(),
            verification_uri_complete: Some(
                "https://example.com/device?user_code=WDJB-MJHT".to_string()
            ),
            expires_in: 1800,
            interval: 5,
        }
    );
}

#[tokio::test]
async fn scopes_are_sent_space_delimited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(body_string("client_id=oauth2dev-client-id&scope=openid+email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "d",
            "user_code": "u",
            "verification_uri": "https://example.com/device",
            "expires_in": 600,
            "interval": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri()).with_scopes(["openid", "email"]);
    let got = DeviceFlowClient::new(config)
        .request_device_authorization(&CancellationToken::new())
        .await
        .expect("device authorization");

    assert_eq!(got.interval, 7);
}

#[tokio::test]
async fn client_secret_is_not_sent_to_the_authorization_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(body_string("client_id=oauth2dev-client-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "d",
            "user_code": "u",
            "verification_uri": "https://example.com/device",
            "expires_in": 600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri()).with_client_secret("secret");
    DeviceFlowClient::new(config)
        .request_device_authorization(&CancellationToken::new())
        .await
        .expect("device authorization");
}

#[tokio::test]
async fn absent_or_zero_interval_defaults_to_five() {
    for body in [
        json!({
            "device_code": "d",
            "user_code": "u",
            "verification_uri": "https://example.com/device",
            "expires_in": 600
        }),
        json!({
            "device_code": "d",
            "user_code": "u",
            "verification_uri": "https://example.com/device",
            "expires_in": 600,
            "interval": 0
        }),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let got = DeviceFlowClient::new(test_config(&server.uri()))
            .request_device_authorization(&CancellationToken::new())
            .await
            .expect("device authorization");

        assert_eq!(got.interval, 5);
        assert_eq!(got.expires_in, 600);
    }
}

#[tokio::test]
async fn error_response_becomes_authorization_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("content-type", "application/json;charset=UTF-8")
                .set_body_string(r#"{"error":"invalid_request"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = DeviceFlowClient::new(test_config(&server.uri()))
        .request_device_authorization(&CancellationToken::new())
        .await
        .unwrap_err();

    let got = match err {
        DeviceFlowError::Authorization(got) => got,
        other => panic!("expected authorization error, got {other:?}"),
    };
    assert_eq!(got.status_code, 400);
    assert_eq!(got.error_code, "invalid_request");
    assert_eq!(got.code(), Some(ErrorCode::InvalidRequest));
    assert_eq!(
        AuthorizationError {
            body: None,
            ..got
        },
        AuthorizationError::new(400, "invalid_request")
    );
}

#[tokio::test]
async fn error_field_in_success_status_is_an_authorization_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "unauthorized_client",
            "error_description": "device flow disabled for this app"
        })))
        .mount(&server)
        .await;

    let err = DeviceFlowClient::new(test_config(&server.uri()))
        .request_device_authorization(&CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.oauth_error_code(), Some("unauthorized_client"));
    assert_eq!(err.status_code(), Some(200));
}

#[tokio::test]
async fn malformed_success_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = DeviceFlowClient::new(test_config(&server.uri()))
        .request_device_authorization(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DeviceFlowError::Parse(_)));
}

#[tokio::test]
async fn missing_user_code_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "d",
            "verification_uri": "https://example.com/device",
            "expires_in": 600
        })))
        .mount(&server)
        .await;

    let err = DeviceFlowClient::new(test_config(&server.uri()))
        .request_device_authorization(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DeviceFlowError::Parse(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let client = DeviceFlowClient::new(test_config("http://127.0.0.1:1"));
    let err = client
        .request_device_authorization(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DeviceFlowError::Transport(_)));
    assert_eq!(err.oauth_error_code(), None);
}

#[tokio::test]
async fn cancelled_request_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = DeviceFlowClient::new(test_config(&server.uri()))
        .request_device_authorization(&cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}
