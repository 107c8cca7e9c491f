// request pipeline tests: retries, compression and authentication

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use httpmock::prelude::*;
use platform_services::governance::{
    AttachmentRequest, ConfigurationGovernanceV1, CreateAttachmentsOptions, GetRuleOptions,
    ListRulesOptions, RuleScope, ScopeType,
};
use platform_services::service::{
    BasicAuthenticator, IamAuthenticator, NoAuthAuthenticator, ServiceOptions,
};
use platform_services::SdkError;
use serde_json::json;

use crate::common::{governance_client, init_logging, rule_json};

fn unavailable<'a>(
    server: &'a MockServer,
    method: httpmock::Method,
    path: &str,
) -> httpmock::Mock<'a> {
    let path = path.to_string();
    server.mock(move |when, then| {
        when.method(method).path(path);
        then.status(503)
            .header("retry-after", "0")
            .json_body(json!({"error": "Service temporarily unavailable"}));
    })
}

fn http_response(status: &str, extra_headers: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
        status,
        body.len(),
        extra_headers,
        body
    )
}

/// serves `responses` in order, one connection each; returns the base URL and
/// a handle yielding the number of requests answered
fn scripted_server(responses: Vec<String>) -> (String, thread::JoinHandle<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut served = 0;
        for response in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            served += 1;
        }
        served
    });
    (url, handle)
}

fn attachment_options() -> CreateAttachmentsOptions {
    let scope = RuleScope::new("scope-1", ScopeType::Account);
    CreateAttachmentsOptions::new("rule-1", vec![AttachmentRequest::new("acc", scope)])
}

#[test]
fn test_retries_disabled_by_default() {
    let server = MockServer::start();
    let mock = unavailable(&server, GET, "/config/v1/rules/rule-1");

    let client = governance_client(&server);
    let err = client.get_rule(&GetRuleOptions::new("rule-1")).unwrap_err();

    mock.assert_calls(1);
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("Service temporarily unavailable"));
}

#[test]
fn test_retries_idempotent_request() {
    let server = MockServer::start();
    let mock = unavailable(&server, GET, "/config/v1/rules/rule-1");

    let mut client = governance_client(&server);
    client.enable_retries(2, Duration::from_secs(1));
    let err = client.get_rule(&GetRuleOptions::new("rule-1")).unwrap_err();

    // first attempt plus two retries
    mock.assert_calls(3);
    assert_eq!(err.status(), Some(503));

    client.disable_retries();
    client.get_rule(&GetRuleOptions::new("rule-1")).unwrap_err();
    mock.assert_calls(4);
}

#[test]
fn test_post_not_retried_on_server_error() {
    let server = MockServer::start();
    let mock = unavailable(&server, POST, "/config/v1/rules/rule-1/attachments");

    let mut client = governance_client(&server);
    client.enable_retries(3, Duration::from_secs(1));

    let options = attachment_options();
    client.create_attachments(&options).unwrap_err();

    mock.assert_calls(1);
}

#[test]
fn test_rate_limit_retried_for_any_method() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/config/v1/rules/rule-1/attachments");
        then.status(429).header("retry-after", "0");
    });

    let mut client = governance_client(&server);
    client.enable_retries(1, Duration::from_secs(1));

    let options = attachment_options();
    let err = client.create_attachments(&options).unwrap_err();

    mock.assert_calls(2);
    assert_eq!(err.status(), Some(429));
}

#[test]
fn test_not_implemented_is_not_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/config/v1/rules/rule-1");
        then.status(501).header("retry-after", "0");
    });

    let mut client = governance_client(&server);
    client.enable_retries(3, Duration::from_secs(1));
    client.get_rule(&GetRuleOptions::new("rule-1")).unwrap_err();

    mock.assert_calls(1);
}

#[test]
fn test_gzip_request_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/config/v1/rules/rule-1/attachments")
            .header("content-encoding", "gzip")
            .header("content-type", "application/json");
        then.status(201).json_body(json!({"attachments": []}));
    });

    let mut client = governance_client(&server);
    client.set_enable_gzip_compression(true);

    let options = attachment_options();
    client.create_attachments(&options).unwrap();

    mock.assert();
}

#[test]
fn test_default_headers_overridden_per_call() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/config/v1/rules")
            .query_param("account_id", "acc-1")
            .header("x-team", "platform")
            .header("x-env", "override");
        then.status(200).json_body(json!({
            "offset": 0,
            "limit": 100,
            "total_count": 0,
            "first": {"href": "/config/v1/rules?account_id=acc-1"},
            "last": {"href": "/config/v1/rules?account_id=acc-1"},
            "rules": []
        }));
    });

    let mut client = governance_client(&server);
    let mut defaults = HashMap::new();
    defaults.insert("X-Team".to_string(), "platform".to_string());
    defaults.insert("X-Env".to_string(), "default".to_string());
    client.set_default_headers(defaults);

    client
        .list_rules(&ListRulesOptions::new("acc-1").with_header("X-Env", "override"))
        .unwrap();
    mock.assert();
}

#[test]
fn test_iam_token_exchanged_once() {
    init_logging();
    let iam = MockServer::start();
    let token = iam.mock(|when, then| {
        when.method(POST)
            .path("/identity/token")
            .header("content-type", "application/x-www-form-urlencoded")
            .body_includes("apikey=my-api-key");
        then.status(200).json_body(json!({
            "access_token": "iam-access-token",
            "refresh_token": "not-used",
            "token_type": "Bearer",
            "expires_in": 3600,
            "expiration": 1893456000
        }));
    });

    let server = MockServer::start();
    let rule = server.mock(|when, then| {
        when.method(GET)
            .path("/config/v1/rules/rule-1")
            .header("authorization", "Bearer iam-access-token");
        then.status(200)
            .json_body(rule_json("rule-1", "Public access check"));
    });

    let auth = IamAuthenticator::new("my-api-key").with_url(iam.base_url());
    let client =
        ConfigurationGovernanceV1::new(ServiceOptions::new(auth).with_url(server.base_url()))
            .unwrap();

    client.get_rule(&GetRuleOptions::new("rule-1")).unwrap();
    client.get_rule(&GetRuleOptions::new("rule-1")).unwrap();

    token.assert_calls(1);
    rule.assert_calls(2);
}

#[test]
fn test_iam_rejection_is_authentication_error() {
    init_logging();
    let iam = MockServer::start();
    iam.mock(|when, then| {
        when.method(POST).path("/identity/token");
        then.status(400).json_body(json!({
            "errorCode": "BXNIM0415E",
            "errorMessage": "Provided API key could not be found"
        }));
    });
    let server = MockServer::start();

    let auth = IamAuthenticator::new("bad-key").with_url(iam.base_url());
    let client =
        ConfigurationGovernanceV1::new(ServiceOptions::new(auth).with_url(server.base_url()))
            .unwrap();

    let err = client.get_rule(&GetRuleOptions::new("rule-1")).unwrap_err();
    match err {
        SdkError::Authentication(message) => {
            assert!(message.contains("API key could not be found"), "{}", message)
        }
        other => panic!("expected authentication error, got {:?}", other),
    }
}

#[test]
fn test_basic_auth_header() {
    init_logging();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/config/v1/rules/rule-1")
            .header("authorization", "Basic dXNlcjpwYXNz");
        then.status(200)
            .json_body(rule_json("rule-1", "Public access check"));
    });

    let client = ConfigurationGovernanceV1::new(
        ServiceOptions::new(BasicAuthenticator::new("user", "pass")).with_url(server.base_url()),
    )
    .unwrap();
    client.get_rule(&GetRuleOptions::new("rule-1")).unwrap();
    mock.assert();
}

#[test]
fn test_retry_recovers_after_unavailable() {
    init_logging();
    let busy = http_response(
        "503 Service Unavailable",
        "Retry-After: 0\r\n",
        r#"{"error":"Service temporarily unavailable"}"#,
    );
    let ok = http_response(
        "200 OK",
        "ETag: \"etag-1\"\r\n",
        &rule_json("rule-1", "Public access check").to_string(),
    );
    let (url, handle) = scripted_server(vec![busy, ok]);

    let mut client =
        ConfigurationGovernanceV1::new(ServiceOptions::new(NoAuthAuthenticator).with_url(url))
            .unwrap();
    client.enable_retries(2, Duration::from_secs(1));

    let response = client.get_rule(&GetRuleOptions::new("rule-1")).unwrap();

    assert_eq!(handle.join().unwrap(), 2);
    assert_eq!(response.status_code, 200);
    assert_eq!(response.etag(), Some("\"etag-1\""));
    assert_eq!(response.result.rule_id.as_deref(), Some("rule-1"));
}
