// config file loading and client construction

use std::fs;
use std::time::Duration;

use httpmock::prelude::*;
use platform_services::config::{self, AuthType};
use platform_services::enterprise::GetEnterpriseOptions;
use serde_json::json;

use crate::common::init_logging;

const SAMPLE: &str = r#"
{
    // comments and trailing commas are allowed
    services: {
        configuration_governance: {
            auth_type: "iam",
            apikey: "my-api-key",
            auth_url: "https://iam.test.cloud.ibm.com",
            enable_retries: true,
            max_retries: 3,
            retry_interval_secs: 10,
        },
        enterprise_management: {
            url: "URL_PLACEHOLDER",
            auth_type: "bearerToken",
            bearer_token: "static-token",
            timeout_secs: 5,
            enable_gzip: true,
        },
    },
}
"#;

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_json5_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, &SAMPLE.replace("URL_PLACEHOLDER", "https://example.com/v1"));

    let config = config::load(&path).unwrap();
    let governance = config.service("configuration_governance").unwrap();
    assert_eq!(governance.auth_type, AuthType::Iam);
    assert_eq!(governance.max_retries, 3);

    let enterprise = config.service("enterprise_management").unwrap();
    assert_eq!(enterprise.auth_type, AuthType::BearerToken);
    assert_eq!(enterprise.timeout_secs, Some(5));

    assert!(config::verify(&path).unwrap().is_empty());

    let client = governance.configuration_governance().unwrap();
    assert_eq!(client.service_url(), "https://compliance.cloud.ibm.com");
    let policy = client.service().retry_policy().unwrap();
    assert_eq!(policy.max_retries, 3);
    assert_eq!(policy.max_interval, Duration::from_secs(10));
}

#[test]
fn test_verify_reports_each_service() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"{
            services: {
                a: { auth_type: "basic", username: "user" },
                b: { auth_type: "noauth", url: "not-a-url" },
                c: { auth_type: "noauth" },
            }
        }"#,
    );

    let errors = config::verify(&path).unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("services.a:"));
    assert!(errors[0].contains("password"));
    assert!(errors[1].starts_with("services.b:"));
}

#[test]
fn test_load_errors_carry_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "{ services: ");

    let err = config::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("config.json"));

    let missing = dir.path().join("missing.json");
    assert!(config::load(&missing).is_err());
    assert!(config::verify(&missing).is_err());
}

#[test]
fn test_configured_client_sends_bearer_token() {
    init_logging();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/enterprises/ent-1")
            .header("authorization", "Bearer static-token");
        then.status(200).json_body(json!({"id": "ent-1", "name": "Example"}));
    });

    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, &SAMPLE.replace("URL_PLACEHOLDER", &server.base_url()));
    let config = config::load(&path).unwrap();

    let client = config
        .service("enterprise_management")
        .unwrap()
        .enterprise_management()
        .unwrap();
    assert!(client.service().enable_gzip_compression());

    let enterprise = client
        .get_enterprise(&GetEnterpriseOptions::new("ent-1"))
        .unwrap()
        .result;
    mock.assert();
    assert_eq!(enterprise.name.as_deref(), Some("Example"));
}
