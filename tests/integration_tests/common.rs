// shared utilities for integration tests

use httpmock::MockServer;
use platform_services::enterprise::EnterpriseManagementV1;
use platform_services::governance::ConfigurationGovernanceV1;
use platform_services::service::{NoAuthAuthenticator, ServiceOptions};
use serde_json::{json, Value};

/// route `log` output through the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn governance_client(server: &MockServer) -> ConfigurationGovernanceV1 {
    init_logging();
    ConfigurationGovernanceV1::new(
        ServiceOptions::new(NoAuthAuthenticator).with_url(server.base_url()),
    )
    .expect("failed to build governance client")
}

pub fn enterprise_client(server: &MockServer) -> EnterpriseManagementV1 {
    init_logging();
    EnterpriseManagementV1::new(ServiceOptions::new(NoAuthAuthenticator).with_url(server.base_url()))
        .expect("failed to build enterprise client")
}

/// a stored rule as the service returns it
pub fn rule_json(rule_id: &str, name: &str) -> Value {
    json!({
        "account_id": "531fc3e28bfc43c5a2cea07786d93f5c",
        "name": name,
        "description": "Ensure that public access is disabled on buckets",
        "rule_type": "user_defined",
        "target": {
            "service_name": "cloud-object-storage",
            "resource_kind": "bucket",
            "additional_target_attributes": [
                {"name": "resource_id", "operator": "string_equals", "value": "f0f8f7994e754ff38f9d370201966561"}
            ]
        },
        "required_config": {
            "description": "Public access check",
            "and": [
                {"property": "public_access_enabled", "operator": "is_false"},
                {"or": [
                    {"property": "location", "operator": "string_equals", "value": "us-south"},
                    {"property": "location", "operator": "string_equals", "value": "eu-de"}
                ]}
            ]
        },
        "enforcement_actions": [{"action": "disallow"}],
        "labels": ["SOC2", "ITCS300"],
        "rule_id": rule_id,
        "creation_date": "2020-08-13T19:37:50Z",
        "created_by": "IBMid-1",
        "modification_date": "2020-08-13T19:37:50",
        "modified_by": "IBMid-1",
        "number_of_attachments": 0
    })
}

pub fn attachment_json(rule_id: &str, attachment_id: &str) -> Value {
    json!({
        "attachment_id": attachment_id,
        "rule_id": rule_id,
        "account_id": "531fc3e28bfc43c5a2cea07786d93f5c",
        "included_scope": {
            "note": "My enterprise",
            "scope_id": "282cf433ac91493ba860480d92519990",
            "scope_type": "enterprise"
        },
        "excluded_scopes": [
            {"note": "Sandbox", "scope_id": "91e6a6b1c9d64ab9bd4b1b5c2fd4e3b0", "scope_type": "enterprise.account_group"}
        ]
    })
}
