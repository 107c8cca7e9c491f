// integration tests for the Configuration Governance client against a mock server

use httpmock::prelude::*;
use platform_services::conditions::{Operator, RuleCondition, RuleRequiredConfig, SingleProperty};
use platform_services::governance::*;
use platform_services::SdkError;
use serde_json::json;

use crate::common::{attachment_json, governance_client, rule_json};

fn sample_rule_request(name: &str) -> RuleRequest {
    RuleRequest::new(
        name,
        "Ensure that public access is disabled on buckets",
        TargetResource::new("cloud-object-storage", "bucket"),
        RuleRequiredConfig::and(vec![
            RuleCondition::single(SingleProperty::new("public_access_enabled", Operator::IsFalse)),
            RuleCondition::or(vec![
                SingleProperty::new("location", Operator::StringEquals).with_value("us-south"),
                SingleProperty::new("location", Operator::StringEquals).with_value("eu-de"),
            ]),
        ])
        .with_description("Public access check"),
        vec![EnforcementAction::new(Action::Disallow)],
    )
    .with_account_id("531fc3e28bfc43c5a2cea07786d93f5c")
    .with_rule_type(RuleType::UserDefined)
}

#[test]
fn test_create_rules_partial_failure() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/config/v1/rules")
            .header("transaction-id", "tx-batch-1")
            .header("content-type", "application/json");
        then.status(207).json_body(json!({
            "rules": [
                {
                    "request_id": "req-1",
                    "status_code": 201,
                    "rule": rule_json("rule-1", "Public access check")
                },
                {
                    "request_id": "req-2",
                    "status_code": 400,
                    "errors": [{"code": "bad_request", "message": "The rule is missing a target"}],
                    "trace": "861263b4-cee3-4514-8d8c-05d17308e6eb"
                }
            ]
        }));
    });

    let client = governance_client(&server);
    let options = CreateRulesOptions::new(vec![
        CreateRuleRequest::new(sample_rule_request("Public access check"))
            .with_request_id("req-1"),
        CreateRuleRequest::new(sample_rule_request("Second rule")).with_request_id("req-2"),
    ])
    .with_transaction_id("tx-batch-1");

    let response = client.create_rules(&options).unwrap();
    mock.assert();

    assert_eq!(response.status_code, 207);
    let rules = &response.result.rules;
    assert_eq!(rules.len(), 2);

    assert!(rules[0].is_success());
    let created = rules[0].rule.as_ref().unwrap();
    assert_eq!(created.rule_id.as_deref(), Some("rule-1"));
    assert!(matches!(
        created.required_config,
        RuleRequiredConfig::And { .. }
    ));

    assert!(!rules[1].is_success());
    assert_eq!(rules[1].request_id.as_deref(), Some("req-2"));
    let errors = rules[1].errors.as_ref().unwrap();
    assert_eq!(errors[0].code, "bad_request");
    assert_eq!(response.result.failures().count(), 1);
}

#[test]
fn test_create_rules_sends_condition_tree() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/config/v1/rules").json_body(json!({
            "rules": [{
                "rule": {
                    "account_id": "531fc3e28bfc43c5a2cea07786d93f5c",
                    "name": "Public access check",
                    "description": "Ensure that public access is disabled on buckets",
                    "rule_type": "user_defined",
                    "target": {"service_name": "cloud-object-storage", "resource_kind": "bucket"},
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
                    "enforcement_actions": [{"action": "disallow"}]
                }
            }]
        }));
        then.status(201).json_body(json!({"rules": []}));
    });

    let client = governance_client(&server);
    let options = CreateRulesOptions::new(vec![CreateRuleRequest::new(sample_rule_request(
        "Public access check",
    ))]);
    let response = client.create_rules(&options).unwrap();

    mock.assert();
    assert_eq!(response.status_code, 201);
}

#[test]
fn test_stale_if_match_is_rejected() {
    let server = MockServer::start();
    let get_mock = server.mock(|when, then| {
        when.method(GET).path("/config/v1/rules/rule-1");
        then.status(200)
            .header("etag", "\"v2\"")
            .json_body(rule_json("rule-1", "Public access check"));
    });
    let put_mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/config/v1/rules/rule-1")
            .header("if-match", "\"v1\"");
        then.status(412).json_body(json!({
            "errors": [{
                "code": "precondition_failed",
                "message": "The If-Match header value does not match the current Etag of the rule"
            }],
            "trace": "3cbd6e5f-0a6a-4e30-8a5e-6d0d9f6a2a3e"
        }));
    });

    let client = governance_client(&server);
    let before = client.get_rule(&GetRuleOptions::new("rule-1")).unwrap();
    assert_eq!(before.etag(), Some("\"v2\""));

    let update = UpdateRuleOptions::new("rule-1", "\"v1\"", sample_rule_request("Renamed"));
    let err = client.update_rule(&update).unwrap_err();
    put_mock.assert();

    match &err {
        SdkError::Http {
            status,
            message,
            body,
        } => {
            assert_eq!(*status, 412);
            assert!(message.contains("If-Match"));
            assert!(body.as_ref().unwrap().trace.is_some());
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
    assert_eq!(err.status(), Some(412));

    let after = client.get_rule(&GetRuleOptions::new("rule-1")).unwrap();
    get_mock.assert_calls(2);
    assert_eq!(before.result, after.result);
    assert_eq!(after.result.name, "Public access check");
}

#[test]
fn test_update_rule_with_current_etag() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/config/v1/rules/rule-1")
            .header("if-match", "\"v2\"")
            .json_body_obj(&sample_rule_request("Renamed"));
        then.status(200)
            .header("etag", "\"v3\"")
            .json_body(rule_json("rule-1", "Renamed"));
    });

    let client = governance_client(&server);
    let update = UpdateRuleOptions::new("rule-1", "\"v2\"", sample_rule_request("Renamed"));
    let response = client.update_rule(&update).unwrap();

    mock.assert();
    assert_eq!(response.etag(), Some("\"v3\""));
    assert_eq!(response.result.name, "Renamed");
}

#[test]
fn test_list_rules_query() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/config/v1/rules")
            .query_param("account_id", "acc-1")
            .query_param("attached", "true")
            .query_param("labels", "SOC2,ITCS300")
            .query_param("limit", "1")
            .query_param("offset", "0")
            .query_param_missing("scopes");
        then.status(200).json_body(json!({
            "offset": 0,
            "limit": 1,
            "total_count": 2,
            "first": {"href": "/config/v1/rules?account_id=acc-1&limit=1"},
            "last": {"href": "/config/v1/rules?account_id=acc-1&limit=1&offset=1"},
            "rules": [rule_json("rule-1", "Public access check")]
        }));
    });

    let client = governance_client(&server);
    let options = ListRulesOptions::new("acc-1")
        .with_attached(true)
        .with_labels("SOC2,ITCS300")
        .with_limit(1)
        .with_offset(0);
    let response = client.list_rules(&options).unwrap();

    mock.assert();
    assert_eq!(response.result.rules.len(), 1);
    assert_eq!(response.result.next_offset(), Some(1));
}

#[test]
fn test_delete_rule_no_content() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/config/v1/rules/rule-1");
        then.status(204);
    });

    let client = governance_client(&server);
    let response = client.delete_rule(&DeleteRuleOptions::new("rule-1")).unwrap();

    mock.assert();
    assert_eq!(response.status_code, 204);
}

#[test]
fn test_attachment_lifecycle() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/config/v1/rules/rule-1/attachments")
            .json_body(json!({
                "attachments": [{
                    "account_id": "531fc3e28bfc43c5a2cea07786d93f5c",
                    "included_scope": {
                        "note": "My enterprise",
                        "scope_id": "282cf433ac91493ba860480d92519990",
                        "scope_type": "enterprise"
                    }
                }]
            }));
        then.status(201)
            .json_body(json!({"attachments": [attachment_json("rule-1", "attachment-1")]}));
    });
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/config/v1/rules/rule-1/attachments")
            .query_param("limit", "10");
        then.status(200).json_body(json!({
            "offset": 0,
            "limit": 10,
            "total_count": 1,
            "first": {"href": "/config/v1/rules/rule-1/attachments?limit=10"},
            "last": {"href": "/config/v1/rules/rule-1/attachments?limit=10"},
            "attachments": [attachment_json("rule-1", "attachment-1")]
        }));
    });
    let get = server.mock(|when, then| {
        when.method(GET)
            .path("/config/v1/rules/rule-1/attachments/attachment-1");
        then.status(200)
            .header("etag", "\"a1\"")
            .json_body(attachment_json("rule-1", "attachment-1"));
    });
    let update = server.mock(|when, then| {
        when.method(PUT)
            .path("/config/v1/rules/rule-1/attachments/attachment-1")
            .header("if-match", "\"a1\"");
        then.status(200)
            .json_body(attachment_json("rule-1", "attachment-1"));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE)
            .path("/config/v1/rules/rule-1/attachments/attachment-1");
        then.status(204);
    });

    let client = governance_client(&server);
    let scope = RuleScope::new("282cf433ac91493ba860480d92519990", ScopeType::Enterprise)
        .with_note("My enterprise");
    let request = AttachmentRequest::new("531fc3e28bfc43c5a2cea07786d93f5c", scope);

    let created = client
        .create_attachments(&CreateAttachmentsOptions::new("rule-1", vec![request.clone()]))
        .unwrap();
    assert_eq!(created.result.attachments[0].attachment_id, "attachment-1");

    let page = client
        .list_attachments(&ListAttachmentsOptions::new("rule-1").with_limit(10))
        .unwrap();
    assert_eq!(page.result.total_count, 1);
    assert_eq!(page.result.next_offset(), None);

    let current = client
        .get_attachment(&GetAttachmentOptions::new("rule-1", "attachment-1"))
        .unwrap();
    let excluded = current.result.excluded_scopes.clone().unwrap();
    assert_eq!(excluded[0].scope_type, ScopeType::EnterpriseAccountGroup);

    let etag = current.etag().unwrap().to_string();
    let updated = client
        .update_attachment(&UpdateAttachmentOptions::new(
            "rule-1",
            "attachment-1",
            etag,
            request.with_excluded_scopes(excluded),
        ))
        .unwrap();
    assert_eq!(updated.result, current.result);

    client
        .delete_attachment(&DeleteAttachmentOptions::new("rule-1", "attachment-1"))
        .unwrap();

    create.assert();
    list.assert();
    get.assert();
    update.assert();
    delete.assert();
}

#[test]
fn test_sdk_headers_sent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/config/v1/rules/rule-1")
            .header(
                "x-ibmcloud-sdk-analytics",
                "service_name=configuration_governance;service_version=V1;operation_id=get_rule",
            )
            .header(
                "user-agent",
                format!("platform-services-rust-sdk/{}", env!("CARGO_PKG_VERSION")),
            )
            .header("x-custom", "per-call");
        then.status(200)
            .json_body(rule_json("rule-1", "Public access check"));
    });

    let client = governance_client(&server);
    client
        .get_rule(&GetRuleOptions::new("rule-1").with_header("X-Custom", "per-call"))
        .unwrap();
    mock.assert();
}

#[test]
fn test_malformed_and_mistyped_responses() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/config/v1/rules/broken");
        then.status(200)
            .header("content-type", "application/json")
            .body("{\"rule_id\": ");
    });
    server.mock(|when, then| {
        when.method(GET).path("/config/v1/rules/bad-tree");
        let mut rule = rule_json("bad-tree", "Bad tree");
        rule["required_config"] = json!({"and": [{"property": "x", "operator": "is_true"}, {"or": [{"property": "y"}]}]});
        then.status(200).json_body(rule);
    });

    let client = governance_client(&server);

    let err = client.get_rule(&GetRuleOptions::new("broken")).unwrap_err();
    assert!(matches!(err, SdkError::MalformedInput(_)), "{:?}", err);

    let err = client.get_rule(&GetRuleOptions::new("bad-tree")).unwrap_err();
    match err {
        SdkError::Decode(e) => assert!(e.to_string().contains("and[1].or[0]"), "{}", e),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[test]
fn test_validation_without_network() {
    let server = MockServer::start();
    let client = governance_client(&server);

    let err = client
        .update_rule(&UpdateRuleOptions::new("rule-1", "", sample_rule_request("x")))
        .unwrap_err();
    assert!(matches!(err, SdkError::Validation(ref m) if m.contains("if_match")));

    let bad_rule = RuleRequest::new(
        "name",
        "desc",
        TargetResource::new("svc", "kind"),
        RuleRequiredConfig::or(vec![]),
        vec![EnforcementAction::new(Action::AuditLog)],
    );
    let err = client
        .create_rules(&CreateRulesOptions::new(vec![CreateRuleRequest::new(bad_rule)]))
        .unwrap_err();
    assert!(matches!(err, SdkError::Validation(ref m) if m.starts_with("rules[0]")));
}
