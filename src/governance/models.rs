use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conditions::{Operator, RuleRequiredConfig};
use crate::service::datetime;

/// string enum that keeps unknown values instead of failing to decode
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($wire => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok($name::from(s.as_str()))
            }
        }
    };
}

string_enum!(
    /// what the service does when a resource violates a rule
    Action {
        Disallow => "disallow",
        AuditLog => "audit_log",
    }
);

string_enum!(RuleType {
    UserDefined => "user_defined",
});

string_enum!(ScopeType {
    Enterprise => "enterprise",
    EnterpriseAccountGroup => "enterprise.account_group",
    EnterpriseAccount => "enterprise.account",
    Account => "account",
    AccountResourceGroup => "account.resource_group",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcementAction {
    pub action: Action,
}

impl EnforcementAction {
    pub fn new(action: Action) -> Self {
        Self { action }
    }
}

/// extra attribute a target resource must match, e.g. `resource_id string_equals x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTargetAttribute {
    pub name: String,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RuleTargetAttribute {
    pub fn new(name: impl Into<String>, operator: Operator) -> Self {
        Self {
            name: name.into(),
            operator,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetResource {
    pub service_name: String,
    pub resource_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_target_attributes: Option<Vec<RuleTargetAttribute>>,
}

impl TargetResource {
    pub fn new(service_name: impl Into<String>, resource_kind: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            resource_kind: resource_kind.into(),
            additional_target_attributes: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<RuleTargetAttribute>) -> Self {
        self.additional_target_attributes = Some(attributes);
        self
    }
}

/// a rule as submitted for creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    pub target: TargetResource,
    pub required_config: RuleRequiredConfig,
    pub enforcement_actions: Vec<EnforcementAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl RuleRequest {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        target: TargetResource,
        required_config: RuleRequiredConfig,
        enforcement_actions: Vec<EnforcementAction>,
    ) -> Self {
        Self {
            account_id: None,
            name: name.into(),
            description: description.into(),
            rule_type: None,
            target,
            required_config,
            enforcement_actions,
            labels: None,
        }
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_rule_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = Some(rule_type);
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("rule name cannot be empty".into());
        }
        if self.enforcement_actions.is_empty() {
            return Err("rule needs at least one enforcement action".into());
        }
        self.required_config
            .validate()
            .map_err(|e| format!("required_config: {}", e))
    }
}

/// a rule as stored by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    pub target: TargetResource,
    pub required_config: RuleRequiredConfig,
    pub enforcement_actions: Vec<EnforcementAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(default, with = "datetime::option", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, with = "datetime::option", skip_serializing_if = "Option::is_none")]
    pub modification_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_attachments: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRuleRequest {
    /// client-chosen id echoed back in the matching response entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub rule: RuleRequest,
}

impl CreateRuleRequest {
    pub fn new(rule: RuleRequest) -> Self {
        Self {
            request_id: None,
            rule,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResponseError {
    pub code: String,
    pub message: String,
}

/// outcome of one entry in a batch create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRuleResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<RuleResponseError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl CreateRuleResponse {
    pub fn is_success(&self) -> bool {
        matches!(self.status_code, Some(code) if (200..300).contains(&code))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRulesResponse {
    pub rules: Vec<CreateRuleResponse>,
}

impl CreateRulesResponse {
    /// entries the service could not create
    pub fn failures(&self) -> impl Iterator<Item = &CreateRuleResponse> {
        self.rules.iter().filter(|r| !r.is_success())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub scope_id: String,
    pub scope_type: ScopeType,
}

impl RuleScope {
    pub fn new(scope_id: impl Into<String>, scope_type: ScopeType) -> Self {
        Self {
            note: None,
            scope_id: scope_id.into(),
            scope_type,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRequest {
    pub account_id: String,
    pub included_scope: RuleScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_scopes: Option<Vec<RuleScope>>,
}

impl AttachmentRequest {
    pub fn new(account_id: impl Into<String>, included_scope: RuleScope) -> Self {
        Self {
            account_id: account_id.into(),
            included_scope,
            excluded_scopes: None,
        }
    }

    pub fn with_excluded_scopes(mut self, scopes: Vec<RuleScope>) -> Self {
        self.excluded_scopes = Some(scopes);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub attachment_id: String,
    pub rule_id: String,
    pub account_id: String,
    pub included_scope: RuleScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_scopes: Option<Vec<RuleScope>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAttachmentsResponse {
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleList {
    pub offset: i64,
    pub limit: i64,
    pub total_count: i64,
    pub first: Link,
    pub last: Link,
    pub rules: Vec<Rule>,
}

impl RuleList {
    pub fn next_offset(&self) -> Option<i64> {
        next_offset(self.offset, self.limit, self.total_count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentList {
    pub offset: i64,
    pub limit: i64,
    pub total_count: i64,
    pub first: Link,
    pub last: Link,
    pub attachments: Vec<Attachment>,
}

impl AttachmentList {
    pub fn next_offset(&self) -> Option<i64> {
        next_offset(self.offset, self.limit, self.total_count)
    }
}

fn next_offset(offset: i64, limit: i64, total_count: i64) -> Option<i64> {
    let next = offset.checked_add(limit)?;
    (limit > 0 && next < total_count).then_some(next)
}
