use std::collections::HashMap;

use super::models::{AttachmentRequest, CreateRuleRequest, RuleRequest};
use crate::service::{Result, SdkError};

#[derive(Debug, Clone)]
pub struct CreateRulesOptions {
    pub rules: Vec<CreateRuleRequest>,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl CreateRulesOptions {
    pub fn new(rules: Vec<CreateRuleRequest>) -> Self {
        Self {
            rules,
            transaction_id: None,
            headers: HashMap::new(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(SdkError::validation("rules cannot be empty"));
        }
        for (i, entry) in self.rules.iter().enumerate() {
            entry
                .rule
                .validate()
                .map_err(|e| SdkError::Validation(format!("rules[{}]: {}", i, e)))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListRulesOptions {
    pub account_id: String,
    pub attached: Option<bool>,
    /// comma separated
    pub labels: Option<String>,
    /// comma separated scope ids
    pub scopes: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl ListRulesOptions {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    pub fn with_attached(mut self, attached: bool) -> Self {
        self.attached = Some(attached);
        self
    }

    pub fn with_labels(mut self, labels: impl Into<String>) -> Self {
        self.labels = Some(labels.into());
        self
    }

    pub fn with_scopes(mut self, scopes: impl Into<String>) -> Self {
        self.scopes = Some(scopes.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.account_id, "account_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetRuleOptions {
    pub rule_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl GetRuleOptions {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.rule_id, "rule_id");
        Ok(())
    }
}

/// replaces a rule; `if_match` must carry the Etag from the last read
#[derive(Debug, Clone)]
pub struct UpdateRuleOptions {
    pub rule_id: String,
    pub if_match: String,
    pub rule: RuleRequest,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl UpdateRuleOptions {
    pub fn new(rule_id: impl Into<String>, if_match: impl Into<String>, rule: RuleRequest) -> Self {
        Self {
            rule_id: rule_id.into(),
            if_match: if_match.into(),
            rule,
            transaction_id: None,
            headers: HashMap::new(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.rule_id, "rule_id");
        require!(self.if_match, "if_match");
        self.rule.validate().map_err(SdkError::Validation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteRuleOptions {
    pub rule_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl DeleteRuleOptions {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.rule_id, "rule_id");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CreateAttachmentsOptions {
    pub rule_id: String,
    pub attachments: Vec<AttachmentRequest>,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl CreateAttachmentsOptions {
    pub fn new(rule_id: impl Into<String>, attachments: Vec<AttachmentRequest>) -> Self {
        Self {
            rule_id: rule_id.into(),
            attachments,
            transaction_id: None,
            headers: HashMap::new(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.rule_id, "rule_id");
        if self.attachments.is_empty() {
            return Err(SdkError::validation("attachments cannot be empty"));
        }
        for (i, attachment) in self.attachments.iter().enumerate() {
            if attachment.account_id.trim().is_empty() {
                return Err(SdkError::Validation(format!(
                    "attachments[{}]: account_id cannot be empty",
                    i
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListAttachmentsOptions {
    pub rule_id: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl ListAttachmentsOptions {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.rule_id, "rule_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetAttachmentOptions {
    pub rule_id: String,
    pub attachment_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl GetAttachmentOptions {
    pub fn new(rule_id: impl Into<String>, attachment_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            attachment_id: attachment_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.rule_id, "rule_id");
        require!(self.attachment_id, "attachment_id");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct UpdateAttachmentOptions {
    pub rule_id: String,
    pub attachment_id: String,
    pub if_match: String,
    pub attachment: AttachmentRequest,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl UpdateAttachmentOptions {
    pub fn new(
        rule_id: impl Into<String>,
        attachment_id: impl Into<String>,
        if_match: impl Into<String>,
        attachment: AttachmentRequest,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            attachment_id: attachment_id.into(),
            if_match: if_match.into(),
            attachment,
            transaction_id: None,
            headers: HashMap::new(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.rule_id, "rule_id");
        require!(self.attachment_id, "attachment_id");
        require!(self.if_match, "if_match");
        require!(self.attachment.account_id, "account_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeleteAttachmentOptions {
    pub rule_id: String,
    pub attachment_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl DeleteAttachmentOptions {
    pub fn new(rule_id: impl Into<String>, attachment_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            attachment_id: attachment_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.rule_id, "rule_id");
        require!(self.attachment_id, "attachment_id");
        Ok(())
    }
}

call_options!(
    CreateRulesOptions,
    ListRulesOptions,
    GetRuleOptions,
    UpdateRuleOptions,
    DeleteRuleOptions,
    CreateAttachmentsOptions,
    ListAttachmentsOptions,
    GetAttachmentOptions,
    UpdateAttachmentOptions,
    DeleteAttachmentOptions,
);
