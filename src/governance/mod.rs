//! Configuration Governance v1: rules and their attachments to scopes

mod models;
mod options;

pub use models::*;
pub use options::*;

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;

use crate::service::{BaseService, DetailedResponse, Result, ServiceOptions};

pub const DEFAULT_SERVICE_URL: &str = "https://compliance.cloud.ibm.com";
pub const DEFAULT_SERVICE_NAME: &str = "configuration_governance";

#[derive(Debug, Clone)]
pub struct ConfigurationGovernanceV1 {
    service: BaseService,
}

#[derive(Serialize)]
struct CreateRulesBody<'a> {
    rules: &'a [CreateRuleRequest],
}

#[derive(Serialize)]
struct CreateAttachmentsBody<'a> {
    attachments: &'a [AttachmentRequest],
}

impl ConfigurationGovernanceV1 {
    /// build a client; the default service URL is used when `options.url` is unset
    pub fn new(mut options: ServiceOptions) -> Result<Self> {
        if options.url.is_none() {
            options.url = Some(DEFAULT_SERVICE_URL.to_string());
        }
        Ok(Self {
            service: BaseService::new(DEFAULT_SERVICE_NAME, options)?,
        })
    }

    pub fn service(&self) -> &BaseService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut BaseService {
        &mut self.service
    }

    pub fn service_url(&self) -> &str {
        self.service.service_url()
    }

    pub fn set_service_url(&mut self, url: &str) -> Result<()> {
        self.service.set_service_url(url)
    }

    pub fn set_default_headers(&mut self, headers: HashMap<String, String>) {
        self.service.set_default_headers(headers);
    }

    pub fn set_enable_gzip_compression(&mut self, enable: bool) {
        self.service.set_enable_gzip_compression(enable);
    }

    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.service.enable_retries(max_retries, max_interval);
    }

    pub fn disable_retries(&mut self) {
        self.service.disable_retries();
    }

    /// create up to 20 rules in one call
    ///
    /// a 207 status means some entries failed; check each
    /// [`CreateRuleResponse::is_success`] in the result.
    pub fn create_rules(
        &self,
        options: &CreateRulesOptions,
    ) -> Result<DetailedResponse<CreateRulesResponse>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::POST, "/config/v1/rules", "create_rules")
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(&CreateRulesBody {
                rules: &options.rules,
            })?
            .build()?;
        self.service.request(req)
    }

    pub fn list_rules(&self, options: &ListRulesOptions) -> Result<DetailedResponse<RuleList>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::GET, "/config/v1/rules", "list_rules")
            .query("account_id", &options.account_id)
            .query_opt("attached", options.attached)
            .query_opt("labels", options.labels.as_deref())
            .query_opt("scopes", options.scopes.as_deref())
            .query_opt("limit", options.limit)
            .query_opt("offset", options.offset)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request(req)
    }

    pub fn get_rule(&self, options: &GetRuleOptions) -> Result<DetailedResponse<Rule>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::GET, "/config/v1/rules/{rule_id}", "get_rule")
            .path_param("rule_id", &options.rule_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request(req)
    }

    pub fn update_rule(&self, options: &UpdateRuleOptions) -> Result<DetailedResponse<Rule>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::PUT, "/config/v1/rules/{rule_id}", "update_rule")
            .path_param("rule_id", &options.rule_id)
            .header("If-Match", options.if_match.as_str())
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(&options.rule)?
            .build()?;
        self.service.request(req)
    }

    pub fn delete_rule(&self, options: &DeleteRuleOptions) -> Result<DetailedResponse<()>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::DELETE, "/config/v1/rules/{rule_id}", "delete_rule")
            .path_param("rule_id", &options.rule_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request_no_content(req)
    }

    pub fn create_attachments(
        &self,
        options: &CreateAttachmentsOptions,
    ) -> Result<DetailedResponse<CreateAttachmentsResponse>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(
                Method::POST,
                "/config/v1/rules/{rule_id}/attachments",
                "create_attachments",
            )
            .path_param("rule_id", &options.rule_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(&CreateAttachmentsBody {
                attachments: &options.attachments,
            })?
            .build()?;
        self.service.request(req)
    }

    pub fn list_attachments(
        &self,
        options: &ListAttachmentsOptions,
    ) -> Result<DetailedResponse<AttachmentList>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(
                Method::GET,
                "/config/v1/rules/{rule_id}/attachments",
                "list_attachments",
            )
            .path_param("rule_id", &options.rule_id)
            .query_opt("limit", options.limit)
            .query_opt("offset", options.offset)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request(req)
    }

    pub fn get_attachment(
        &self,
        options: &GetAttachmentOptions,
    ) -> Result<DetailedResponse<Attachment>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::GET, ATTACHMENT_PATH, "get_attachment")
            .path_param("rule_id", &options.rule_id)
            .path_param("attachment_id", &options.attachment_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request(req)
    }

    pub fn update_attachment(
        &self,
        options: &UpdateAttachmentOptions,
    ) -> Result<DetailedResponse<Attachment>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::PUT, ATTACHMENT_PATH, "update_attachment")
            .path_param("rule_id", &options.rule_id)
            .path_param("attachment_id", &options.attachment_id)
            .header("If-Match", options.if_match.as_str())
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(&options.attachment)?
            .build()?;
        self.service.request(req)
    }

    pub fn delete_attachment(
        &self,
        options: &DeleteAttachmentOptions,
    ) -> Result<DetailedResponse<()>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::DELETE, ATTACHMENT_PATH, "delete_attachment")
            .path_param("rule_id", &options.rule_id)
            .path_param("attachment_id", &options.attachment_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request_no_content(req)
    }
}

const ATTACHMENT_PATH: &str = "/config/v1/rules/{rule_id}/attachments/{attachment_id}";
