//! Enterprise Management v1: enterprises, account groups and accounts

mod models;
mod options;
mod pager;

pub use models::*;
pub use options::*;
pub use pager::{AccountGroupsPager, AccountsPager, EnterprisesPager, PagedOptions, Pager};

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Method;

use crate::service::{BaseService, DetailedResponse, Result, ServiceOptions};

pub const DEFAULT_SERVICE_URL: &str = "https://enterprise.cloud.ibm.com/v1";
pub const DEFAULT_SERVICE_NAME: &str = "enterprise_management";

#[derive(Debug, Clone)]
pub struct EnterpriseManagementV1 {
    service: BaseService,
}

impl EnterpriseManagementV1 {
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

    pub fn create_enterprise(
        &self,
        options: &CreateEnterpriseOptions,
    ) -> Result<DetailedResponse<CreateEnterpriseResponse>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::POST, "/enterprises", "create_enterprise")
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(options)?
            .build()?;
        self.service.request(req)
    }

    pub fn list_enterprises(
        &self,
        options: &ListEnterprisesOptions,
    ) -> Result<DetailedResponse<ListEnterprisesResponse>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::GET, "/enterprises", "list_enterprises")
            .query_opt("enterprise_account_id", options.enterprise_account_id.as_deref())
            .query_opt("account_group_id", options.account_group_id.as_deref())
            .query_opt("account_id", options.account_id.as_deref())
            .query_opt("next_docid", options.next_docid.as_deref())
            .query_opt("limit", options.limit)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request(req)
    }

    pub fn get_enterprise(
        &self,
        options: &GetEnterpriseOptions,
    ) -> Result<DetailedResponse<Enterprise>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::GET, "/enterprises/{enterprise_id}", "get_enterprise")
            .path_param("enterprise_id", &options.enterprise_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request(req)
    }

    pub fn update_enterprise(
        &self,
        options: &UpdateEnterpriseOptions,
    ) -> Result<DetailedResponse<()>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(
                Method::PATCH,
                "/enterprises/{enterprise_id}",
                "update_enterprise",
            )
            .path_param("enterprise_id", &options.enterprise_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(options)?
            .build()?;
        self.service.request_no_content(req)
    }

    /// accepted asynchronously; the service answers 202
    pub fn import_account_to_enterprise(
        &self,
        options: &ImportAccountToEnterpriseOptions,
    ) -> Result<DetailedResponse<()>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(
                Method::PUT,
                "/enterprises/{enterprise_id}/import/accounts/{account_id}",
                "import_account_to_enterprise",
            )
            .path_param("enterprise_id", &options.enterprise_id)
            .path_param("account_id", &options.account_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(options)?
            .build()?;
        self.service.request_no_content(req)
    }

    pub fn create_account(
        &self,
        options: &CreateAccountOptions,
    ) -> Result<DetailedResponse<CreateAccountResponse>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::POST, "/accounts", "create_account")
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(options)?
            .build()?;
        self.service.request(req)
    }

    pub fn list_accounts(
        &self,
        options: &ListAccountsOptions,
    ) -> Result<DetailedResponse<ListAccountsResponse>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::GET, "/accounts", "list_accounts")
            .query_opt("enterprise_id", options.enterprise_id.as_deref())
            .query_opt("account_group_id", options.account_group_id.as_deref())
            .query_opt("next_docid", options.next_docid.as_deref())
            .query_opt("parent", options.parent.as_deref())
            .query_opt("limit", options.limit)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request(req)
    }

    pub fn get_account(&self, options: &GetAccountOptions) -> Result<DetailedResponse<Account>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::GET, "/accounts/{account_id}", "get_account")
            .path_param("account_id", &options.account_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request(req)
    }

    /// accepted asynchronously; the service answers 202
    pub fn update_account(&self, options: &UpdateAccountOptions) -> Result<DetailedResponse<()>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::PATCH, "/accounts/{account_id}", "update_account")
            .path_param("account_id", &options.account_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(options)?
            .build()?;
        self.service.request_no_content(req)
    }

    pub fn create_account_group(
        &self,
        options: &CreateAccountGroupOptions,
    ) -> Result<DetailedResponse<CreateAccountGroupResponse>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::POST, "/account-groups", "create_account_group")
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(options)?
            .build()?;
        self.service.request(req)
    }

    pub fn list_account_groups(
        &self,
        options: &ListAccountGroupsOptions,
    ) -> Result<DetailedResponse<ListAccountGroupsResponse>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(Method::GET, "/account-groups", "list_account_groups")
            .query_opt("enterprise_id", options.enterprise_id.as_deref())
            .query_opt(
                "parent_account_group_id",
                options.parent_account_group_id.as_deref(),
            )
            .query_opt("next_docid", options.next_docid.as_deref())
            .query_opt("parent", options.parent.as_deref())
            .query_opt("limit", options.limit)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request(req)
    }

    pub fn get_account_group(
        &self,
        options: &GetAccountGroupOptions,
    ) -> Result<DetailedResponse<AccountGroup>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(
                Method::GET,
                "/account-groups/{account_group_id}",
                "get_account_group",
            )
            .path_param("account_group_id", &options.account_group_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .build()?;
        self.service.request(req)
    }

    pub fn update_account_group(
        &self,
        options: &UpdateAccountGroupOptions,
    ) -> Result<DetailedResponse<()>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(
                Method::PATCH,
                "/account-groups/{account_group_id}",
                "update_account_group",
            )
            .path_param("account_group_id", &options.account_group_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(options)?
            .build()?;
        self.service.request_no_content(req)
    }

    /// checks the listed IAM actions against the caller's permissions
    pub fn get_enterprise_permissible_actions(
        &self,
        options: &GetEnterprisePermissibleActionsOptions,
    ) -> Result<DetailedResponse<()>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(
                Method::POST,
                "/enterprises/{enterprise_id}/permissible-actions",
                "get_enterprise_permissible_actions",
            )
            .path_param("enterprise_id", &options.enterprise_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(options)?
            .build()?;
        self.service.request_no_content(req)
    }

    pub fn get_account_permissible_actions(
        &self,
        options: &GetAccountPermissibleActionsOptions,
    ) -> Result<DetailedResponse<()>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(
                Method::POST,
                "/accounts/{account_id}/permissible-actions",
                "get_account_permissible_actions",
            )
            .path_param("account_id", &options.account_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(options)?
            .build()?;
        self.service.request_no_content(req)
    }

    pub fn get_account_group_permissible_actions(
        &self,
        options: &GetAccountGroupPermissibleActionsOptions,
    ) -> Result<DetailedResponse<()>> {
        options.validate()?;
        let req = self
            .service
            .request_builder(
                Method::POST,
                "/account-groups/{account_group_id}/permissible-actions",
                "get_account_group_permissible_actions",
            )
            .path_param("account_group_id", &options.account_group_id)
            .header_opt("Transaction-Id", options.transaction_id.as_deref())
            .headers(&options.headers)
            .json_body(options)?
            .build()?;
        self.service.request_no_content(req)
    }

    pub fn enterprises_pager(&self, options: ListEnterprisesOptions) -> Result<EnterprisesPager> {
        Pager::new(self, options)
    }

    pub fn accounts_pager(&self, options: ListAccountsOptions) -> Result<AccountsPager> {
        Pager::new(self, options)
    }

    pub fn account_groups_pager(
        &self,
        options: ListAccountGroupsOptions,
    ) -> Result<AccountGroupsPager> {
        Pager::new(self, options)
    }
}
