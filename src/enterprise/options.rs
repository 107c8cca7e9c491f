use std::collections::HashMap;

use serde::Serialize;

use crate::service::{Result, SdkError};

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateEnterpriseOptions {
    /// account that becomes the enterprise account
    pub source_account_id: String,
    pub name: String,
    pub primary_contact_iam_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl CreateEnterpriseOptions {
    pub fn new(
        source_account_id: impl Into<String>,
        name: impl Into<String>,
        primary_contact_iam_id: impl Into<String>,
    ) -> Self {
        Self {
            source_account_id: source_account_id.into(),
            name: name.into(),
            primary_contact_iam_id: primary_contact_iam_id.into(),
            ..Default::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.source_account_id, "source_account_id");
        require!(self.name, "name");
        require!(self.primary_contact_iam_id, "primary_contact_iam_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListEnterprisesOptions {
    pub enterprise_account_id: Option<String>,
    pub account_group_id: Option<String>,
    pub account_id: Option<String>,
    pub next_docid: Option<String>,
    pub limit: Option<i64>,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl ListEnterprisesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enterprise_account_id(mut self, id: impl Into<String>) -> Self {
        self.enterprise_account_id = Some(id.into());
        self
    }

    pub fn with_account_group_id(mut self, id: impl Into<String>) -> Self {
        self.account_group_id = Some(id.into());
        self
    }

    pub fn with_account_id(mut self, id: impl Into<String>) -> Self {
        self.account_id = Some(id.into());
        self
    }

    pub fn with_next_docid(mut self, next_docid: impl Into<String>) -> Self {
        self.next_docid = Some(next_docid.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_limit(self.limit)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetEnterpriseOptions {
    pub enterprise_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl GetEnterpriseOptions {
    pub fn new(enterprise_id: impl Into<String>) -> Self {
        Self {
            enterprise_id: enterprise_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.enterprise_id, "enterprise_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateEnterpriseOptions {
    #[serde(skip)]
    pub enterprise_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_contact_iam_id: Option<String>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl UpdateEnterpriseOptions {
    pub fn new(enterprise_id: impl Into<String>) -> Self {
        Self {
            enterprise_id: enterprise_id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_primary_contact_iam_id(mut self, iam_id: impl Into<String>) -> Self {
        self.primary_contact_iam_id = Some(iam_id.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.enterprise_id, "enterprise_id");
        Ok(())
    }
}

/// move a standalone account into an enterprise
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportAccountToEnterpriseOptions {
    #[serde(skip)]
    pub enterprise_id: String,
    #[serde(skip)]
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_unit_id: Option<String>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl ImportAccountToEnterpriseOptions {
    pub fn new(enterprise_id: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            enterprise_id: enterprise_id.into(),
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_billing_unit_id(mut self, billing_unit_id: impl Into<String>) -> Self {
        self.billing_unit_id = Some(billing_unit_id.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.enterprise_id, "enterprise_id");
        require!(self.account_id, "account_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateAccountOptions {
    /// CRN of the parent enterprise or account group
    pub parent: String,
    pub name: String,
    pub owner_iam_id: String,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl CreateAccountOptions {
    pub fn new(
        parent: impl Into<String>,
        name: impl Into<String>,
        owner_iam_id: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            name: name.into(),
            owner_iam_id: owner_iam_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.parent, "parent");
        require!(self.name, "name");
        require!(self.owner_iam_id, "owner_iam_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListAccountsOptions {
    pub enterprise_id: Option<String>,
    pub account_group_id: Option<String>,
    pub next_docid: Option<String>,
    pub parent: Option<String>,
    pub limit: Option<i64>,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl ListAccountsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enterprise_id(mut self, id: impl Into<String>) -> Self {
        self.enterprise_id = Some(id.into());
        self
    }

    pub fn with_account_group_id(mut self, id: impl Into<String>) -> Self {
        self.account_group_id = Some(id.into());
        self
    }

    pub fn with_next_docid(mut self, next_docid: impl Into<String>) -> Self {
        self.next_docid = Some(next_docid.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_limit(self.limit)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetAccountOptions {
    pub account_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl GetAccountOptions {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.account_id, "account_id");
        Ok(())
    }
}

/// move an account under a different parent
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAccountOptions {
    #[serde(skip)]
    pub account_id: String,
    pub parent: String,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl UpdateAccountOptions {
    pub fn new(account_id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            parent: parent.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.account_id, "account_id");
        require!(self.parent, "parent");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateAccountGroupOptions {
    pub parent: String,
    pub name: String,
    pub primary_contact_iam_id: String,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl CreateAccountGroupOptions {
    pub fn new(
        parent: impl Into<String>,
        name: impl Into<String>,
        primary_contact_iam_id: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            name: name.into(),
            primary_contact_iam_id: primary_contact_iam_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.parent, "parent");
        require!(self.name, "name");
        require!(self.primary_contact_iam_id, "primary_contact_iam_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListAccountGroupsOptions {
    pub enterprise_id: Option<String>,
    pub parent_account_group_id: Option<String>,
    pub next_docid: Option<String>,
    pub parent: Option<String>,
    pub limit: Option<i64>,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl ListAccountGroupsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enterprise_id(mut self, id: impl Into<String>) -> Self {
        self.enterprise_id = Some(id.into());
        self
    }

    pub fn with_parent_account_group_id(mut self, id: impl Into<String>) -> Self {
        self.parent_account_group_id = Some(id.into());
        self
    }

    pub fn with_next_docid(mut self, next_docid: impl Into<String>) -> Self {
        self.next_docid = Some(next_docid.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_limit(self.limit)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetAccountGroupOptions {
    pub account_group_id: String,
    pub transaction_id: Option<String>,
    pub headers: HashMap<String, String>,
}

impl GetAccountGroupOptions {
    pub fn new(account_group_id: impl Into<String>) -> Self {
        Self {
            account_group_id: account_group_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.account_group_id, "account_group_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAccountGroupOptions {
    #[serde(skip)]
    pub account_group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_contact_iam_id: Option<String>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl UpdateAccountGroupOptions {
    pub fn new(account_group_id: impl Into<String>) -> Self {
        Self {
            account_group_id: account_group_id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_primary_contact_iam_id(mut self, iam_id: impl Into<String>) -> Self {
        self.primary_contact_iam_id = Some(iam_id.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.account_group_id, "account_group_id");
        Ok(())
    }
}

/// ask which IAM actions the caller may perform on an enterprise
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetEnterprisePermissibleActionsOptions {
    #[serde(skip)]
    pub enterprise_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl GetEnterprisePermissibleActionsOptions {
    pub fn new(enterprise_id: impl Into<String>) -> Self {
        Self {
            enterprise_id: enterprise_id.into(),
            ..Default::default()
        }
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.enterprise_id, "enterprise_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetAccountPermissibleActionsOptions {
    #[serde(skip)]
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl GetAccountPermissibleActionsOptions {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.account_id, "account_id");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetAccountGroupPermissibleActionsOptions {
    #[serde(skip)]
    pub account_group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(skip)]
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl GetAccountGroupPermissibleActionsOptions {
    pub fn new(account_group_id: impl Into<String>) -> Self {
        Self {
            account_group_id: account_group_id.into(),
            ..Default::default()
        }
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require!(self.account_group_id, "account_group_id");
        Ok(())
    }
}

// the service caps page size at 100
fn validate_limit(limit: Option<i64>) -> Result<()> {
    match limit {
        Some(limit) if !(1..=100).contains(&limit) => Err(SdkError::Validation(format!(
            "limit must be between 1 and 100, got {}",
            limit
        ))),
        _ => Ok(()),
    }
}

call_options!(
    CreateEnterpriseOptions,
    ListEnterprisesOptions,
    GetEnterpriseOptions,
    UpdateEnterpriseOptions,
    ImportAccountToEnterpriseOptions,
    CreateAccountOptions,
    ListAccountsOptions,
    GetAccountOptions,
    UpdateAccountOptions,
    CreateAccountGroupOptions,
    ListAccountGroupsOptions,
    GetAccountGroupOptions,
    UpdateAccountGroupOptions,
    GetEnterprisePermissibleActionsOptions,
    GetAccountPermissibleActionsOptions,
    GetAccountGroupPermissibleActionsOptions,
);
