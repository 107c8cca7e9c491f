use super::models::{
    ListAccountGroupsResponse, ListAccountsResponse, ListEnterprisesResponse, ListPage,
};
use super::options::{ListAccountGroupsOptions, ListAccountsOptions, ListEnterprisesOptions};
use super::EnterpriseManagementV1;
use crate::service::{Result, SdkError};

/// list options that can be driven page by page through `next_docid`
pub trait PagedOptions: Clone {
    type Page: ListPage;

    fn next_docid(&self) -> Option<&str>;

    fn set_next_docid(&mut self, next_docid: Option<String>);

    fn fetch(&self, client: &EnterpriseManagementV1) -> Result<Self::Page>;
}

impl PagedOptions for ListEnterprisesOptions {
    type Page = ListEnterprisesResponse;

    fn next_docid(&self) -> Option<&str> {
        self.next_docid.as_deref()
    }

    fn set_next_docid(&mut self, next_docid: Option<String>) {
        self.next_docid = next_docid;
    }

    fn fetch(&self, client: &EnterpriseManagementV1) -> Result<Self::Page> {
        client.list_enterprises(self).map(|r| r.result)
    }
}

impl PagedOptions for ListAccountsOptions {
    type Page = ListAccountsResponse;

    fn next_docid(&self) -> Option<&str> {
        self.next_docid.as_deref()
    }

    fn set_next_docid(&mut self, next_docid: Option<String>) {
        self.next_docid = next_docid;
    }

    fn fetch(&self, client: &EnterpriseManagementV1) -> Result<Self::Page> {
        client.list_accounts(self).map(|r| r.result)
    }
}

impl PagedOptions for ListAccountGroupsOptions {
    type Page = ListAccountGroupsResponse;

    fn next_docid(&self) -> Option<&str> {
        self.next_docid.as_deref()
    }

    fn set_next_docid(&mut self, next_docid: Option<String>) {
        self.next_docid = next_docid;
    }

    fn fetch(&self, client: &EnterpriseManagementV1) -> Result<Self::Page> {
        client.list_account_groups(self).map(|r| r.result)
    }
}

/// walks a list operation one page at a time
pub struct Pager<O: PagedOptions> {
    client: EnterpriseManagementV1,
    options: O,
    has_next: bool,
}

pub type EnterprisesPager = Pager<ListEnterprisesOptions>;
pub type AccountsPager = Pager<ListAccountsOptions>;
pub type AccountGroupsPager = Pager<ListAccountGroupsOptions>;

impl<O: PagedOptions> Pager<O> {
    /// the pager owns the `next_docid` token, so the options must not carry one
    pub fn new(client: &EnterpriseManagementV1, options: O) -> Result<Self> {
        if options.next_docid().is_some() {
            return Err(SdkError::validation(
                "next_docid must not be set on options passed to a pager",
            ));
        }
        Ok(Self {
            client: client.clone(),
            options,
            has_next: true,
        })
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    /// fetch the next page; returns an empty list once exhausted
    pub fn get_next(&mut self) -> Result<Vec<<O::Page as ListPage>::Item>> {
        if !self.has_next {
            return Ok(Vec::new());
        }

        let page = self.options.fetch(&self.client)?;
        let next = page.next_docid()?;
        log::debug!("fetched page, next_docid={:?}", next);

        self.has_next = next.is_some();
        self.options.set_next_docid(next);
        Ok(page.into_resources())
    }

    /// fetch every remaining page
    pub fn get_all(&mut self) -> Result<Vec<<O::Page as ListPage>::Item>> {
        let mut all = Vec::new();
        while self.has_next {
            all.extend(self.get_next()?);
        }
        Ok(all)
    }
}
