use std::collections::HashMap;

use reqwest::Method;
use serde::Serialize;

use super::error::{Result, SdkError};

/// a request ready to be sent by [`super::BaseService`]
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub operation_id: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// builds a [`PreparedRequest`] from a path template such as `/rules/{rule_id}`
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    base_url: String,
    path: String,
    path_params: Vec<(String, String)>,
    operation_id: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    pub fn new(method: Method, base_url: &str, path: &str) -> Self {
        Self {
            method,
            base_url: base_url.trim_end_matches('/').to_string(),
            path: path.to_string(),
            path_params: Vec::new(),
            operation_id: String::new(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn operation(mut self, operation_id: &str) -> Self {
        self.operation_id = operation_id.to_string();
        self
    }

    pub fn path_param(mut self, name: &str, value: &str) -> Self {
        self.path_params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query_opt<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn header_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.header(name, value),
            None => self,
        }
    }

    /// per-call headers; applied after everything else so they win
    pub fn headers(mut self, headers: &HashMap<String, String>) -> Self {
        let mut extra: Vec<_> = headers.iter().collect();
        extra.sort();
        for (name, value) in extra {
            self.headers.push((name.clone(), value.clone()));
        }
        self
    }

    pub fn json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| SdkError::validation(format!("failed to encode request body: {}", e)))?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn build(self) -> Result<PreparedRequest> {
        let path = resolve_path(&self.path, &self.path_params)?;
        Ok(PreparedRequest {
            method: self.method,
            url: format!("{}{}", self.base_url, path),
            operation_id: self.operation_id,
            query: self.query,
            headers: self.headers,
            body: self.body,
        })
    }
}

/// substitute `{name}` segments, percent-encoding each value
fn resolve_path(template: &str, params: &[(String, String)]) -> Result<String> {
    let mut path = template.to_string();
    for (name, value) in params {
        if value.is_empty() {
            return Err(SdkError::validation(format!(
                "path parameter '{}' cannot be empty",
                name
            )));
        }
        let placeholder = format!("{{{}}}", name);
        if !path.contains(&placeholder) {
            return Err(SdkError::validation(format!(
                "path template '{}' has no parameter '{}'",
                template, name
            )));
        }
        path = path.replace(&placeholder, &urlencoding::encode(value));
    }

    if let Some(start) = path.find('{') {
        let rest = &path[start..];
        let end = rest.find('}').map(|i| i + 1).unwrap_or(rest.len());
        return Err(SdkError::validation(format!(
            "missing path parameter {}",
            &rest[..end]
        )));
    }

    Ok(path)
}
