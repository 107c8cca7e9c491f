//! generic request pipeline shared by every service client
//!
//! a call flows through: options -> [`RequestBuilder`] -> [`BaseService::request`],
//! which authenticates, adds SDK headers, compresses the body, retries and decodes.

mod auth;
pub mod datetime;
mod error;
mod request;
mod retry;

pub use auth::{
    Authenticator, BasicAuthenticator, BearerTokenAuthenticator, IamAuthenticator,
    NoAuthAuthenticator, DEFAULT_IAM_URL,
};
pub use error::{Result, SdkError, ServiceErrorBody, ServiceErrorDetail};
pub use request::{PreparedRequest, RequestBuilder};
pub use retry::{parse_retry_after, RetryPolicy, DEFAULT_MAX_INTERVAL, DEFAULT_MAX_RETRIES};

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::version;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// construction options shared by all service clients
#[derive(Clone)]
pub struct ServiceOptions {
    pub url: Option<String>,
    pub authenticator: Arc<dyn Authenticator>,
    pub timeout: Duration,
    pub disable_ssl_verification: bool,
}

impl ServiceOptions {
    pub fn new(authenticator: impl Authenticator + 'static) -> Self {
        Self::with_shared_authenticator(Arc::new(authenticator))
    }

    pub fn with_shared_authenticator(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            url: None,
            authenticator,
            timeout: DEFAULT_TIMEOUT,
            disable_ssl_verification: false,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_disable_ssl_verification(mut self, disable: bool) -> Self {
        self.disable_ssl_verification = disable;
        self
    }
}

impl std::fmt::Debug for ServiceOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceOptions")
            .field("url", &self.url)
            .field("authenticator", &self.authenticator.authentication_type())
            .field("timeout", &self.timeout)
            .field("disable_ssl_verification", &self.disable_ssl_verification)
            .finish()
    }
}

/// a successful response: status, headers and the decoded body
#[derive(Debug, Clone)]
pub struct DetailedResponse<T> {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub result: T,
}

impl<T> DetailedResponse<T> {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// the `Etag` header, to be sent back as `If-Match` on updates
    pub fn etag(&self) -> Option<&str> {
        self.header("etag")
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DetailedResponse<U> {
        DetailedResponse {
            status_code: self.status_code,
            headers: self.headers,
            result: f(self.result),
        }
    }
}

#[derive(Debug)]
struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

#[derive(Clone)]
pub struct BaseService {
    service_name: String,
    url: String,
    authenticator: Arc<dyn Authenticator>,
    default_headers: HashMap<String, String>,
    gzip: bool,
    retry: Option<RetryPolicy>,
    client: reqwest::blocking::Client,
}

impl BaseService {
    pub fn new(service_name: &str, options: ServiceOptions) -> Result<Self> {
        options.authenticator.validate()?;

        let client = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.disable_ssl_verification)
            .build()?;

        let mut service = Self {
            service_name: service_name.to_string(),
            url: String::new(),
            authenticator: options.authenticator,
            default_headers: HashMap::new(),
            gzip: false,
            retry: None,
            client,
        };
        let url = options
            .url
            .ok_or_else(|| SdkError::validation("service URL is required"))?;
        service.set_service_url(&url)?;
        Ok(service)
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn service_url(&self) -> &str {
        &self.url
    }

    pub fn set_service_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(SdkError::validation("service URL cannot be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SdkError::validation(format!(
                "service URL must be an absolute http(s) URL: {}",
                url
            )));
        }
        if url.starts_with('{') || url.ends_with('}') || url.contains('"') {
            return Err(SdkError::validation(format!(
                "service URL contains invalid characters: {}",
                url
            )));
        }
        self.url = url.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    pub fn set_default_headers(&mut self, headers: HashMap<String, String>) {
        self.default_headers = headers;
    }

    pub fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    pub fn set_enable_gzip_compression(&mut self, enable: bool) {
        self.gzip = enable;
    }

    pub fn enable_gzip_compression(&self) -> bool {
        self.gzip
    }

    /// zero for either argument selects its default (4 retries, 30 seconds)
    pub fn enable_retries(&mut self, max_retries: u32, max_interval: Duration) {
        self.retry = Some(RetryPolicy::new(max_retries, max_interval));
    }

    pub fn disable_retries(&mut self) {
        self.retry = None;
    }

    pub fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref()
    }

    /// start a request against this service's URL
    pub fn request_builder(&self, method: Method, path: &str, operation_id: &str) -> RequestBuilder {
        RequestBuilder::new(method, &self.url, path).operation(operation_id)
    }

    /// send a request and decode its JSON body
    pub fn request<T: DeserializeOwned>(&self, req: PreparedRequest) -> Result<DetailedResponse<T>> {
        let raw = self.execute(&req)?;
        let result = serde_json::from_slice(&raw.body)?;
        Ok(DetailedResponse {
            status_code: raw.status.as_u16(),
            headers: raw.headers,
            result,
        })
    }

    /// send a request whose response carries no body
    pub fn request_no_content(&self, req: PreparedRequest) -> Result<DetailedResponse<()>> {
        let raw = self.execute(&req)?;
        Ok(DetailedResponse {
            status_code: raw.status.as_u16(),
            headers: raw.headers,
            result: (),
        })
    }

    fn execute(&self, req: &PreparedRequest) -> Result<RawResponse> {
        let headers = self.build_headers(req)?;
        let body = match &req.body {
            Some(bytes) if self.gzip => Some(gzip(bytes)?),
            Some(bytes) => Some(bytes.clone()),
            None => None,
        };

        let mut attempt: u32 = 0;
        loop {
            log::debug!(
                "{} {} ({}, attempt {})",
                req.method,
                req.url,
                req.operation_id,
                attempt + 1
            );

            let mut http = self
                .client
                .request(req.method.clone(), &req.url)
                .headers(headers.clone());
            if !req.query.is_empty() {
                http = http.query(&req.query);
            }
            if let Some(body) = &body {
                http = http.body(body.clone());
            }
            let http = self.authenticator.authenticate(http)?;

            let retry = self.retry.filter(|policy| attempt < policy.max_retries);

            let response = match http.send() {
                Ok(response) => response,
                Err(err) => {
                    if let Some(policy) = retry {
                        if policy.should_retry_transport(&req.method) {
                            let delay = policy.delay(attempt, None);
                            log::warn!(
                                "{} {} failed: {}; retrying in {:?}",
                                req.method,
                                req.url,
                                err,
                                delay
                            );
                            std::thread::sleep(delay);
                            attempt += 1;
                            continue;
                        }
                    }
                    return Err(err.into());
                }
            };

            let status = response.status();
            if let Some(policy) = retry {
                if policy.should_retry_status(&req.method, status.as_u16()) {
                    let retry_after = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(parse_retry_after);
                    let delay = policy.delay(attempt, retry_after);
                    log::warn!(
                        "{} {} returned {}; retrying in {:?}",
                        req.method,
                        req.url,
                        status.as_u16(),
                        delay
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                    continue;
                }
            }

            let headers = response.headers().clone();
            let body = response.bytes()?.to_vec();

            if !status.is_success() {
                log::debug!("{} {} returned {}", req.method, req.url, status.as_u16());
                return Err(SdkError::from_response(status, &body));
            }

            return Ok(RawResponse {
                status,
                headers,
                body,
            });
        }
    }

    // later inserts replace earlier ones: sdk headers, default headers, per-call headers
    fn build_headers(&self, req: &PreparedRequest) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        insert_header(&mut map, "User-Agent", &version::user_agent())?;
        insert_header(
            &mut map,
            "X-IBMCloud-SDK-Analytics",
            &format!(
                "service_name={};service_version=V1;operation_id={}",
                self.service_name, req.operation_id
            ),
        )?;
        insert_header(&mut map, "Accept", "application/json")?;
        if req.body.is_some() {
            insert_header(&mut map, "Content-Type", "application/json")?;
            if self.gzip {
                insert_header(&mut map, "Content-Encoding", "gzip")?;
            }
        }

        let mut defaults: Vec<_> = self.default_headers.iter().collect();
        defaults.sort();
        for (name, value) in defaults {
            insert_header(&mut map, name, value)?;
        }
        for (name, value) in &req.headers {
            insert_header(&mut map, name, value)?;
        }
        Ok(map)
    }
}

impl std::fmt::Debug for BaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseService")
            .field("service_name", &self.service_name)
            .field("url", &self.url)
            .field("authenticator", &self.authenticator.authentication_type())
            .field("gzip", &self.gzip)
            .field("retry", &self.retry)
            .finish()
    }
}

fn insert_header(map: &mut HeaderMap, name: &str, value: &str) -> Result<()> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| SdkError::validation(format!("invalid header name: {}", name)))?;
    let value = HeaderValue::from_str(value)
        .map_err(|_| SdkError::validation(format!("invalid value for header {}", name.as_str())))?;
    map.insert(name, value);
    Ok(())
}

fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let to_error =
        |e: std::io::Error| SdkError::validation(format!("failed to compress request body: {}", e));
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).map_err(to_error)?;
    encoder.finish().map_err(to_error)
}

/// read a query parameter from a (possibly relative) URL such as a list `next_url`
pub fn get_query_param(url: &str, name: &str) -> Result<Option<String>> {
    let query = match url.split_once('?') {
        Some((_, query)) => query,
        None => return Ok(None),
    };
    let query = query.split('#').next().unwrap_or_default();

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == name {
            let value = urlencoding::decode(&value.replace('+', " "))
                .map_err(|e| SdkError::validation(format!("invalid query parameter {}: {}", name, e)))?
                .into_owned();
            return Ok(Some(value));
        }
    }
    Ok(None)
}
