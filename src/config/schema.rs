use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// top level of a config file: one section per service name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,
}

impl ConfigFile {
    pub fn service(&self, name: &str) -> Option<&ServiceConfig> {
        self.services.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    #[serde(alias = "IAM")]
    Iam,
    #[serde(alias = "bearerToken", alias = "bearer_token")]
    BearerToken,
    #[serde(alias = "BASIC")]
    Basic,
    #[serde(alias = "noAuth", alias = "none")]
    NoAuth,
}

impl Default for AuthType {
    fn default() -> Self {
        AuthType::Iam
    }
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// settings for one service client
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// overrides the service's default URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub auth_type: AuthType,

    // iam
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    // bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,

    // basic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default)]
    pub disable_ssl: bool,
    #[serde(default)]
    pub enable_gzip: bool,
    #[serde(default)]
    pub enable_retries: bool,
    /// 0 selects the default
    #[serde(default)]
    pub max_retries: u32,
    /// upper bound on a single retry delay, 0 selects the default
    #[serde(default)]
    pub retry_interval_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// credentials stay out of log output
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("url", &self.url)
            .field("auth_type", &self.auth_type)
            .field("auth_url", &self.auth_url)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("disable_ssl", &self.disable_ssl)
            .field("enable_gzip", &self.enable_gzip)
            .field("enable_retries", &self.enable_retries)
            .field("max_retries", &self.max_retries)
            .field("retry_interval_secs", &self.retry_interval_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}
