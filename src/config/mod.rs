//! explicit client configuration, optionally loaded from a JSON5 file
//!
//! nothing here reads process environment variables; callers pass a path or
//! build [`ServiceConfig`] values directly.

mod schema;

pub use schema::{AuthType, ConfigFile, ServiceConfig, DEFAULT_TIMEOUT_SECS};

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::enterprise::EnterpriseManagementV1;
use crate::governance::ConfigurationGovernanceV1;
use crate::service::{
    Authenticator, BaseService, BasicAuthenticator, BearerTokenAuthenticator, IamAuthenticator,
    NoAuthAuthenticator, ServiceOptions,
};

/// `~/.platform-services/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .join(".platform-services")
        .join("config.json"))
}

pub fn load(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: ConfigFile = json5::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

pub fn load_default() -> Result<ConfigFile> {
    load(&default_config_path()?)
}

/// check a config file and return one message per problem found
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let config = load(path)?;
    let mut names: Vec<_> = config.services.keys().collect();
    names.sort();

    let mut errors = Vec::new();
    for name in names {
        if let Err(e) = config.services[name].validate() {
            errors.push(format!("services.{}: {}", name, e));
        }
    }
    Ok(errors)
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("url must be an absolute http(s) URL: {}", url);
            }
        }
        if self.timeout_secs == Some(0) {
            bail!("timeout_secs must be greater than zero");
        }
        self.authenticator()?.validate()?;
        Ok(())
    }

    /// build the authenticator named by `auth_type`
    pub fn authenticator(&self) -> Result<Arc<dyn Authenticator>> {
        let auth: Arc<dyn Authenticator> = match self.auth_type {
            AuthType::NoAuth => Arc::new(NoAuthAuthenticator),
            AuthType::BearerToken => Arc::new(BearerTokenAuthenticator::new(
                required(&self.bearer_token, "bearer_token")?,
            )),
            AuthType::Basic => Arc::new(BasicAuthenticator::new(
                required(&self.username, "username")?,
                required(&self.password, "password")?,
            )),
            AuthType::Iam => {
                let mut iam = IamAuthenticator::new(required(&self.apikey, "apikey")?);
                if let Some(url) = &self.auth_url {
                    iam = iam.with_url(url);
                }
                match (&self.client_id, &self.client_secret) {
                    (Some(id), Some(secret)) => iam = iam.with_client_credentials(id, secret),
                    (None, None) => {}
                    _ => bail!("client_id and client_secret must be set together"),
                }
                Arc::new(iam)
            }
        };
        Ok(auth)
    }

    pub fn service_options(&self) -> Result<ServiceOptions> {
        let mut options = ServiceOptions::with_shared_authenticator(self.authenticator()?)
            .with_timeout(Duration::from_secs(
                self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
            .with_disable_ssl_verification(self.disable_ssl);
        if let Some(url) = &self.url {
            options = options.with_url(url);
        }
        Ok(options)
    }

    /// apply the gzip and retry settings to a built service
    pub fn apply(&self, service: &mut BaseService) {
        service.set_enable_gzip_compression(self.enable_gzip);
        if self.enable_retries {
            service.enable_retries(
                self.max_retries,
                Duration::from_secs(self.retry_interval_secs),
            );
        } else {
            service.disable_retries();
        }
    }

    pub fn configuration_governance(&self) -> Result<ConfigurationGovernanceV1> {
        self.validate()?;
        let mut client = ConfigurationGovernanceV1::new(self.service_options()?)?;
        self.apply(client.service_mut());
        Ok(client)
    }

    pub fn enterprise_management(&self) -> Result<EnterpriseManagementV1> {
        self.validate()?;
        let mut client = EnterpriseManagementV1::new(self.service_options()?)?;
        self.apply(client.service_mut());
        Ok(client)
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(anyhow!("{} is required for this auth_type", field)),
    }
}
