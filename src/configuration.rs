use std::env;
use std::fmt;

use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://network-api.onefootball.com";

pub const BASE_URL_ENV_VAR: &str = "ONEFOOTBALL_BASE_URL";
pub const LOGIN_ENV_VAR: &str = "ONEFOOTBALL_LOGIN";
pub const PASSWORD_ENV_VAR: &str = "ONEFOOTBALL_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("missing value for property {name:?}")]
    MissingRequiredPropertyValue { name: String },
    #[error("invalid base URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Connection settings for the OneFootball Network API.
///
/// Each property resolves from an explicit builder argument first, then from
/// the process environment (a `.env` file is honored), then from the
/// documented default. Only the base URL has a default; login and password
/// are required. Credentials live in process memory only.
#[derive(Clone)]
pub struct Settings {
    base_url: Url,
    login: String,
    password: String,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Resolve all settings from the environment alone.
    pub fn from_env() -> Result<Settings, ConfigurationError> {
        Settings::builder().build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // keep the password out of logs
        f.debug_struct("Settings")
            .field("base_url", &self.base_url.as_str())
            .field("login", &self.login)
            .field("password", &"********")
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct SettingsBuilder {
    base_url: Option<String>,
    login: Option<String>,
    password: Option<String>,
}

impl SettingsBuilder {
    fn new() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    pub fn base_url(&mut self, base_url: &str) -> &mut SettingsBuilder {
        self.base_url = Some(base_url.to_string());
        self
    }

    pub fn login(&mut self, login: &str) -> &mut SettingsBuilder {
        self.login = Some(login.to_string());
        self
    }

    pub fn password(&mut self, password: &str) -> &mut SettingsBuilder {
        self.password = Some(password.to_string());
        self
    }

    pub fn build(&self) -> Result<Settings, ConfigurationError> {
        // A .env file in the working directory joins the environment lookup.
        dotenvy::dotenv().ok();

        let base_url = resolve(self.base_url.as_deref(), BASE_URL_ENV_VAR)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url =
            Url::parse(&base_url).map_err(|source| ConfigurationError::InvalidBaseUrl {
                value: base_url.clone(),
                source,
            })?;

        let login = resolve(self.login.as_deref(), LOGIN_ENV_VAR).ok_or_else(|| {
            ConfigurationError::MissingRequiredPropertyValue {
                name: "login".to_string(),
            }
        })?;
        let password = resolve(self.password.as_deref(), PASSWORD_ENV_VAR).ok_or_else(|| {
            ConfigurationError::MissingRequiredPropertyValue {
                name: "password".to_string(),
            }
        })?;

        debug!("resolved settings for {}", base_url);
        Ok(Settings {
            base_url,
            login,
            password,
        })
    }
}

fn resolve(explicit: Option<&str>, env_var: &str) -> Option<String> {
    match explicit {
        Some(value) => Some(value.to_string()),
        None => env::var(env_var).ok().filter(|value| !value.is_empty()),
    }
}
