#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_NAMESPACE: &str = "http://tempuri.org/";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const MAX_TIMEOUT_SECONDS: u64 = 300;
const LOG_FORMATS: [&str; 2] = ["compact", "json"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 5xx 回應是否帶出內部錯誤訊息
    #[serde(default)]
    pub expose_error_details: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            expose_error_details: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub wsdl_url: String,
    pub access_key: String,
    pub endpoint: Option<String>,
    pub namespace: Option<String>,
    pub soap_action: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("wsdl_url", &self.wsdl_url)
            .field("access_key", &"***")
            .field("endpoint", &self.endpoint)
            .field("namespace", &self.namespace)
            .field("soap_action", &self.soap_action)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(wsdl_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            wsdl_url: wsdl_url.into(),
            access_key: access_key.into(),
            endpoint: None,
            namespace: None,
            soap_action: None,
            timeout_seconds: None,
        }
    }

    /// SOAP 服務位址：未指定時取 WSDL URL 去掉 query (`?wsdl`)
    pub fn endpoint(&self) -> Result<String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone());
        }

        let mut url = url::Url::parse(&self.wsdl_url).map_err(|e| {
            GatewayError::InvalidConfigValueError {
                field: "provider.wsdl_url".to_string(),
                value: self.wsdl_url.clone(),
                reason: format!("Invalid URL format: {}", e),
            }
        })?;
        url.set_query(None);
        url.set_fragment(None);
        Ok(url.to_string())
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn soap_action(&self) -> String {
        self.soap_action
            .clone()
            .unwrap_or_else(|| format!("{}SubmitRequest", self.namespace()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GatewayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GatewayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PONY_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// 只從環境變數載入 (HOST, PORT, LOG_LEVEL, PONY_API_URL, PONY_API_KEY)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| GatewayError::MissingConfigError {
                field: key.to_string(),
            })
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| GatewayError::InvalidConfigValueError {
                    field: "PORT".to_string(),
                    value: raw.clone(),
                    reason: "must be a port number".to_string(),
                })?,
            None => default_port(),
        };

        Ok(Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(default_host),
                port,
                expose_error_details: false,
            },
            provider: ProviderConfig::new(required("PONY_API_URL")?, required("PONY_API_KEY")?),
            logging: LoggingConfig {
                level: lookup("LOG_LEVEL").unwrap_or_else(default_log_level),
                format: default_log_format(),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_positive_number("server.port", u64::from(self.server.port), 1)?;

        validation::validate_url("provider.wsdl_url", &self.provider.wsdl_url)?;
        validation::validate_non_empty_string("provider.access_key", &self.provider.access_key)?;
        if let Some(endpoint) = &self.provider.endpoint {
            validation::validate_url("provider.endpoint", endpoint)?;
        }
        if let Some(namespace) = &self.provider.namespace {
            validation::validate_non_empty_string("provider.namespace", namespace)?;
        }
        if let Some(timeout) = self.provider.timeout_seconds {
            validation::validate_range("provider.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        validation::validate_one_of("logging.level", self.logging.level.trim(), &LOG_LEVELS)?;
        validation::validate_one_of("logging.format", self.logging.format.trim(), &LOG_FORMATS)?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
