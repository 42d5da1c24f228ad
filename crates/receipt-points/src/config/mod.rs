use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Deployment stage the receipt service runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Log filter used when `RECEIPTS_LOG_LEVEL` is not set.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Test => "warn",
            Self::Production => "info",
        }
    }
}

/// Top-level configuration for the receipt service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Read `.env` (when present) and the `RECEIPTS_*` process variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("RECEIPTS_ENV")
            .map(|value| AppEnvironment::from_str(&value))
            .unwrap_or(AppEnvironment::Development);

        let host = lookup("RECEIPTS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("RECEIPTS_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            None => DEFAULT_PORT,
        };

        let log_level = lookup("RECEIPTS_LOG_LEVEL")
            .unwrap_or_else(|| environment.default_log_level().to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// HTTP listener binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost {
                value: self.host.clone(),
                source,
            })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "RECEIPTS_PORT '{value}' must be a valid u16")
            }
            ConfigError::InvalidHost { value, .. } => {
                write!(
                    f,
                    "RECEIPTS_HOST '{value}' must parse to an IPv4 or IPv6 address"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } => None,
            ConfigError::InvalidHost { source, .. } => Some(source),
        }
    }
}
