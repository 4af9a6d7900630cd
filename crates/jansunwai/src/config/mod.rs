use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::workflows::complaint::{OtpPolicy, WorkflowTiming, DEFAULT_COMPLAINT_ID_PREFIX};

/// Distinguishes runtime behavior for different stages of the service.
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
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub workflow: WorkflowConfig,
    pub tracking: TrackingConfig,
    pub preferences: PreferencesConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = WorkflowTiming::default();
        let dispatch_delay = read_millis("APP_OTP_DISPATCH_DELAY_MS", defaults.dispatch_delay)?;
        let verification_delay =
            read_millis("APP_OTP_VERIFY_DELAY_MS", defaults.verification_delay)?;
        let resend_countdown_secs =
            read_number("APP_OTP_RESEND_SECONDS", defaults.resend_countdown_secs)?;
        let max_attempts = read_number("APP_OTP_MAX_ATTEMPTS", 3u32)?;
        let otp_policy = match read_choice("APP_OTP_POLICY", "prototype").as_str() {
            "prototype" => OtpPolicy::WellFormed,
            "issued" => OtpPolicy::Issued { max_attempts },
            other => {
                return Err(ConfigError::InvalidChoice {
                    variable: "APP_OTP_POLICY",
                    value: other.to_string(),
                })
            }
        };
        let complaint_id_prefix = env::var("APP_COMPLAINT_ID_PREFIX")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_COMPLAINT_ID_PREFIX.to_string());

        let tracking_mode = match read_choice("APP_TRACKING_MODE", "directory").as_str() {
            "mock" => TrackingMode::Mock,
            "directory" => TrackingMode::Directory,
            other => {
                return Err(ConfigError::InvalidChoice {
                    variable: "APP_TRACKING_MODE",
                    value: other.to_string(),
                })
            }
        };
        let ledger_path = read_path("APP_TRACKING_LEDGER");
        let preferences_path = read_path("APP_PREFERENCES_PATH");

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            workflow: WorkflowConfig {
                timing: WorkflowTiming {
                    dispatch_delay,
                    verification_delay,
                    resend_countdown_secs,
                    ..defaults
                },
                otp_policy,
                complaint_id_prefix,
            },
            tracking: TrackingConfig {
                mode: tracking_mode,
                ledger_path,
            },
            preferences: PreferencesConfig {
                path: preferences_path,
            },
        })
    }
}

fn read_choice(variable: &'static str, default: &str) -> String {
    env::var(variable)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .to_ascii_lowercase()
}

fn read_number<T: std::str::FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { variable }),
        Err(_) => Ok(default),
    }
}

fn read_millis(variable: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let millis = read_number(variable, default.as_millis() as u64)?;
    Ok(Duration::from_millis(millis))
}

fn read_path(variable: &'static str) -> Option<PathBuf> {
    env::var(variable)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

/// Settings controlling the HTTP server binding.
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
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Timers, OTP policy and identifier format for complaint submission.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub timing: WorkflowTiming,
    pub otp_policy: OtpPolicy,
    pub complaint_id_prefix: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            timing: WorkflowTiming::default(),
            otp_policy: OtpPolicy::WellFormed,
            complaint_id_prefix: DEFAULT_COMPLAINT_ID_PREFIX.to_string(),
        }
    }
}

/// Which tracking backend answers complaint lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingMode {
    Mock,
    Directory,
}

#[derive(Debug, Clone)]
pub struct TrackingConfig {
    pub mode: TrackingMode,
    pub ledger_path: Option<PathBuf>,
}

/// Where the language preference survives restarts. `None` keeps it in memory.
#[derive(Debug, Clone)]
pub struct PreferencesConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str },
    InvalidChoice { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable } => {
                write!(f, "{variable} must be a non-negative integer")
            }
            ConfigError::InvalidChoice { variable, value } => {
                write!(f, "{variable} does not accept '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidChoice { .. } => None,
        }
    }
}
