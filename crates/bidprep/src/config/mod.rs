mod settings;

pub use settings::{Settings, SettingsError};

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
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
    pub registry: RegistryConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let db_path = optional_path("APP_REGISTRY_PATH")?;
        let rules_path = optional_path("APP_RULES_PATH")?
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RULES_PATH));
        let settings_path = optional_path("APP_SETTINGS_PATH")?
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            registry: RegistryConfig {
                db_path,
                rules_path,
                settings_path,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

const DEFAULT_RULES_PATH: &str = "formulas.json";
const DEFAULT_SETTINGS_PATH: &str = "config.json";

fn optional_path(key: &'static str) -> Result<Option<PathBuf>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(PathBuf::from(value.trim()))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidPath { key }),
    }
}

/// Locations of the company workbook, rule document and settings file.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub db_path: Option<PathBuf>,
    pub rules_path: PathBuf,
    pub settings_path: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPath { key: &'static str },
    MissingRegistryPath,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPath { key } => write!(f, "{key} must be valid UTF-8"),
            ConfigError::MissingRegistryPath => write!(
                f,
                "no company workbook configured: pass --db, set APP_REGISTRY_PATH or dbPath in the settings file"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
