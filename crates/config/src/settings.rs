//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{CampaignConfig, CampaignValidator};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - validation warnings are only logged
    #[default]
    Development,
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Path to the campaign YAML (tiers, household tags, follow-up)
    #[serde(default = "default_campaign_config_path")]
    pub campaign_config_path: String,
}

fn default_campaign_config_path() -> String {
    "config/campaign.yaml".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::default(),
            observability: ObservabilityConfig::default(),
            campaign_config_path: default_campaign_config_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.observability.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!(
                    "Expected one of {}, got '{}'",
                    LOG_LEVELS.join(", "),
                    self.observability.log_level
                ),
            });
        }

        if self.campaign_config_path.trim().is_empty() {
            return Err(ConfigError::MissingField("campaign_config_path".to_string()));
        }

        Ok(())
    }

    /// Load and validate the campaign configuration.
    ///
    /// A missing file falls back to defaults outside strict environments.
    /// Critical validation errors are always rejected.
    pub fn load_campaign(&self) -> Result<CampaignConfig, ConfigError> {
        let path = Path::new(&self.campaign_config_path);
        let campaign = if path.exists() || self.environment.is_strict() {
            CampaignConfig::load(path)?
        } else {
            tracing::warn!(
                path = %path.display(),
                "Campaign config not found, using built-in defaults"
            );
            CampaignConfig::default()
        };

        let result = CampaignValidator::new().validate(&campaign);
        if !result.is_ok() {
            return Err(ConfigError::Validation(result.summary()));
        }

        Ok(campaign)
    }
}

/// Load settings from files and environment.
///
/// Priority: `DENTAL_FUNNEL__*` env vars > config/{env} > config/default > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("DENTAL_FUNNEL")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.environment, RuntimeEnvironment::Development);
        assert_eq!(settings.observability.log_level, "info");
        assert_eq!(settings.campaign_config_path, "config/campaign.yaml");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut settings = Settings::default();
        settings.observability.log_level = "loud".to_string();
        assert!(settings.validate().is_err());

        settings.observability.log_level = "DEBUG".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_campaign_path() {
        let mut settings = Settings::default();
        settings.campaign_config_path = "  ".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_missing_campaign_falls_back_in_development() {
        let mut settings = Settings::default();
        settings.campaign_config_path = "/nonexistent/campaign.yaml".to_string();

        let campaign = settings.load_campaign().unwrap();
        assert_eq!(campaign.vouchers.batch_size, 90);

        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.load_campaign().is_err());
    }

    #[test]
    fn test_invalid_campaign_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"vouchers:\n  tiers:\n    - { min: 10, value: 5 }\n")
            .unwrap();

        let mut settings = Settings::default();
        settings.campaign_config_path = file.path().display().to_string();

        let err = settings.load_campaign().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_runtime_environment() {
        assert!(RuntimeEnvironment::Production.is_production());
        assert!(RuntimeEnvironment::Staging.is_strict());
        assert!(!RuntimeEnvironment::Development.is_strict());
    }
}
