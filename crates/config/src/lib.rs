//! Configuration management for the dental funnel
//!
//! Supports loading configuration from:
//! - YAML/TOML files (config/default, config/{env})
//! - Environment variables (DENTAL_FUNNEL__ prefix)
//!
//! # Campaign Configuration
//!
//! Promotion rules live in a campaign YAML file (see `domain`):
//! - voucher tiers and batch rationing
//! - household member tags and bonus cap
//! - follow-up cadence and templates

pub mod constants;
pub mod domain;
pub mod settings;

pub use domain::{
    CampaignBridge, CampaignConfig, CampaignValidator, FollowUpConfig, HouseholdConfig,
    PracticeConfig, ValidationCategory, ValidationError, ValidationResult, ValidationSeverity,
    VoucherConfig,
};
pub use settings::{load_settings, ObservabilityConfig, RuntimeEnvironment, Settings};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Campaign validation failed: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
