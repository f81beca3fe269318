//! Campaign Config Validator
//!
//! Validates campaign configuration at startup so a misconfigured tier table
//! is rejected before any visitor sees it. Checks:
//! - Tier table starts at zero, is contiguous and ends unbounded
//! - Batch rationing sizes and the restock announcement placeholders
//! - Follow-up delays stay within a year
//! - Follow-up templates referenced by stage exist
//!
//! # Example
//!
//! ```ignore
//! use dental_funnel_config::domain::CampaignValidator;
//!
//! let result = CampaignValidator::new().validate(&campaign);
//! if !result.is_ok() {
//!     return Err(ConfigError::Validation(result.summary()));
//! }
//! ```

use super::CampaignConfig;
use crate::constants;

/// Placeholders the restock announcement must render
const ANNOUNCEMENT_PLACEHOLDERS: [&str; 2] = ["{signup_count}", "{released}"];

/// Validation error with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Category of error
    pub category: ValidationCategory,
    /// Config section
    pub source: String,
    /// Specific field
    pub field: Option<String>,
    pub message: String,
    pub severity: ValidationSeverity,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field_str = self.field.as_deref().unwrap_or("(root)");
        write!(
            f,
            "[{:?}] {}/{}: {}",
            self.severity, self.source, field_str, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Category of validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCategory {
    /// Missing required configuration
    MissingRequired,
    /// Gap between consecutive tiers
    TierGap,
    /// Overlap between consecutive tiers
    TierOverlap,
    /// Value out of expected range
    ValueOutOfRange,
    /// Invalid cross-reference
    InvalidReference,
}

/// Severity of validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    /// Informational warning
    Warning,
    /// Potential issue
    Error,
    /// Critical - will prevent startup
    Critical,
}

/// Validation result
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    /// Campaign being validated
    pub campaign: String,
}

impl ValidationResult {
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            campaign: campaign.into(),
        }
    }

    fn push(
        &mut self,
        category: ValidationCategory,
        severity: ValidationSeverity,
        source: &str,
        field: Option<String>,
        message: String,
    ) {
        self.errors.push(ValidationError {
            category,
            source: source.to_string(),
            field,
            message,
            severity,
        });
    }

    /// Check if validation passed (no critical errors)
    pub fn is_ok(&self) -> bool {
        !self
            .errors
            .iter()
            .any(|e| e.severity == ValidationSeverity::Critical)
    }

    /// Get only critical errors
    pub fn critical_errors(&self) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Critical)
            .collect()
    }

    pub fn has_category(&self, category: ValidationCategory) -> bool {
        self.errors.iter().any(|e| e.category == category)
    }

    /// Summary string
    pub fn summary(&self) -> String {
        let critical = self.critical_errors().len();
        let warnings = self
            .errors
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Warning)
            .count();

        if self.errors.is_empty() {
            format!("Campaign '{}': All validations passed", self.campaign)
        } else {
            let details: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            format!(
                "Campaign '{}': {} critical, {} warnings: {}",
                self.campaign,
                critical,
                warnings,
                details.join("; ")
            )
        }
    }
}

/// Validator for campaign configuration
#[derive(Debug, Default)]
pub struct CampaignValidator;

impl CampaignValidator {
    pub fn new() -> Self {
        Self
    }

    /// Run all checks
    pub fn validate(&self, config: &CampaignConfig) -> ValidationResult {
        let mut result = ValidationResult::new(&config.campaign_id);

        self.validate_tiers(config, &mut result);
        self.validate_batches(config, &mut result);
        self.validate_follow_up(config, &mut result);

        if result.errors.is_empty() {
            tracing::debug!(campaign = %config.campaign_id, "Campaign config validated");
        } else {
            tracing::warn!(summary = %result.summary(), "Campaign config has issues");
        }

        result
    }

    fn validate_tiers(&self, config: &CampaignConfig, result: &mut ValidationResult) {
        use ValidationCategory::*;
        use ValidationSeverity::*;

        let tiers = &config.vouchers.tiers;
        let Some(first) = tiers.first() else {
            result.push(
                MissingRequired,
                Critical,
                "vouchers",
                Some("tiers".to_string()),
                "At least one voucher tier is required".to_string(),
            );
            return;
        };

        if first.min != 0 {
            result.push(
                TierGap,
                Critical,
                "vouchers",
                Some("tiers[0].min".to_string()),
                format!("Lowest tier must start at 0, got {}", first.min),
            );
        }

        for (i, tier) in tiers.iter().enumerate() {
            match tier.max {
                Some(max) if max <= tier.min => result.push(
                    ValueOutOfRange,
                    Critical,
                    "vouchers",
                    Some(format!("tiers[{}]", i)),
                    format!("max ({}) must be greater than min ({})", max, tier.min),
                ),
                None if i + 1 != tiers.len() => result.push(
                    TierOverlap,
                    Critical,
                    "vouchers",
                    Some(format!("tiers[{}].max", i)),
                    "Only the last tier may be unbounded".to_string(),
                ),
                _ => {}
            }
        }

        for (i, pair) in tiers.windows(2).enumerate() {
            let Some(max) = pair[0].max else { continue };
            let next_min = pair[1].min;
            if next_min > max {
                result.push(
                    TierGap,
                    Critical,
                    "vouchers",
                    Some(format!("tiers[{}]", i + 1)),
                    format!("Signup counts {}..{} are not covered", max, next_min),
                );
            } else if next_min < max {
                result.push(
                    TierOverlap,
                    Critical,
                    "vouchers",
                    Some(format!("tiers[{}]", i + 1)),
                    format!(
                    "Tier starting at {} overlaps previous tier ending at {}",
                    next_min, max
                ),
                );
            }
        }

        if tiers.last().and_then(|t| t.max).is_some() {
            result.push(
                TierGap,
                Critical,
                "vouchers",
                Some(format!("tiers[{}].max", tiers.len() - 1)),
                "Last tier must be unbounded (omit max)".to_string(),
            );
        }

        if tiers.windows(2).any(|pair| pair[1].value > pair[0].value) {
            result.push(
                ValueOutOfRange,
                Warning,
                "vouchers",
                Some("tiers".to_string()),
                "Voucher value increases with signup count".to_string(),
            );
        }
    }

    fn validate_batches(&self, config: &CampaignConfig, result: &mut ValidationResult) {
        let vouchers = &config.vouchers;

        if vouchers.batch_size == 0 {
            result.push(
                ValidationCategory::ValueOutOfRange,
                ValidationSeverity::Critical,
                "vouchers",
                Some("batch_size".to_string()),
                "batch_size must be greater than 0".to_string(),
            );
        }

        if vouchers.release_size < vouchers.batch_size {
            result.push(
                ValidationCategory::ValueOutOfRange,
                ValidationSeverity::Critical,
                "vouchers",
                Some("release_size".to_string()),
                format!(
                    "release_size ({}) must not be below batch_size ({})",
                    vouchers.release_size, vouchers.batch_size
                ),
            );
        }

        for placeholder in ANNOUNCEMENT_PLACEHOLDERS {
            if !vouchers.announcement_template.contains(placeholder) {
                result.push(
                    ValidationCategory::MissingRequired,
                    ValidationSeverity::Critical,
                    "vouchers",
                    Some("announcement_template".to_string()),
                    format!("announcement_template must contain {}", placeholder),
                );
            }
        }
    }

    fn validate_follow_up(&self, config: &CampaignConfig, result: &mut ValidationResult) {
        let follow_up = &config.follow_up;

        if let Some(hours) = follow_up
            .delays_hours
            .iter()
            .find(|h| **h > constants::follow_up::MAX_DELAY_HOURS)
        {
            result.push(
                ValidationCategory::ValueOutOfRange,
                ValidationSeverity::Critical,
                "follow_up",
                Some("delays_hours".to_string()),
                format!(
                    "Follow-up delay of {} hours exceeds the {} hour limit",
                    hours,
                    constants::follow_up::MAX_DELAY_HOURS
                ),
            );
        }

        if follow_up.delays_hours.iter().any(|h| *h < 0) {
            result.push(
                ValidationCategory::ValueOutOfRange,
                ValidationSeverity::Critical,
                "follow_up",
                Some("delays_hours".to_string()),
                "Follow-up delays must not be negative".to_string(),
            );
        }

        let mut stages: Vec<_> = follow_up.stage_templates.iter().collect();
        stages.sort();
        for (stage, key) in stages {
            if !follow_up.templates.contains_key(key) {
                result.push(
                    ValidationCategory::InvalidReference,
                    ValidationSeverity::Warning,
                    "follow_up",
                    Some(format!("stage_templates.{}", stage)),
                    format!("Template '{}' is not defined", key),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dental_funnel_core::VoucherTier;

    fn config_with_tiers(tiers: Vec<VoucherTier>) -> CampaignConfig {
        let mut config = CampaignConfig::default();
        config.campaign_id = "test".to_string();
        config.vouchers.tiers = tiers;
        config
    }

    #[test]
    fn test_default_config_is_valid() {
        let result = CampaignValidator::new().validate(&CampaignConfig::default());
        assert!(result.is_ok(), "{}", result.summary());
        assert!(result.critical_errors().is_empty());
    }

    #[test]
    fn test_tier_gap_detected() {
        let config = config_with_tiers(vec![
            VoucherTier::new(0, Some(100), 50, ""),
            VoucherTier::new(150, None, 40, ""),
        ]);
        let result = CampaignValidator::new().validate(&config);
        assert!(!result.is_ok());
        assert!(result.has_category(ValidationCategory::TierGap));
    }

    #[test]
    fn test_tier_overlap_detected() {
        let config = config_with_tiers(vec![
            VoucherTier::new(0, Some(100), 50, ""),
            VoucherTier::new(90, None, 40, ""),
        ]);
        let result = CampaignValidator::new().validate(&config);
        assert!(result.has_category(ValidationCategory::TierOverlap));
    }

    #[test]
    fn test_first_tier_must_start_at_zero() {
        let config = config_with_tiers(vec![VoucherTier::new(1, None, 50, "")]);
        let result = CampaignValidator::new().validate(&config);
        assert!(!result.is_ok());
    }

    #[test]
    fn test_last_tier_must_be_unbounded() {
        let config = config_with_tiers(vec![VoucherTier::new(0, Some(1000), 50, "")]);
        let result = CampaignValidator::new().validate(&config);
        assert!(!result.is_ok());
        assert!(result.has_category(ValidationCategory::TierGap));
    }

    #[test]
    fn test_empty_tiers_rejected() {
        let result = CampaignValidator::new().validate(&config_with_tiers(vec![]));
        assert!(result.has_category(ValidationCategory::MissingRequired));
    }

    #[test]
    fn test_release_below_batch_rejected() {
        let mut config = CampaignConfig::default();
        config.vouchers.release_size = 50;
        assert!(!CampaignValidator::new().validate(&config).is_ok());

        config.vouchers.release_size = 100;
        config.vouchers.batch_size = 0;
        assert!(!CampaignValidator::new().validate(&config).is_ok());
    }

    #[test]
    fn test_announcement_without_placeholders_rejected() {
        let mut config = CampaignConfig::default();
        config.vouchers.announcement_template = "More vouchers released!".to_string();
        let result = CampaignValidator::new().validate(&config);
        assert!(!result.is_ok());
        assert!(result.has_category(ValidationCategory::MissingRequired));

        config.vouchers.announcement_template = "{released} more after {signup_count}".to_string();
        assert!(CampaignValidator::new().validate(&config).is_ok());
    }

    #[test]
    fn test_follow_up_delay_upper_bound() {
        let mut config = CampaignConfig::default();
        config.follow_up.delays_hours = vec![24, i64::MAX];
        let result = CampaignValidator::new().validate(&config);
        assert!(!result.is_ok());
        assert!(result.has_category(ValidationCategory::ValueOutOfRange));

        config.follow_up.delays_hours = vec![24, constants::follow_up::MAX_DELAY_HOURS];
        assert!(CampaignValidator::new().validate(&config).is_ok());
    }

    #[test]
    fn test_missing_template_is_warning() {
        let config = CampaignConfig::default();
        let result = CampaignValidator::new().validate(&config);
        assert!(result.is_ok());
        assert!(result.has_category(ValidationCategory::InvalidReference));
    }
}
