//! Campaign Configuration
//!
//! Loads the promotion's business rules from a single YAML file:
//! - Voucher tiers and batch rationing
//! - Household member tagging and bonus cap
//! - Follow-up cadence and templates

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::follow_up::FollowUpConfig;
use super::vouchers::VoucherConfig;
use crate::constants::household;
use crate::ConfigError;

/// Practice branding used in rendered messages
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PracticeConfig {
    /// Practice name (e.g., "Bright Smile Dental")
    #[serde(default)]
    pub name: String,
    /// Booking phone number
    #[serde(default)]
    pub phone: String,
    /// Booking page URL
    #[serde(default)]
    pub booking_url: String,
}

/// Household member settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdConfig {
    /// Campaign source tags that mark an auto-generated household entry
    #[serde(default = "default_source_tags")]
    pub source_tags: Vec<String>,
    /// Global cap on household bonus entries
    #[serde(default = "default_max_bonus_entries")]
    pub max_bonus_entries: u32,
}

fn default_source_tags() -> Vec<String> {
    vec![household::DEFAULT_SOURCE_TAG.to_string()]
}

fn default_max_bonus_entries() -> u32 {
    household::MAX_BONUS_ENTRIES
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            source_tags: default_source_tags(),
            max_bonus_entries: default_max_bonus_entries(),
        }
    }
}

impl HouseholdConfig {
    /// Whether a raw campaign source marks a household entry.
    ///
    /// Only used when a record is first created; the result is stored on the
    /// record as an explicit flag.
    pub fn is_household_source(&self, campaign_source: &str) -> bool {
        let source = campaign_source.to_lowercase();
        self.source_tags
            .iter()
            .filter(|tag| !tag.trim().is_empty())
            .any(|tag| source.contains(&tag.to_lowercase()))
    }
}

/// Full campaign configuration (campaign.yaml)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CampaignConfig {
    /// Campaign identifier (e.g., "spring_whitening")
    #[serde(default)]
    pub campaign_id: String,
    #[serde(default)]
    pub practice: PracticeConfig,
    #[serde(default)]
    pub vouchers: VoucherConfig,
    #[serde(default)]
    pub household: HouseholdConfig,
    #[serde(default)]
    pub follow_up: FollowUpConfig,
}

impl CampaignConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let config = Self::from_yaml(&content)?;
        tracing::info!(
            campaign = %config.campaign_id,
            tiers = config.vouchers.tiers.len(),
            path = %path.display(),
            "Loaded campaign config"
        );
        Ok(config)
    }

    /// Parse from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CAMPAIGN_YAML: &str = r#"
campaign_id: spring_whitening
practice:
  name: Bright Smile Dental
  phone: "0113 496 0000"
vouchers:
  tiers:
    - { min: 0, max: 500, value: 50, message: "£50 off" }
    - { min: 500, value: 40, message: "£40 off" }
  batch_size: 90
household:
  source_tags: ["family_addon", "household"]
follow_up:
  delays_hours: [12, 48]
  templates:
    complete_short_survey:
      email: "Hi {name}, finish your survey to keep your {voucher} voucher."
"#;

    #[test]
    fn test_from_yaml() {
        let config = CampaignConfig::from_yaml(CAMPAIGN_YAML).unwrap();
        assert_eq!(config.campaign_id, "spring_whitening");
        assert_eq!(config.practice.name, "Bright Smile Dental");
        assert_eq!(config.vouchers.tiers.len(), 2);
        assert_eq!(config.vouchers.release_size, 100);
        assert_eq!(config.household.max_bonus_entries, 250);
        assert_eq!(config.follow_up.max_attempts(), 2);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CAMPAIGN_YAML.as_bytes()).unwrap();

        let config = CampaignConfig::load(file.path()).unwrap();
        assert_eq!(config.vouchers.tiers[0].value, 50);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CampaignConfig::load("/nonexistent/campaign.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = CampaignConfig::from_yaml("vouchers: [not, a, map]").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_household_source_matching() {
        let household = HouseholdConfig {
            source_tags: vec!["family_addon".to_string(), " ".to_string()],
            max_bonus_entries: 250,
        };
        assert!(household.is_household_source("FB_ad|FAMILY_ADDON"));
        assert!(!household.is_household_source("google_ads"));
        assert!(!household.is_household_source(""));
    }
}
