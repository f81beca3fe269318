//! Voucher Promotion Configuration
//!
//! Tier table and batch rationing loaded from the campaign YAML.

use serde::{Deserialize, Serialize};

use crate::constants::vouchers;
use dental_funnel_core::{default_voucher_tiers, VoucherTier, DEFAULT_ANNOUNCEMENT_TEMPLATE};

/// Voucher section of campaign.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherConfig {
    /// Tier table, ascending by `min`; last tier has no `max`
    #[serde(default = "default_voucher_tiers")]
    pub tiers: Vec<VoucherTier>,
    /// Vouchers claimed per batch cycle
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
    /// Vouchers advertised per released batch
    #[serde(default = "default_release_size")]
    pub release_size: u64,
    /// Restock banner with `{signup_count}` and `{released}` placeholders
    #[serde(default = "default_announcement_template")]
    pub announcement_template: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_batch_size() -> u64 {
    vouchers::BATCH_SIZE
}

fn default_release_size() -> u64 {
    vouchers::BATCH_RELEASE_SIZE
}

fn default_announcement_template() -> String {
    DEFAULT_ANNOUNCEMENT_TEMPLATE.to_string()
}

fn default_currency_symbol() -> String {
    vouchers::CURRENCY_SYMBOL.to_string()
}

impl Default for VoucherConfig {
    fn default() -> Self {
        Self {
            tiers: default_voucher_tiers(),
            batch_size: default_batch_size(),
            release_size: default_release_size(),
            announcement_template: default_announcement_template(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl VoucherConfig {
    /// Render a voucher value with the configured currency, e.g. "£50"
    pub fn format_value(&self, value: u32) -> String {
        format!("{}{}", self.currency_symbol, value)
    }
}
